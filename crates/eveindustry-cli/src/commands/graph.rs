//! Graph command handler for rendering production dependency subgraphs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use eveindustry_lib::{dot_source, render_image, ProductionChain};

/// Output format for the graph subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GraphFormat {
    /// Emit Graphviz DOT source.
    #[default]
    Dot,
    /// Render a PNG via the external `dot` binary.
    Png,
}

/// Arguments for the graph command.
#[derive(Debug, Clone)]
pub struct GraphCommandArgs {
    /// Product whose requirement closure is rendered.
    pub target: String,
    /// Path of the production chain definition file.
    pub chain: PathBuf,
    /// Output file; DOT defaults to stdout, PNG to `<target>.png`.
    pub output: Option<PathBuf>,
    /// Output format.
    pub format: GraphFormat,
}

/// Handle the graph subcommand.
pub fn handle_graph_command(args: &GraphCommandArgs) -> Result<()> {
    let chain = ProductionChain::from_path(&args.chain)
        .with_context(|| format!("failed to load production chain {}", args.chain.display()))?;
    chain.require_product(&args.target)?;

    let dot = dot_source(&chain, &args.target);
    match args.format {
        GraphFormat::Dot => match &args.output {
            Some(path) => {
                write_dot(path, &dot)?;
                println!("DOT written to {}", path.display());
            }
            None => print!("{dot}"),
        },
        GraphFormat::Png => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{}.png", args.target)));
            render_image(&dot, &output)
                .with_context(|| format!("failed to render {}", output.display()))?;
            println!("Graph rendered to {}", output.display());
        }
    }
    Ok(())
}

fn write_dot(path: &Path, dot: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, dot).with_context(|| format!("failed to write {}", path.display()))
}
