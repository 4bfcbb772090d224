use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use eveindustry_cli::commands::graph::{handle_graph_command, GraphCommandArgs, GraphFormat};
use eveindustry_cli::commands::matcher::{handle_match_command, MatchCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "EVE planetary-industry utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactively match regions against a target set of raw materials.
    Match {
        /// Directory containing region catalog CSV files.
        #[arg(long, default_value = "Regions")]
        regions_dir: PathBuf,
        /// Directory for saved query files.
        #[arg(long, default_value = "SavedQueries")]
        queries_dir: PathBuf,
        /// Directory for saved result files.
        #[arg(long, default_value = "SavedResults")]
        results_dir: PathBuf,
    },
    /// Render the production dependency subgraph for a target product.
    Graph {
        /// Product whose requirement closure is rendered.
        #[arg(long)]
        target: String,
        /// Production chain definition file.
        #[arg(long, default_value = "production_chain.json")]
        chain: PathBuf,
        /// Output file (stdout for DOT when omitted).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = GraphFormat::Dot)]
        format: GraphFormat,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Match {
            regions_dir,
            queries_dir,
            results_dir,
        } => handle_match_command(&MatchCommandArgs {
            regions_dir,
            queries_dir,
            results_dir,
        }),
        Command::Graph {
            target,
            chain,
            output,
            format,
        } => handle_graph_command(&GraphCommandArgs {
            target,
            chain,
            output,
            format,
        }),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
