//! DOT emission for production subgraphs.
//!
//! The contract with the external renderer: every node carries its tier's
//! fill color (or the default when no tier claims it), nodes are grouped for
//! layout by tier, the target is pinned to the terminal rank, and edges run
//! input to product so causes flow left to right.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};
use crate::production::ProductionChain;

/// Fill color for items outside every tier.
const DEFAULT_FILL: &str = "lightgrey";

/// Build DOT source for the requirement subgraph of `target`.
pub fn dot_source(chain: &ProductionChain, target: &str) -> String {
    let subgraph = chain.induced_subgraph(target);

    // Node set: every key plus every kept input (leaf items have no key).
    let mut nodes: Vec<&str> = subgraph.keys().map(String::as_str).collect();
    for inputs in subgraph.values() {
        for input in inputs {
            if !nodes.contains(&input.as_str()) {
                nodes.push(input);
            }
        }
    }
    nodes.sort_unstable();

    let mut dot = String::from("digraph production {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box, style=filled];\n");

    for node in &nodes {
        let fill = chain
            .tier_of(node)
            .and_then(|tier| chain.colors.get(tier))
            .map(String::as_str)
            .unwrap_or(DEFAULT_FILL);
        dot.push_str(&format!(
            "  \"{}\" [fillcolor=\"{}\"];\n",
            escape(node),
            escape(fill)
        ));
    }

    // One rank group per tier with members in the closure; the target is
    // pinned to the sink rank instead of its tier.
    for (tier, members) in &chain.tiers {
        let ranked: Vec<&str> = members
            .iter()
            .map(String::as_str)
            .filter(|item| *item != target && nodes.contains(item))
            .collect();
        if ranked.is_empty() {
            continue;
        }
        dot.push_str(&format!("  {{ rank=same; /* {} */", escape(tier)));
        for item in ranked {
            dot.push_str(&format!(" \"{}\";", escape(item)));
        }
        dot.push_str(" }\n");
    }
    dot.push_str(&format!("  {{ rank=sink; \"{}\"; }}\n", escape(target)));

    for (product, inputs) in &subgraph {
        for input in inputs {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape(input),
                escape(product)
            ));
        }
    }

    dot.push_str("}\n");
    dot
}

/// Render DOT source to an image by piping it to the external `dot` binary.
pub fn render_image(dot: &str, output: &Path) -> Result<()> {
    let mut child = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(output)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::RendererUnavailable
            } else {
                Error::Io(err)
            }
        })?;

    child
        .stdin
        .take()
        .expect("stdin was piped")
        .write_all(dot.as_bytes())?;

    let status = child.wait()?;
    if !status.success() {
        return Err(Error::RenderFailed {
            status: status.to_string(),
        });
    }
    debug!(output = %output.display(), "rendered production graph");
    Ok(())
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn fixture_chain() -> ProductionChain {
        ProductionChain {
            tiers: BTreeMap::from([
                ("P0".to_string(), vec!["Base Metals".to_string()]),
                (
                    "P1".to_string(),
                    vec![
                        "Mechanical Parts".to_string(),
                        "Consumer Electronics".to_string(),
                    ],
                ),
                ("P2".to_string(), vec!["Robotics".to_string()]),
            ]),
            products: BTreeMap::from([
                (
                    "Robotics".to_string(),
                    vec![
                        "Mechanical Parts".to_string(),
                        "Consumer Electronics".to_string(),
                    ],
                ),
                (
                    "Mechanical Parts".to_string(),
                    vec!["Base Metals".to_string()],
                ),
                (
                    "Consumer Electronics".to_string(),
                    vec!["Base Metals".to_string()],
                ),
            ]),
            colors: BTreeMap::from([
                ("P0".to_string(), "#c0c0c0".to_string()),
                ("P1".to_string(), "#80c080".to_string()),
            ]),
        }
    }

    #[test]
    fn edges_run_input_to_product() {
        let dot = dot_source(&fixture_chain(), "Robotics");
        assert!(dot.contains("\"Mechanical Parts\" -> \"Robotics\";"));
        assert!(dot.contains("\"Base Metals\" -> \"Mechanical Parts\";"));
        assert!(!dot.contains("\"Robotics\" ->"));
    }

    #[test]
    fn nodes_take_their_tier_fill_color() {
        let dot = dot_source(&fixture_chain(), "Robotics");
        assert!(dot.contains("\"Base Metals\" [fillcolor=\"#c0c0c0\"];"));
        assert!(dot.contains("\"Mechanical Parts\" [fillcolor=\"#80c080\"];"));
        // P2 has no color entry, so the target falls back to the default.
        assert!(dot.contains(&format!("\"Robotics\" [fillcolor=\"{DEFAULT_FILL}\"];")));
    }

    #[test]
    fn target_is_pinned_to_the_sink_rank() {
        let dot = dot_source(&fixture_chain(), "Robotics");
        assert!(dot.contains("{ rank=sink; \"Robotics\"; }"));
        assert!(dot.contains("rankdir=LR;"));
    }

    #[test]
    fn tier_groups_cover_closure_members_only() {
        let dot = dot_source(&fixture_chain(), "Mechanical Parts");
        // Consumer Electronics is outside the closure of Mechanical Parts.
        assert!(!dot.contains("Consumer Electronics"));
        assert!(dot.contains("\"Base Metals\";"));
    }

    #[test]
    fn names_with_quotes_are_escaped() {
        let mut chain = fixture_chain();
        chain.products.insert(
            "Robotics".to_string(),
            vec!["8\" Wafer".to_string()],
        );
        chain
            .products
            .insert("8\" Wafer".to_string(), Vec::new());
        let dot = dot_source(&chain, "Robotics");
        assert!(dot.contains("\"8\\\" Wafer\" -> \"Robotics\";"));
    }
}
