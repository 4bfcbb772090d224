// Module exports for CLI subcommands.
//
// Each module handles a specific subcommand; main.rs stays focused on
// argument parsing and dispatch.

pub mod graph;
pub mod matcher;
