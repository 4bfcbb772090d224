//! EVE planetary-industry CLI library.
//!
//! This crate hosts the subcommand handlers and the interactive session
//! plumbing for the `eveindustry-cli` binary. Session functions are written
//! against generic readers and writers so the interactive protocol can be
//! unit tested without a terminal.

pub mod commands;
pub mod prompt;
