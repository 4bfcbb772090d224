//! EVE planetary-industry library entry points.
//!
//! This crate exposes helpers to load region catalogs and production chains,
//! run material match queries, manage the interactive selection state, and
//! emit DOT renderings of production subgraphs. Higher-level consumers (the
//! CLI) should only depend on the functions exported here instead of
//! reimplementing behavior.

#![deny(warnings)]

pub mod catalog;
pub mod dot;
pub mod error;
pub mod materials;
pub mod matcher;
pub mod production;
pub mod query;
pub mod selection;

pub use catalog::{list_region_files, save_results_csv, RegionCatalog, SolarSystem};
pub use dot::{dot_source, render_image};
pub use error::{Error, Result};
pub use matcher::find_matches;
pub use materials::MaterialCatalog;
pub use production::ProductionChain;
pub use query::{list_saved_queries, QueryState};
pub use selection::{MaterialSelection, SelectionCommand};
