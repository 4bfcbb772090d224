//! Subset-matching query over region catalogs.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::SolarSystem;
use crate::materials::MaterialCatalog;

/// Return every system whose available materials cover all of `desired`.
///
/// Systems are returned in their original load order. An empty desired set
/// matches every system, and an empty result is a normal outcome.
pub fn find_matches<'a>(
    systems: &'a [SolarSystem],
    desired: &[String],
    materials: &MaterialCatalog,
) -> Vec<&'a SolarSystem> {
    let desired: BTreeSet<&str> = desired.iter().map(String::as_str).collect();
    let matches: Vec<&SolarSystem> = systems
        .iter()
        .filter(|system| {
            let available = system.available_materials(materials);
            desired.iter().all(|material| available.contains(*material))
        })
        .collect();
    debug!(
        desired = desired.len(),
        candidates = systems.len(),
        matches = matches.len(),
        "ran material match query"
    );
    matches
}
