//! Production-chain data and transitive requirement traversal.
//!
//! The chain file is JSON with three top-level fields: a tier partition over
//! the item universe, the product-to-direct-inputs mapping, and a per-tier
//! display color table. Tiers and colors only affect layout; traversal is
//! driven by the products map alone.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Static production-chain definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionChain {
    /// Tier label to the items at that tier.
    pub tiers: BTreeMap<String, Vec<String>>,
    /// Product to its direct input items, in recipe order.
    pub products: BTreeMap<String, Vec<String>>,
    /// Tier label to display color.
    pub colors: BTreeMap<String, String>,
}

impl ProductionChain {
    /// Load a production chain from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let chain = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            products = chain.products.len(),
            tiers = chain.tiers.len(),
            "loaded production chain"
        );
        Ok(chain)
    }

    /// Load a production chain from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Whether the chain defines a recipe for `name`.
    pub fn contains_product(&self, name: &str) -> bool {
        self.products.contains_key(name)
    }

    /// Require a known product, for callers that treat unknowns as fatal.
    pub fn require_product(&self, name: &str) -> Result<()> {
        if self.contains_product(name) {
            Ok(())
        } else {
            Err(Error::UnknownProduct {
                name: name.to_string(),
            })
        }
    }

    /// Tier containing `item`, scanning the tier-membership table.
    ///
    /// A pure function of the loaded tiers; items outside every tier return
    /// `None` and render with the default color.
    pub fn tier_of(&self, item: &str) -> Option<&str> {
        self.tiers
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == item))
            .map(|(tier, _)| tier.as_str())
    }

    /// Every item required to build `target`, transitively.
    ///
    /// Iterative worklist with a single visited set, so each item is expanded
    /// at most once and cyclic data terminates: the target is excluded from
    /// its own requirements unless a cycle leads back to it, in which case it
    /// appears exactly once. Leaf items (no recipe) are included but never
    /// looked up again.
    pub fn transitive_requirements(&self, target: &str) -> BTreeSet<String> {
        let mut required = BTreeSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut worklist: Vec<&str> = vec![target];
        visited.insert(target);

        while let Some(item) = worklist.pop() {
            let Some(inputs) = self.products.get(item) else {
                continue;
            };
            for input in inputs {
                required.insert(input.clone());
                if visited.insert(input) {
                    worklist.push(input);
                }
            }
        }

        required
    }

    /// The products map restricted to the requirement closure of `target`.
    ///
    /// The target's own recipe is kept so the closure retains its terminal
    /// edges; every input list is filtered to items inside the closure, so no
    /// edge points outside the returned key set.
    pub fn induced_subgraph(&self, target: &str) -> BTreeMap<String, Vec<String>> {
        let required = self.transitive_requirements(target);
        let mut keep: BTreeSet<&str> = required.iter().map(String::as_str).collect();
        keep.insert(target);

        self.products
            .iter()
            .filter(|(product, _)| keep.contains(product.as_str()))
            .map(|(product, inputs)| {
                let inputs = inputs
                    .iter()
                    .filter(|input| keep.contains(input.as_str()))
                    .cloned()
                    .collect();
                (product.clone(), inputs)
            })
            .collect()
    }
}
