//! Planet-type to raw-material reference data.
//!
//! The in-game extraction table is fixed: eight planet types, each yielding
//! exactly five raw materials. The table is modeled as an injected value so
//! alternate catalogs can be supplied in tests instead of reaching for a
//! process-wide global.

use std::collections::HashMap;

/// Reference extraction table (game-provided data). Order is the canonical
/// column order used by region catalog files and saved results.
const BUILTIN_TABLE: &[(&str, [&str; 5])] = &[
    (
        "Barren",
        [
            "Aqueous Liquids",
            "Base Metals",
            "Carbon Compounds",
            "Microorganisms",
            "Noble Metals",
        ],
    ),
    (
        "Gas",
        [
            "Aqueous Liquids",
            "Base Metals",
            "Ionic Solutions",
            "Noble Gas",
            "Reactive Gas",
        ],
    ),
    (
        "Ice",
        [
            "Aqueous Liquids",
            "Heavy Metals",
            "Microorganisms",
            "Noble Gas",
            "Planktic Colonies",
        ],
    ),
    (
        "Lava",
        [
            "Base Metals",
            "Felsic Magma",
            "Heavy Metals",
            "Non-CS Crystals",
            "Suspended Plasma",
        ],
    ),
    (
        "Oceanic",
        [
            "Aqueous Liquids",
            "Carbon Compounds",
            "Complex Organisms",
            "Microorganisms",
            "Planktic Colonies",
        ],
    ),
    (
        "Plasma",
        [
            "Base Metals",
            "Heavy Metals",
            "Noble Metals",
            "Non-CS Crystals",
            "Suspended Plasma",
        ],
    ),
    (
        "Storm",
        [
            "Aqueous Liquids",
            "Base Metals",
            "Ionic Solutions",
            "Noble Gas",
            "Suspended Plasma",
        ],
    ),
    (
        "Temperate",
        [
            "Aqueous Liquids",
            "Autotrophs",
            "Carbon Compounds",
            "Complex Organisms",
            "Microorganisms",
        ],
    ),
];

/// Immutable mapping from planet type to the raw materials it can yield.
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl MaterialCatalog {
    /// Construct the catalog from the built-in game reference table.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_TABLE.iter().map(|(planet_type, materials)| {
            (
                planet_type.to_string(),
                materials.iter().map(|m| m.to_string()).collect(),
            )
        }))
    }

    /// Construct a catalog from arbitrary entries, preserving their order.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let entries: Vec<(String, Vec<String>)> = entries.into_iter().collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (planet_type, _))| (planet_type.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Materials yielded by a planet type, or `None` for types the table does
    /// not know about. Unknown types contribute nothing; they are not errors.
    pub fn materials_for(&self, planet_type: &str) -> Option<&[String]> {
        self.index
            .get(planet_type)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Planet types in canonical catalog order.
    pub fn planet_types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(planet_type, _)| planet_type.as_str())
    }

    /// Sorted, deduplicated union of every material in the table.
    pub fn all_materials(&self) -> Vec<String> {
        let mut materials: Vec<String> = self
            .entries
            .iter()
            .flat_map(|(_, materials)| materials.iter().cloned())
            .collect();
        materials.sort();
        materials.dedup();
        materials
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
