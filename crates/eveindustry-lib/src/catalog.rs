//! Region catalog loading and result export.
//!
//! Region catalog files are comma-delimited exports with a `Constellation`
//! column, a `SolarSystem` column, and one column per planet type. Cells may
//! carry surrounding whitespace and the first header a UTF-8 byte-order
//! marker; both are stripped before parsing.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::materials::MaterialCatalog;

/// Column header naming the constellation a system belongs to.
const CONSTELLATION_COLUMN: &str = "Constellation";
/// Column header naming the solar system.
const SYSTEM_COLUMN: &str = "SolarSystem";
/// Constellation assigned to leading rows with no constellation cell.
const UNKNOWN_CONSTELLATION: &str = "Unknown";

/// A solar system with its per-planet-type counts.
///
/// Counts are always greater than zero; zero, negative, and malformed counts
/// are dropped at construction. Planet types keep the catalog column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarSystem {
    pub constellation: String,
    pub name: String,
    planets: Vec<(String, u32)>,
}

impl SolarSystem {
    /// Build a system, keeping only planet types with a positive count.
    pub fn new<I>(constellation: &str, name: &str, planets: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let planets = planets
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(planet_type, count)| (planet_type, count as u32))
            .collect();
        Self {
            constellation: constellation.trim().to_string(),
            name: name.trim().to_string(),
            planets,
        }
    }

    /// Planet types present in this system, in catalog column order.
    pub fn planets(&self) -> impl Iterator<Item = (&str, u32)> {
        self.planets
            .iter()
            .map(|(planet_type, count)| (planet_type.as_str(), *count))
    }

    /// Count of planets of the given type, if any are present.
    pub fn count_of(&self, planet_type: &str) -> Option<u32> {
        self.planets
            .iter()
            .find(|(candidate, _)| candidate == planet_type)
            .map(|&(_, count)| count)
    }

    /// Union of the raw materials yielded by this system's planet types.
    ///
    /// Planet types absent from the material catalog contribute nothing.
    pub fn available_materials(&self, materials: &MaterialCatalog) -> BTreeSet<String> {
        let mut available = BTreeSet::new();
        for (planet_type, _) in &self.planets {
            if let Some(yields) = materials.materials_for(planet_type) {
                available.extend(yields.iter().cloned());
            }
        }
        available
    }
}

impl fmt::Display for SolarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .planets
            .iter()
            .map(|(planet_type, count)| format!("{planet_type}({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} ({}): {}", self.name, self.constellation, summary)
    }
}

/// Region catalog loaded from a CSV export.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    systems: Vec<SolarSystem>,
    source: Option<PathBuf>,
}

impl RegionCatalog {
    /// Load a region catalog from a file path.
    pub fn from_path(path: &Path, materials: &MaterialCatalog) -> Result<Self> {
        if !path.exists() {
            return Err(Error::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file, materials)?;
        catalog.source = Some(path.to_path_buf());
        debug!(path = %path.display(), systems = catalog.systems.len(), "loaded region catalog");
        Ok(catalog)
    }

    /// Load a region catalog from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R, materials: &MaterialCatalog) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let column = |name: &str| headers.iter().position(|h| h == name);
        let constellation_col = column(CONSTELLATION_COLUMN);
        let system_col = column(SYSTEM_COLUMN);
        let planet_cols: Vec<(String, Option<usize>)> = materials
            .planet_types()
            .map(|planet_type| (planet_type.to_string(), column(planet_type)))
            .collect();

        let mut systems = Vec::new();
        // Carry-forward fold: a blank constellation cell inherits the most
        // recently seen non-blank value in file order.
        let mut last_constellation: Option<String> = None;

        for record in csv_reader.records() {
            let record = record?;
            let cell = |col: Option<usize>| col.and_then(|i| record.get(i)).unwrap_or("").trim();

            let constellation = match cell(constellation_col) {
                "" => last_constellation
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CONSTELLATION.to_string()),
                value => {
                    last_constellation = Some(value.to_string());
                    value.to_string()
                }
            };

            let name = cell(system_col);
            if name.is_empty() {
                continue;
            }

            let mut planets = Vec::new();
            for (planet_type, col) in &planet_cols {
                let value = cell(*col);
                if value.is_empty() || value == "-" {
                    continue;
                }
                match value.parse::<i64>() {
                    Ok(count) => planets.push((planet_type.clone(), count)),
                    // Malformed counts mean "not present", never an error.
                    Err(_) => {
                        debug!(
                            system = name,
                            planet_type = %planet_type,
                            value,
                            "ignoring malformed planet count"
                        );
                    }
                }
            }

            systems.push(SolarSystem::new(&constellation, name, planets));
        }

        Ok(Self {
            systems,
            source: None,
        })
    }

    /// Systems in file order.
    pub fn systems(&self) -> &[SolarSystem] {
        &self.systems
    }

    /// The source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// List the CSV catalog files in a directory, sorted by file name.
pub fn list_region_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::CatalogNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(Error::EmptyCatalogDir {
            path: dir.to_path_buf(),
        });
    }
    Ok(files)
}

/// Write matched systems back out in the catalog column shape.
///
/// Every planet-type column is emitted in catalog order regardless of which
/// types a given system has; absent types are written as `0`.
pub fn save_results_csv(
    systems: &[SolarSystem],
    path: &Path,
    materials: &MaterialCatalog,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = WriterBuilder::new().from_path(path)?;

    let mut header = vec![CONSTELLATION_COLUMN.to_string(), SYSTEM_COLUMN.to_string()];
    header.extend(materials.planet_types().map(|t| t.to_string()));
    writer.write_record(&header)?;

    for system in systems {
        let mut row = vec![system.constellation.clone(), system.name.clone()];
        for planet_type in materials.planet_types() {
            row.push(system.count_of(planet_type).unwrap_or(0).to_string());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    debug!(path = %path.display(), systems = systems.len(), "saved match results");
    Ok(())
}
