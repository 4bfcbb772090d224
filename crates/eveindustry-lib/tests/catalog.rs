use std::io::Cursor;

use eveindustry_lib::{save_results_csv, MaterialCatalog, RegionCatalog};

fn load(csv: &str) -> RegionCatalog {
    let materials = MaterialCatalog::builtin();
    RegionCatalog::from_reader(Cursor::new(csv.as_bytes().to_vec()), &materials)
        .expect("catalog parses")
}

#[test]
fn bom_and_whitespace_are_stripped_from_headers() {
    let csv = "\u{feff}Constellation , SolarSystem ,Barren\nJoas,Ordion,2\n";
    let catalog = load(csv);
    assert_eq!(catalog.systems().len(), 1);
    let system = &catalog.systems()[0];
    assert_eq!(system.name, "Ordion");
    assert_eq!(system.count_of("Barren"), Some(2));
}

#[test]
fn blank_constellation_inherits_the_previous_value() {
    let csv = "Constellation,SolarSystem,Barren\n\
               Joas,Ordion,1\n\
               ,Vecodie,2\n\
               Mobit,Todaki,1\n\
               ,Osis,3\n";
    let catalog = load(csv);
    let constellations: Vec<&str> = catalog
        .systems()
        .iter()
        .map(|s| s.constellation.as_str())
        .collect();
    assert_eq!(constellations, vec!["Joas", "Joas", "Mobit", "Mobit"]);
}

#[test]
fn rows_before_any_constellation_default_to_unknown() {
    let csv = "Constellation,SolarSystem,Barren\n,Ordion,1\n";
    let catalog = load(csv);
    assert_eq!(catalog.systems()[0].constellation, "Unknown");
}

#[test]
fn rows_without_a_system_name_are_skipped() {
    let csv = "Constellation,SolarSystem,Barren\nJoas,,1\nJoas,Ordion,1\n";
    let catalog = load(csv);
    assert_eq!(catalog.systems().len(), 1);
    assert_eq!(catalog.systems()[0].name, "Ordion");
}

#[test]
fn dash_empty_and_malformed_counts_mean_absent() {
    let csv = "Constellation,SolarSystem,Barren,Gas,Ice,Lava\n\
               Joas,Ordion,-,,n/a,3\n";
    let catalog = load(csv);
    let system = &catalog.systems()[0];
    assert_eq!(system.count_of("Barren"), None);
    assert_eq!(system.count_of("Gas"), None);
    assert_eq!(system.count_of("Ice"), None);
    assert_eq!(system.count_of("Lava"), Some(3));
}

#[test]
fn zero_and_negative_counts_are_dropped() {
    let csv = "Constellation,SolarSystem,Barren,Gas\nJoas,Ordion,0,-2\n";
    let catalog = load(csv);
    assert!(catalog.systems()[0].planets().next().is_none());
}

#[test]
fn results_round_trip_through_the_catalog_shape() {
    let csv = "Constellation,SolarSystem,Barren,Oceanic\n\
               Joas,Ordion,2,1\n\
               ,Vecodie,1,-\n";
    let materials = MaterialCatalog::builtin();
    let catalog = load(csv);

    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("results.csv");
    let systems: Vec<_> = catalog.systems().to_vec();
    save_results_csv(&systems, &out, &materials).expect("save results");

    let reloaded = RegionCatalog::from_path(&out, &materials).expect("reload results");
    assert_eq!(reloaded.systems().len(), catalog.systems().len());
    for (original, round_tripped) in catalog.systems().iter().zip(reloaded.systems()) {
        assert_eq!(original.name, round_tripped.name);
        assert_eq!(original.constellation, round_tripped.constellation);
        // Absent types are written as 0 and dropped again on reload.
        for planet_type in materials.planet_types() {
            assert_eq!(
                original.count_of(planet_type),
                round_tripped.count_of(planet_type),
                "count mismatch for {planet_type}"
            );
        }
    }
}

#[test]
fn available_materials_is_the_union_over_present_planet_types() {
    let materials = MaterialCatalog::builtin();
    let csv = "Constellation,SolarSystem,Barren,Oceanic\nJoas,Ordion,2,1\n";
    let catalog = load(csv);
    let available = catalog.systems()[0].available_materials(&materials);

    let mut expected = std::collections::BTreeSet::new();
    for planet_type in ["Barren", "Oceanic"] {
        expected.extend(
            materials
                .materials_for(planet_type)
                .expect("known type")
                .iter()
                .cloned(),
        );
    }
    assert_eq!(available, expected);
    // Lava is absent, so its exclusive yields are not available.
    assert!(!available.contains("Felsic Magma"));
}

#[test]
fn missing_catalog_path_is_a_catalog_not_found_error() {
    let materials = MaterialCatalog::builtin();
    let err = RegionCatalog::from_path(std::path::Path::new("no/such/file.csv"), &materials)
        .expect_err("missing file should fail");
    assert!(matches!(err, eveindustry_lib::Error::CatalogNotFound { .. }));
}
