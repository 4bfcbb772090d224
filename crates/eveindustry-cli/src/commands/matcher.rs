//! Match command handler: the interactive region-matching session.
//!
//! The session is one linear pipeline: resolve a query (previous or new),
//! load the catalog, run the match, then loop on the results commands. All
//! user-input errors re-prompt; only the initial file selection is fatal.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use eveindustry_lib::{
    find_matches, list_region_files, list_saved_queries, save_results_csv, MaterialCatalog,
    MaterialSelection, QueryState, RegionCatalog, SelectionCommand, SolarSystem,
};

use crate::prompt::{prompt_choice, prompt_line};

/// Arguments for the match command.
#[derive(Debug, Clone)]
pub struct MatchCommandArgs {
    /// Directory scanned for region catalog CSV files.
    pub regions_dir: PathBuf,
    /// Directory holding saved query JSON files.
    pub queries_dir: PathBuf,
    /// Directory match results are written into.
    pub results_dir: PathBuf,
}

/// Handle the match subcommand against real stdin/stdout.
pub fn handle_match_command(args: &MatchCommandArgs) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    run_match_session(args, &mut input, &mut out)
}

/// Run the full interactive session over generic streams.
pub fn run_match_session(
    args: &MatchCommandArgs,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let materials = MaterialCatalog::builtin();

    let answer = prompt_line(input, out, "Load a previous query? [y/N]: ")?;
    let (catalog_ref, target_materials) = match answer.as_deref() {
        Some(a) if a.eq_ignore_ascii_case("y") => {
            load_previous_query(&args.queries_dir, input, out)?
        }
        _ => build_new_query(&args.regions_dir, &materials, input, out)?,
    };

    let catalog = RegionCatalog::from_path(Path::new(&catalog_ref), &materials)
        .with_context(|| format!("failed to load region catalog {catalog_ref}"))?;
    let matches: Vec<SolarSystem> = find_matches(catalog.systems(), &target_materials, &materials)
        .into_iter()
        .cloned()
        .collect();

    writeln!(out)?;
    writeln!(
        out,
        "Found {} systems matching {:?}:",
        matches.len(),
        target_materials
    )?;
    if matches.is_empty() {
        writeln!(out, "No matching systems found.")?;
        return Ok(());
    }
    for (i, system) in matches.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, system)?;
    }

    results_loop(
        &matches,
        &catalog_ref,
        &target_materials,
        args,
        &materials,
        input,
        out,
    )
}

fn load_previous_query(
    queries_dir: &Path,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(String, Vec<String>)> {
    let files = list_saved_queries(queries_dir)?;
    if files.is_empty() {
        bail!("no saved queries found in {}", queries_dir.display());
    }

    writeln!(out, "\nAvailable saved queries:")?;
    for (i, path) in files.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, display_name(path))?;
    }
    writeln!(out)?;

    let Some(choice) = prompt_choice(
        input,
        out,
        "Select query to load (enter number): ",
        files.len(),
    )?
    else {
        bail!("invalid query selection");
    };

    let state = QueryState::load(&files[choice])
        .with_context(|| format!("failed to load query {}", files[choice].display()))?;
    writeln!(
        out,
        "Loaded previous query: {} with materials {:?}",
        state.catalog, state.materials
    )?;
    Ok((state.catalog, state.materials))
}

fn build_new_query(
    regions_dir: &Path,
    materials: &MaterialCatalog,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(String, Vec<String>)> {
    let files = list_region_files(regions_dir)
        .with_context(|| format!("no region catalogs available in {}", regions_dir.display()))?;

    for (i, path) in files.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, display_name(path))?;
    }
    writeln!(out)?;

    // The one intentionally fatal path: an invalid initial file selection
    // terminates the session.
    let Some(choice) = prompt_choice(
        input,
        out,
        "Select file to read (enter number of choice): ",
        files.len(),
    )?
    else {
        bail!("invalid choice, exiting");
    };

    let catalog_ref = files[choice].to_string_lossy().into_owned();
    let selected = select_materials(materials, input, out)?;
    Ok((catalog_ref, selected))
}

fn select_materials(
    materials: &MaterialCatalog,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Vec<String>> {
    let mut selection = MaterialSelection::new(materials);
    loop {
        writeln!(out, "\n===============================")?;
        if selection.selected().is_empty() {
            writeln!(out, "No raw materials selected yet.")?;
        } else {
            writeln!(out, "Currently selected materials:")?;
            for (i, material) in selection.selected().iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, material)?;
            }
        }

        writeln!(out, "\nAvailable materials:")?;
        for (i, material) in selection.available().iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, material)?;
        }

        writeln!(out, "\nOptions:")?;
        writeln!(out, "  A <number>  - Add material from available list")?;
        writeln!(out, "  R <number>  - Remove material from selected list")?;
        writeln!(out, "  D           - Done / finish selection")?;
        writeln!(out, "===============================")?;

        let Some(line) = prompt_line(input, out, "Enter command: ")? else {
            return Ok(selection.selected().to_vec());
        };

        match SelectionCommand::parse(&line) {
            Ok(SelectionCommand::Done) => return Ok(selection.selected().to_vec()),
            Ok(SelectionCommand::Add(index)) => match selection.add(index) {
                Ok(material) => writeln!(out, "Added: {material}")?,
                Err(_) => writeln!(out, "Invalid number.")?,
            },
            Ok(SelectionCommand::Remove(index)) => match selection.remove(index) {
                Ok(material) => writeln!(out, "Removed: {material}")?,
                Err(_) => writeln!(out, "Invalid number.")?,
            },
            Err(_) => writeln!(out, "Unknown command. Use A, R, or D.")?,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn results_loop(
    matches: &[SolarSystem],
    catalog_ref: &str,
    target_materials: &[String],
    args: &MatchCommandArgs,
    materials: &MaterialCatalog,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    loop {
        let Some(line) = prompt_line(
            input,
            out,
            "\nEnter system number for details (or 'Q' to quit, 'S' to save results, 'SQ' to save query): ",
        )?
        else {
            return Ok(());
        };

        match line.to_ascii_uppercase().as_str() {
            "Q" => return Ok(()),
            "S" => save_results(matches, &args.results_dir, materials, input, out)?,
            "SQ" => save_query(catalog_ref, target_materials, &args.queries_dir, input, out)?,
            _ => match line.parse::<usize>() {
                Ok(n) if (1..=matches.len()).contains(&n) => {
                    show_system_details(&matches[n - 1], materials, out)?;
                }
                Ok(_) => writeln!(out, "Invalid number.")?,
                Err(_) => writeln!(
                    out,
                    "Invalid input. Please enter a number, 'Q', 'S', or 'SQ'."
                )?,
            },
        }
    }
}

fn save_results(
    matches: &[SolarSystem],
    results_dir: &Path,
    materials: &MaterialCatalog,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(filename) = prompt_line(input, out, "Enter CSV filename to save results: ")? else {
        return Ok(());
    };
    if filename.is_empty() {
        writeln!(out, "No filename given.")?;
        return Ok(());
    }
    let path = results_dir.join(&filename);
    match save_results_csv(matches, &path, materials) {
        Ok(()) => writeln!(out, "Results saved to {}", path.display())?,
        // Recoverable at the prompt boundary; the session continues.
        Err(err) => writeln!(out, "Failed to save results: {err}")?,
    }
    Ok(())
}

fn save_query(
    catalog_ref: &str,
    target_materials: &[String],
    queries_dir: &Path,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(filename) = prompt_line(input, out, "Enter filename to save query: ")? else {
        return Ok(());
    };
    if filename.is_empty() {
        writeln!(out, "No filename given.")?;
        return Ok(());
    }
    let state = QueryState::new(catalog_ref, target_materials.to_vec());
    match state.save(&queries_dir.join(&filename)) {
        Ok(path) => writeln!(out, "Query saved to {}", path.display())?,
        Err(err) => writeln!(out, "Failed to save query: {err}")?,
    }
    Ok(())
}

fn show_system_details(
    system: &SolarSystem,
    materials: &MaterialCatalog,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "\n{}", "=".repeat(40))?;
    writeln!(out, "Solar System: {}", system.name)?;
    writeln!(out, "Constellation: {}", system.constellation)?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "{:<20} {:<6} {}", "Planet Type", "Count", "Raw Materials")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for (planet_type, count) in system.planets() {
        let yields = materials
            .materials_for(planet_type)
            .map(|m| m.join(", "))
            .unwrap_or_default();
        writeln!(out, "{planet_type:<20} {count:<6} {yields}")?;
    }
    writeln!(out, "{}\n", "=".repeat(40))?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn args_in(dir: &Path) -> MatchCommandArgs {
        MatchCommandArgs {
            regions_dir: dir.join("Regions"),
            queries_dir: dir.join("SavedQueries"),
            results_dir: dir.join("SavedResults"),
        }
    }

    fn write_regions(dir: &Path) {
        std::fs::create_dir_all(dir.join("Regions")).expect("create regions dir");
        std::fs::write(
            dir.join("Regions/Essence.csv"),
            "Constellation,SolarSystem,Barren,Oceanic,Lava\n\
             Joas,Ordion,2,1,-\n\
             ,Vecodie,-,-,1\n",
        )
        .expect("write catalog");
    }

    fn run(args: &MatchCommandArgs, script: &str) -> (Result<()>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = run_match_session(args, &mut input, &mut out);
        (result, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn empty_selection_matches_every_system() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_regions(dir.path());
        let (result, output) = run(&args_in(dir.path()), "n\n1\nD\nQ\n");
        result.expect("session succeeds");
        assert!(output.contains("Found 2 systems"));
        assert!(output.contains("1. Ordion (Joas): Barren(2), Oceanic(1)"));
    }

    #[test]
    fn invalid_file_selection_is_fatal() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_regions(dir.path());
        let (result, _) = run(&args_in(dir.path()), "n\n9\n");
        assert!(result.is_err());
    }

    #[test]
    fn malformed_selection_commands_re_prompt() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_regions(dir.path());
        let (result, output) = run(&args_in(dir.path()), "n\n1\nX 1\nA two\nA 99\nD\nQ\n");
        result.expect("session survives bad commands");
        assert!(output.contains("Unknown command. Use A, R, or D."));
        assert!(output.contains("Invalid number."));
    }

    #[test]
    fn query_round_trip_reuses_the_saved_materials() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_regions(dir.path());
        let args = args_in(dir.path());

        // Select Felsic Magma (a Lava-only material) and save the query.
        let (result, output) = run(&args, "n\n1\nA 6\nD\nSQ\nlava\nQ\n");
        result.expect("first session succeeds");
        assert!(output.contains("Query saved to"));

        // Replaying the saved query matches only the Lava system.
        let (result, output) = run(&args, "y\n1\nQ\n");
        result.expect("replay succeeds");
        assert!(output.contains("Found 1 systems"));
        assert!(output.contains("Vecodie"));
    }

    #[test]
    fn details_view_lists_planet_types_with_materials() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_regions(dir.path());
        let (result, output) = run(&args_in(dir.path()), "n\n1\nD\n1\nQ\n");
        result.expect("session succeeds");
        assert!(output.contains("Solar System: Ordion"));
        assert!(output.contains("Barren"));
        assert!(output.contains("Carbon Compounds"));
    }

    #[test]
    fn saved_results_reproduce_the_catalog_shape() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_regions(dir.path());
        let args = args_in(dir.path());
        let (result, output) = run(&args, "n\n1\nD\nS\nmatches.csv\nQ\n");
        result.expect("session succeeds");
        assert!(output.contains("Results saved to"));

        let saved =
            std::fs::read_to_string(args.results_dir.join("matches.csv")).expect("results file");
        let header = saved.lines().next().expect("header row");
        assert!(header.starts_with("Constellation,SolarSystem,Barren,"));
        assert!(saved.contains("Joas,Ordion,2"));
    }
}
