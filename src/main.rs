use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dem_water_service::analysis::outliers::smooth_all;
use dem_water_service::analysis::water_body::estimate;
use dem_water_service::config::Config;
use dem_water_service::dem_file::{corrected_path, read_dem, write_dem};
use dem_water_service::input::{prompt_for_path, validate_path};
use dem_water_service::logging::{self, Stage};
use dem_water_service::report::{self, RunReport};

fn main() {
    if let Err(e) = run() {
        logging::error(Stage::System, None, &e.to_string());
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    logging::init_logger(
        config.logging.min_level(),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Digital Elevation Model - Body of Water")?;

    let source = resolve_source(&mut out)?;
    let source_name = source.display().to_string();

    let mut grid = read_dem(&source).inspect_err(|e| {
        logging::log_failure(Stage::Load, &source_name, "read DEM", e);
    })?;
    logging::info(
        Stage::Load,
        Some(&source_name),
        &format!("Loaded {}x{} grid", grid.rows(), grid.columns()),
    );

    let mut run_report = RunReport::new(&source, &grid);
    report::print_header(&mut out, &run_report)?;

    // Detection and reporting use the grid as loaded.
    let outliers = grid.outliers();
    logging::debug(
        Stage::Detect,
        Some(&source_name),
        &format!("{} outlier cells detected", outliers.len()),
    );
    run_report.outliers = report::describe_outliers(&grid, &outliers)?;
    report::print_outliers(&mut out, &run_report.outliers)?;

    // Corrections are applied in detection order against the live grid.
    run_report.corrections = smooth_all(&mut grid, &outliers).inspect_err(|e| {
        logging::log_failure(Stage::Smooth, &source_name, "smooth outliers", e);
    })?;
    logging::log_smoothing_summary(run_report.corrections.len());
    report::print_corrections(&mut out, &run_report.corrections)?;

    let destination = corrected_path(&source, &config.output.directory, &config.output.suffix);
    let destination_name = destination.display().to_string();
    write_dem(&grid, &destination).inspect_err(|e| {
        logging::log_failure(Stage::Write, &destination_name, "write corrected DEM", e);
    })?;
    logging::info(
        Stage::Write,
        Some(&destination_name),
        "Corrected DEM written",
    );
    run_report.corrected_output = Some(destination_name);

    let water_body = estimate(&grid, config.estimate.limit);
    logging::debug(
        Stage::Estimate,
        None,
        &format!(
            "{} water cells at or below {} m",
            water_body.cell_count, water_body.limit
        ),
    );
    report::print_estimate(&mut out, &water_body)?;
    run_report.water_body = Some(water_body);

    if let Some(path) = &config.output.report_json {
        report::write_json(&run_report, path)?;
        logging::info(
            Stage::System,
            Some(&path.display().to_string()),
            "Run report written",
        );
    }

    Ok(())
}

/// Takes the DEM path from the first argument, or prompts on stdin.
fn resolve_source<W: Write>(out: &mut W) -> Result<PathBuf, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(arg) => {
            writeln!(out, "Filepath: {}", arg)?;
            Ok(validate_path(Path::new(&arg))?)
        }
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            prompt_for_path(&mut input, out)
        }
    }
}
