/// Flat-file load and save for elevation grids.
///
/// Reading and writing are thin wrappers around `ElevationGrid::parse` and
/// `ElevationGrid::to_dem_string`; I/O failures are reported as
/// `DemError::Io` with the offending path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::grid::ElevationGrid;
use crate::model::DemError;

/// Default suffix appended to the input file stem for corrected output.
pub const CORRECTED_SUFFIX: &str = "-corrected";

pub fn read_dem(path: &Path) -> Result<ElevationGrid, DemError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, &e))?;
    ElevationGrid::parse(&text)
}

pub fn write_dem(grid: &ElevationGrid, path: &Path) -> Result<(), DemError> {
    fs::write(path, grid.to_dem_string()).map_err(|e| io_error(path, &e))
}

/// Builds the corrected-output path: `<output_dir>/<input stem><suffix>.csv`.
///
/// `corrected_path("data/lake.csv", ".", "-corrected")` → `./lake-corrected.csv`
pub fn corrected_path(input: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}{}.csv", stem, suffix))
}

fn io_error(path: &Path, err: &std::io::Error) -> DemError {
    DemError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
