/// Integration tests for the full DEM correction pipeline
///
/// Tests verify:
/// 1. A DEM file on disk loads into the expected grid
/// 2. Outliers are detected and smoothed in row-major order
/// 3. The corrected file is written in the DEM text format and re-reads
/// 4. Area and volume estimates match hand-computed values
///
/// Run with: cargo test --test dem_pipeline

use dem_water_service::analysis::outliers::{find_outliers, smooth_all};
use dem_water_service::analysis::water_body::{area, estimate, volume};
use dem_water_service::dem_file::{corrected_path, read_dem, write_dem, CORRECTED_SUFFIX};
use dem_water_service::input::validate_path;
use dem_water_service::report::{self, RunReport};
use dem_water_service::{DemError, ElevationGrid, GridPoint};

use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Per-test scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dem_pipeline_{}_{}", std::process::id(), name));
    fs::create_dir_all(&dir).expect("temp dir should be writable");
    dir
}

fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("temp dir should be writable");
    path
}

/// A 5x5 lake: a basin of -100 m cells ringed by 20 m shore, with a fish
/// hole in the middle of the basin and a bird spike on the border corner.
const LAKE: &str = "\
5
5
20,20,20,20,20
20,-100,-100,-100,20
20,-100,-900,-100,20
20,-100,-100,-100,20
20,20,20,20,650
";

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn test_three_by_three_spike_end_to_end() {
    let dir = scratch_dir("spike");
    let source = write_source(&dir, "spike.csv", "3\n3\n0,0,0\n0,500,0\n0,0,0\n");

    let path = validate_path(&source).expect("source should validate");
    let mut grid = read_dem(&path).expect("source should parse");

    let outliers = grid.outliers();
    assert_eq!(outliers, vec![GridPoint::new(1, 1)]);

    grid.smooth_outlier(outliers[0]).expect("interior point");
    assert_eq!(grid.elevation(1, 1), Ok(0.0));

    let out = corrected_path(&path, &dir, CORRECTED_SUFFIX);
    write_dem(&grid, &out).expect("corrected file should be written");
    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "3\n3\n    0.0,     0.0,     0.0\n    0.0,     0.0,     0.0\n    0.0,     0.0,     0.0\n"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_lake_pipeline() {
    let dir = scratch_dir("lake");
    let source = write_source(&dir, "lake.csv", LAKE);
    let mut grid = read_dem(&source).expect("lake should parse");

    // (4,4) is on the border, so only the fish hole at (2,2) is reported.
    let outliers = find_outliers(&grid);
    assert_eq!(outliers, vec![GridPoint::new(2, 2)]);

    let records = report::describe_outliers(&grid, &outliers).unwrap();
    assert_eq!(records[0].elevation, -900.0);
    assert_eq!(records[0].cause.to_string(), "Fish");

    let corrections = smooth_all(&mut grid, &outliers).unwrap();
    assert_eq!(corrections[0].corrected, -100.0);
    // With the hole filled, the corner spike now drags (3,3) past the
    // threshold. A fresh scan sees it; the first scan did not.
    assert_eq!(find_outliers(&grid), vec![GridPoint::new(3, 3)]);

    // Nine basin cells at -100 m.
    assert!((area(&grid, 0.0) - 0.09).abs() < 1e-12);
    assert!((volume(&grid, 0.0) - 0.009).abs() < 1e-12);

    let out = corrected_path(&source, &dir, CORRECTED_SUFFIX);
    assert!(out.ends_with("lake-corrected.csv"));
    write_dem(&grid, &out).unwrap();
    let reread = read_dem(&out).expect("corrected file should re-read");
    assert_eq!(reread, grid);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_report_written_as_json() {
    let dir = scratch_dir("report");
    let source = write_source(&dir, "lake.csv", LAKE);
    let mut grid = read_dem(&source).unwrap();

    let mut run = RunReport::new(&source, &grid);
    let outliers = grid.outliers();
    run.outliers = report::describe_outliers(&grid, &outliers).unwrap();
    run.corrections = smooth_all(&mut grid, &outliers).unwrap();
    run.water_body = Some(estimate(&grid, 0.0));

    let json_path = dir.join("report.json");
    report::write_json(&run, &json_path).expect("report should be written");
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["corrections"][0]["original"], -900.0);
    assert_eq!(value["water_body"]["cell_count"], 9);

    let _ = fs::remove_dir_all(&dir);
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_file_is_rejected() {
    let dir = scratch_dir("malformed");
    let source = write_source(&dir, "bad.csv", "3\n3\n0,0,0\n0,x,0\n0,0,0\n");
    let err = read_dem(&source).unwrap_err();
    assert!(
        matches!(err, DemError::MalformedInput { line: 4, .. }),
        "expected malformed input at line 4, got {:?}",
        err
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_out_of_bounds_access_and_border_smoothing() {
    let mut grid: ElevationGrid = "3\n3\n0,0,0\n0,500,0\n0,0,0\n".parse().unwrap();
    let before = grid.clone();

    assert!(matches!(grid.elevation(9, 0), Err(DemError::OutOfBounds { .. })));
    assert!(matches!(
        grid.smooth_outlier(GridPoint::new(0, 1)),
        Err(DemError::OutOfBounds { .. })
    ));
    assert_eq!(grid, before);
}
