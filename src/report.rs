//! Run report.
//!
//! Collects what a single load → detect → smooth → estimate run found and
//! renders it as console tables or pretty-printed JSON.

use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::outliers::{classify, Correction, OutlierCause};
use crate::analysis::water_body::WaterBodyEstimate;
use crate::grid::ElevationGrid;
use crate::model::{format_fixed, DemError, GridPoint};

// ============================================================================
// Report Structures
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub source: String,
    pub corrected_output: Option<String>,
    pub rows: usize,
    pub columns: usize,
    pub outliers: Vec<OutlierRecord>,
    pub corrections: Vec<Correction>,
    pub water_body: Option<WaterBodyEstimate>,
}

/// A detected outlier as it was before smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierRecord {
    pub point: GridPoint,
    pub elevation: f64,
    pub cause: OutlierCause,
}

impl RunReport {
    pub fn new(source: &Path, grid: &ElevationGrid) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            corrected_output: None,
            rows: grid.rows(),
            columns: grid.columns(),
            outliers: Vec::new(),
            corrections: Vec::new(),
            water_body: None,
        }
    }
}

/// Reads each outlier's current elevation and classifies it.
pub fn describe_outliers(
    grid: &ElevationGrid,
    outliers: &[GridPoint],
) -> Result<Vec<OutlierRecord>, DemError> {
    outliers
        .iter()
        .map(|&point| {
            let elevation = grid.at(point)?;
            Ok(OutlierRecord {
                point,
                elevation,
                cause: classify(elevation),
            })
        })
        .collect()
}

// ============================================================================
// Console Output
// ============================================================================

pub fn print_header<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(out, "     Rows:   {}", report.rows)?;
    writeln!(out, "  Columns:   {}", report.columns)?;
    writeln!(out)
}

pub fn print_outliers<W: Write>(out: &mut W, outliers: &[OutlierRecord]) -> io::Result<()> {
    writeln!(out, "Detected Outlier Cells")?;
    writeln!(out, "  Elevation   DEM Grid Cell   Problem")?;
    for o in outliers {
        writeln!(
            out,
            "  {} m   {:<12}    {:>4} ",
            format_fixed(o.elevation, 7, 1),
            o.point.to_string(),
            o.cause.to_string()
        )?;
    }
    Ok(())
}

pub fn print_corrections<W: Write>(out: &mut W, corrections: &[Correction]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Corrected Outlier Cells")?;
    writeln!(out, "  Elevation   DEM Grid Cell")?;
    for c in corrections {
        writeln!(
            out,
            "  {} m   {:<12}",
            format_fixed(c.corrected, 7, 1),
            c.point.to_string()
        )?;
    }
    Ok(())
}

pub fn print_estimate<W: Write>(out: &mut W, estimate: &WaterBodyEstimate) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Water Body Size Estimates")?;
    writeln!(out, "    Area:   {} square km", format_fixed(estimate.area_km2, 5, 0))?;
    writeln!(out, "  Volume:   {} cubic km", format_fixed(estimate.volume_km3, 5, 0))
}

// ============================================================================
// JSON Output
// ============================================================================

pub fn to_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn write_json(report: &RunReport, path: &Path) -> Result<(), DemError> {
    let json = to_json(report).map_err(|e| DemError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    fs::write(path, json).map_err(|e| DemError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
