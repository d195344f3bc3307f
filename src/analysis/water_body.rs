//! Water body size estimates.
//!
//! Every cell at or below `limit` is treated as water, borders included.
//! Each cell covers a fixed `CELL_SIDE_KM × CELL_SIDE_KM` footprint.

use serde::Serialize;

use crate::grid::ElevationGrid;
use crate::model::{CELL_AREA_KM2, CELL_SIDE_KM, METERS_PER_KM};

/// Area and volume of the water body below a limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterBodyEstimate {
    /// Elevation limit in meters; cells at or below it count as water.
    pub limit: f64,
    pub cell_count: usize,
    pub area_km2: f64,
    pub volume_km3: f64,
}

/// Number of cells with elevation `<= limit`.
pub fn water_cell_count(grid: &ElevationGrid, limit: f64) -> usize {
    grid.values().filter(|&e| e <= limit).count()
}

/// Surface area in square kilometers of all cells at or below `limit`.
pub fn area(grid: &ElevationGrid, limit: f64) -> f64 {
    water_cell_count(grid, limit) as f64 * CELL_AREA_KM2
}

/// Volume in cubic kilometers of all cells at or below `limit`.
///
/// Each qualifying cell contributes its footprint times its elevation
/// converted to km. Elevations below the reference level are negative, so
/// the sum is reported as an absolute value.
pub fn volume(grid: &ElevationGrid, limit: f64) -> f64 {
    grid.values()
        .filter(|&e| e <= limit)
        .fold(0.0, |acc, e| acc + CELL_SIDE_KM * CELL_SIDE_KM * e / METERS_PER_KM)
        .abs()
}

pub fn estimate(grid: &ElevationGrid, limit: f64) -> WaterBodyEstimate {
    WaterBodyEstimate {
        limit,
        cell_count: water_cell_count(grid, limit),
        area_km2: area(grid, limit),
        volume_km3: volume(grid, limit),
    }
}

impl ElevationGrid {
    /// See [`area`].
    pub fn area(&self, limit: f64) -> f64 {
        area(self, limit)
    }

    /// See [`volume`].
    pub fn volume(&self, limit: f64) -> f64 {
        volume(self, limit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
