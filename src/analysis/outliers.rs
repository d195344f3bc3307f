//! Outlier detection and smoothing.
//!
//! An interior cell is an outlier when its elevation differs from the mean
//! of its eight neighbors by strictly more than `OUTLIER_THRESHOLD_M`.
//! Border cells are never evaluated.
//!
//! # Sequential smoothing
//! Smoothing reads neighbor values at call time. When two outliers are
//! mutual neighbors, correcting the first changes the mean used for the
//! second. `smooth_all` applies corrections in the order given, which is the
//! row-major order returned by `find_outliers`.

use serde::Serialize;
use std::fmt;

use crate::grid::ElevationGrid;
use crate::model::{DemError, GridPoint, OUTLIER_THRESHOLD_M};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Likely cause of a spike, judged from the sign of the bad reading:
/// depressions come from fish, peaks from birds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutlierCause {
    Fish,
    Bird,
}

impl fmt::Display for OutlierCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierCause::Fish => write!(f, "Fish"),
            OutlierCause::Bird => write!(f, "Bird"),
        }
    }
}

/// One applied correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correction {
    pub point: GridPoint,
    pub original: f64,
    pub corrected: f64,
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Returns `true` if `elevation` deviates from `neighbor_mean` by more than
/// the threshold. Exactly 100.0 is not an outlier.
pub fn exceeds_threshold(elevation: f64, neighbor_mean: f64) -> bool {
    (elevation - neighbor_mean).abs() > OUTLIER_THRESHOLD_M
}

/// Scans every interior cell and returns the outliers in row-major order.
///
/// Grids with fewer than three rows or columns have no interior and always
/// yield an empty list.
pub fn find_outliers(grid: &ElevationGrid) -> Vec<GridPoint> {
    let (rows, columns) = (grid.rows(), grid.columns());
    if rows < 3 || columns < 3 {
        return Vec::new();
    }

    let mut outliers = Vec::new();
    for r in 1..rows - 1 {
        for c in 1..columns - 1 {
            let mean = grid.neighbor_mean_unchecked(r, c);
            if exceeds_threshold(grid.value_unchecked(r, c), mean) {
                outliers.push(GridPoint::new(r, c));
            }
        }
    }
    outliers
}

/// Classifies an outlier by its elevation: at or below zero is `Fish`,
/// above zero is `Bird`.
pub fn classify(elevation: f64) -> OutlierCause {
    if elevation <= 0.0 {
        OutlierCause::Fish
    } else {
        OutlierCause::Bird
    }
}

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

/// Overwrites the cell at `point` with the current mean of its neighbors.
///
/// Fails with `OutOfBounds` for border cells and points outside the grid;
/// the grid is left untouched in that case.
pub fn smooth_outlier(grid: &mut ElevationGrid, point: GridPoint) -> Result<Correction, DemError> {
    let corrected = grid.neighbor_mean(point)?;
    let original = grid.at(point)?;
    grid.set(point, corrected)?;
    Ok(Correction {
        point,
        original,
        corrected,
    })
}

/// Smooths each point in order, stopping at the first failure.
pub fn smooth_all(
    grid: &mut ElevationGrid,
    points: &[GridPoint],
) -> Result<Vec<Correction>, DemError> {
    points
        .iter()
        .map(|&point| smooth_outlier(grid, point))
        .collect()
}

impl ElevationGrid {
    /// See [`find_outliers`].
    pub fn outliers(&self) -> Vec<GridPoint> {
        find_outliers(self)
    }

    /// See [`smooth_outlier`].
    pub fn smooth_outlier(&mut self, point: GridPoint) -> Result<Correction, DemError> {
        smooth_outlier(self, point)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
