/// Core data types for the DEM body-of-water service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond formatting, no I/O, and no external
/// dependencies other than serde derives.

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain constants
// ---------------------------------------------------------------------------

/// A cell deviating from its 8-neighbor mean by more than this many meters
/// is an outlier. The comparison is strict: a difference of exactly 100.0
/// is not an outlier.
pub const OUTLIER_THRESHOLD_M: f64 = 100.0;

/// Side length of the square ground footprint of one cell, in kilometers.
pub const CELL_SIDE_KM: f64 = 0.1;

/// Ground area represented by one cell, in square kilometers.
pub const CELL_AREA_KM2: f64 = 0.01;

/// Elevations are stored in meters; volume depth is converted to km.
pub const METERS_PER_KM: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Grid coordinates
// ---------------------------------------------------------------------------

/// A `(row, column)` handle identifying one cell of an elevation grid.
///
/// Ordering is row-major: rows compare first, then columns. Outlier
/// detection returns points in this order and batch smoothing relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridPoint {
    pub row: usize,
    pub column: usize,
}

impl GridPoint {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {:>4}, {:>4} )", self.row, self.column)
    }
}

// ---------------------------------------------------------------------------
// Fixed-point formatting
// ---------------------------------------------------------------------------

/// Formats `value` right-aligned to `width` with `decimals` fractional
/// digits, rounding exact midpoints away from zero (`0.25` → `"0.3"`,
/// `-12.25` → `"-12.3"`). Non-midpoint values round to nearest.
///
/// DEM files and report tables use this so corrected grids serialize the
/// same way as files produced by earlier tooling.
pub fn format_fixed(value: f64, width: usize, decimals: usize) -> String {
    format!(
        "{:>width$.prec$}",
        round_midpoint_away(value, decimals),
        width = width,
        prec = decimals
    )
}

/// A binary value sits exactly halfway between two `decimals`-digit
/// decimals only when `value * 2^(decimals + 1)` is an odd integer. Those
/// values are rounded here; all others are left for `{:.N}` to round.
fn round_midpoint_away(value: f64, decimals: usize) -> f64 {
    let Ok(exp) = i32::try_from(decimals) else {
        return value;
    };
    let scaled = value * 2f64.powi(exp + 1);
    if scaled.fract() != 0.0 || scaled % 2.0 == 0.0 {
        return value;
    }
    let factor = 10f64.powi(exp);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading, querying, or correcting a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum DemError {
    /// The source text does not describe a well-formed grid.
    /// `line` is 1-based; 0 means the problem is not tied to one line.
    MalformedInput { line: usize, reason: String },
    /// A coordinate lies outside the grid, or a neighborhood operation was
    /// requested for a border cell.
    OutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    /// The DEM file could not be read or written.
    Io { path: String, message: String },
}

impl DemError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        DemError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemError::MalformedInput { line: 0, reason } => {
                write!(f, "Malformed DEM input: {}", reason)
            }
            DemError::MalformedInput { line, reason } => {
                write!(f, "Malformed DEM input at line {}: {}", line, reason)
            }
            DemError::OutOfBounds {
                row,
                column,
                rows,
                columns,
            } => write!(
                f,
                "Cell ({}, {}) is out of bounds for a {}x{} grid",
                row, column, rows, columns
            ),
            DemError::Io { path, message } => write!(f, "I/O error on {}: {}", path, message),
        }
    }
}

impl std::error::Error for DemError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_point_display_is_fixed_width() {
        assert_eq!(GridPoint::new(1, 1).to_string(), "(    1,    1 )");
        assert_eq!(GridPoint::new(12, 345).to_string(), "(   12,  345 )");
    }

    #[test]
    fn test_grid_points_order_row_major() {
        let mut points = vec![
            GridPoint::new(2, 1),
            GridPoint::new(1, 3),
            GridPoint::new(1, 1),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![
                GridPoint::new(1, 1),
                GridPoint::new(1, 3),
                GridPoint::new(2, 1)
            ]
        );
    }

    #[test]
    fn test_fixed_format_rounds_midpoints_away_from_zero() {
        assert_eq!(format_fixed(0.25, 7, 1), "    0.3");
        assert_eq!(format_fixed(112.25, 7, 1), "  112.3");
        assert_eq!(format_fixed(-12.25, 7, 1), "  -12.3");
        assert_eq!(format_fixed(0.75, 7, 1), "    0.8");
        assert_eq!(format_fixed(2.5, 5, 0), "    3");
        assert_eq!(format_fixed(-0.5, 5, 0), "   -1");
    }

    #[test]
    fn test_fixed_format_leaves_non_midpoints_alone() {
        // 0.15 is stored just below the midpoint, so it rounds down.
        assert_eq!(format_fixed(0.15, 7, 1), "    0.1");
        assert_eq!(format_fixed(-12.34, 7, 1), "  -12.3");
        assert_eq!(format_fixed(1234.56, 7, 1), " 1234.6");
        assert_eq!(format_fixed(0.04, 5, 0), "    0");
        assert_eq!(format_fixed(7.0, 7, 1), "    7.0");
    }

    #[test]
    fn test_cell_area_matches_footprint() {
        assert!((CELL_SIDE_KM * CELL_SIDE_KM - CELL_AREA_KM2).abs() < 1e-12);
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = DemError::malformed(4, "expected 3 values, found 2");
        assert_eq!(
            err.to_string(),
            "Malformed DEM input at line 4: expected 3 values, found 2"
        );

        let err = DemError::OutOfBounds {
            row: 0,
            column: 5,
            rows: 3,
            columns: 3,
        };
        assert!(err.to_string().contains("(0, 5)"));
        assert!(err.to_string().contains("3x3"));
    }
}
