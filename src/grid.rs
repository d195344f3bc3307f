/// Dense elevation grid storage.
///
/// `ElevationGrid` owns a row-major buffer of `rows × columns` finite
/// elevations in meters. Dimensions never change after construction; the
/// only mutation is a single-cell overwrite performed by outlier smoothing.
///
/// The plain-text DEM format handled here:
///
/// ```text
/// 3
/// 3
///     0.0,     0.0,     0.0
///     0.0,   500.0,     0.0
///     0.0,     0.0,     0.0
/// ```
///
/// Line 1 is the row count, line 2 the column count, then one line of
/// comma-separated values per row.

use crate::model::{format_fixed, DemError, GridPoint};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
}

impl ElevationGrid {
    /// Builds a grid from row-major values.
    pub fn new(rows: usize, columns: usize, values: Vec<f64>) -> Result<Self, DemError> {
        let cells = cell_count(rows, columns)?;
        if values.len() != cells {
            return Err(DemError::malformed(
                0,
                format!(
                    "{}x{} grid needs {} values, got {}",
                    rows,
                    columns,
                    cells,
                    values.len()
                ),
            ));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(DemError::malformed(
                0,
                format!(
                    "value at ({}, {}) is not finite",
                    index / columns,
                    index % columns
                ),
            ));
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Parses the plain-text DEM format.
    pub fn parse(text: &str) -> Result<Self, DemError> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

        let rows = parse_count(lines.next(), 1, "row")?;
        let columns = parse_count(lines.next(), 2, "column")?;
        cell_count(rows, columns)?;

        // Grows with the rows actually present; the header is not trusted
        // for allocation.
        let mut values = Vec::new();
        for r in 0..rows {
            let (line_no, line) = lines.next().ok_or_else(|| {
                DemError::malformed(0, format!("declared {} rows, found {}", rows, r))
            })?;
            parse_row(line, line_no, columns, &mut values)?;
        }

        // Trailing blank lines are tolerated; anything else is an extra row.
        let extra = lines.filter(|(_, line)| !line.trim().is_empty()).count();
        if extra > 0 {
            return Err(DemError::malformed(
                0,
                format!("declared {} rows, found {}", rows, rows + extra),
            ));
        }

        Self::new(rows, columns, values)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the elevation stored at `(row, column)`.
    pub fn elevation(&self, row: usize, column: usize) -> Result<f64, DemError> {
        self.index_of(row, column).map(|i| self.values[i])
    }

    /// Returns the elevation at `point`.
    pub fn at(&self, point: GridPoint) -> Result<f64, DemError> {
        self.elevation(point.row, point.column)
    }

    pub fn contains(&self, point: GridPoint) -> bool {
        point.row < self.rows && point.column < self.columns
    }

    /// True when all eight neighbors of `point` exist.
    pub fn is_interior(&self, point: GridPoint) -> bool {
        point.row >= 1
            && point.column >= 1
            && point.row + 1 < self.rows
            && point.column + 1 < self.columns
    }

    /// Mean of the eight Moore neighbors of an interior cell, read from the
    /// grid as currently stored.
    pub fn neighbor_mean(&self, point: GridPoint) -> Result<f64, DemError> {
        if !self.is_interior(point) {
            return Err(self.out_of_bounds(point.row, point.column));
        }
        Ok(self.neighbor_mean_unchecked(point.row, point.column))
    }

    /// Iterates over every cell as `(point, elevation)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, f64)> + '_ {
        let columns = self.columns;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (GridPoint::new(i / columns, i % columns), v))
    }

    /// Iterates over the raw elevations in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Serializes the grid back into the DEM text format: each value with
    /// one fractional digit, right-aligned to width 7, separated by `", "`.
    pub fn to_dem_string(&self) -> String {
        self.to_string()
    }

    // -----------------------------------------------------------------------
    // Crate-internal mutation and indexing
    // -----------------------------------------------------------------------

    pub(crate) fn set(&mut self, point: GridPoint, value: f64) -> Result<(), DemError> {
        let i = self.index_of(point.row, point.column)?;
        self.values[i] = value;
        Ok(())
    }

    /// Neighbors are summed in a fixed order so corrected values are
    /// reproducible bit for bit. Caller guarantees the cell is interior.
    pub(crate) fn neighbor_mean_unchecked(&self, r: usize, c: usize) -> f64 {
        let get = |row: usize, column: usize| self.values[row * self.columns + column];
        let sum = get(r - 1, c - 1)
            + get(r, c - 1)
            + get(r + 1, c - 1)
            + get(r - 1, c)
            + get(r + 1, c)
            + get(r - 1, c + 1)
            + get(r, c + 1)
            + get(r + 1, c + 1);
        sum / 8.0
    }

    pub(crate) fn value_unchecked(&self, r: usize, c: usize) -> f64 {
        self.values[r * self.columns + c]
    }

    fn index_of(&self, row: usize, column: usize) -> Result<usize, DemError> {
        if row < self.rows && column < self.columns {
            Ok(row * self.columns + column)
        } else {
            Err(self.out_of_bounds(row, column))
        }
    }

    pub(crate) fn out_of_bounds(&self, row: usize, column: usize) -> DemError {
        DemError::OutOfBounds {
            row,
            column,
            rows: self.rows,
            columns: self.columns,
        }
    }
}

impl FromStr for ElevationGrid {
    type Err = DemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ElevationGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.rows)?;
        writeln!(f, "{}", self.columns)?;
        for r in 0..self.rows {
            for c in 0..self.columns {
                let value = format_fixed(self.value_unchecked(r, c), 7, 1);
                if c + 1 == self.columns {
                    write!(f, "{}", value)?;
                } else {
                    write!(f, "{}, ", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn cell_count(rows: usize, columns: usize) -> Result<usize, DemError> {
    rows.checked_mul(columns).ok_or_else(|| {
        DemError::malformed(0, format!("{}x{} grid is too large", rows, columns))
    })
}

fn parse_count(line: Option<(usize, &str)>, line_no: usize, what: &str) -> Result<usize, DemError> {
    let (_, text) =
        line.ok_or_else(|| DemError::malformed(line_no, format!("missing {} count", what)))?;
    text.trim().parse::<usize>().map_err(|_| {
        DemError::malformed(
            line_no,
            format!("{} count '{}' is not a non-negative integer", what, text.trim()),
        )
    })
}

fn parse_row(
    line: &str,
    line_no: usize,
    columns: usize,
    values: &mut Vec<f64>,
) -> Result<(), DemError> {
    if line.trim().is_empty() {
        if columns == 0 {
            return Ok(());
        }
        return Err(DemError::malformed(line_no, "blank line where a row was expected"));
    }

    let cells: Vec<&str> = line.split(',').collect();
    if cells.len() != columns {
        return Err(DemError::malformed(
            line_no,
            format!("expected {} values, found {}", columns, cells.len()),
        ));
    }

    for cell in cells {
        let cell = cell.trim();
        let value = cell
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                DemError::malformed(line_no, format!("'{}' is not a finite number", cell))
            })?;
        values.push(value);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
