//! dem_water_service — outlier correction and water body estimates for
//! digital elevation models.
//!
//! Loads a plain-text DEM grid, finds interior cells that disagree with
//! their eight neighbors by more than 100 m, smooths them in row-major
//! order, and estimates the area and volume of water at or below a limit.

pub mod analysis;
pub mod config;
pub mod dem_file;
pub mod grid;
pub mod input;
pub mod logging;
pub mod model;
pub mod report;

pub use grid::ElevationGrid;
pub use model::{DemError, GridPoint};
