/// Grid analysis for the DEM body-of-water service.
///
/// Submodules:
/// - `outliers` — detects cells that disagree with their neighborhood and
///   smooths them back toward it.
/// - `water_body` — area and volume estimates for cells at or below a limit.

pub mod outliers;
pub mod water_body;
