//! Height-to-level classification by linear scan over a threshold table.

use crate::grid::Grid;
use crate::levels::{FoliageTable, TerrainLevelTable, TileId};

/// Index of the first level whose `threshold / 100 >= height`.
///
/// Heights above every threshold fall back to level 0 rather than the top
/// level. Tables are short, so a linear scan is used.
pub fn classify(height: f64, table: &TerrainLevelTable) -> usize {
    table
        .levels()
        .iter()
        .position(|level| height <= level.normalized_threshold())
        .unwrap_or(0)
}

/// Classify every cell of a height field.
pub fn classify_grid(heights: &Grid<f64>, table: &TerrainLevelTable) -> Grid<usize> {
    heights.map(|&h| classify(h, table))
}

/// Foliage tile for a height, or `None` if the height is above every foliage band.
pub fn classify_foliage(height: f64, table: &FoliageTable) -> Option<TileId> {
    table
        .levels()
        .iter()
        .find(|level| height <= level.threshold / 100.0)
        .map(|level| level.tile)
}
