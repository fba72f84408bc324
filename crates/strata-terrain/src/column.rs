//! Per-cell vertical column description: elevation, jagged perturbation and
//! pillar fill.

use rand::Rng;

use crate::error::TerrainError;
use crate::levels::{TerrainLevelTable, TileId};
use crate::params::GenerationParameters;

/// Vertical spacing between pillar fill entries.
pub const FILL_STRIDE: i32 = 3;

/// Everything the painter needs to place one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Terrain level index into the table.
    pub level: usize,
    /// Tile placed at the top and for every fill entry.
    pub tile: TileId,
    /// Foliage tile placed above the column, if any.
    pub foliage: Option<TileId>,
    /// Discretized elevation before jagged perturbation.
    pub base_z: i32,
    /// Final elevation after jagged perturbation.
    pub z: i32,
    /// Whether the jagged roll sank this cell.
    pub jagged: bool,
    /// Pillar fill elevations, descending, all strictly positive.
    pub fills: Vec<i32>,
}

/// Turns `(height, level)` pairs into [`Column`]s under one parameter set.
#[derive(Clone, Debug)]
pub struct ColumnBuilder<'a> {
    table: &'a TerrainLevelTable,
    height_multiplier: i32,
    flatten: bool,
    fill_gaps: bool,
    jagged: bool,
    jagged_percent: f64,
}

impl<'a> ColumnBuilder<'a> {
    /// Create a builder for the given table and parameters.
    pub fn new(params: &GenerationParameters, table: &'a TerrainLevelTable) -> Self {
        Self {
            table,
            height_multiplier: params.height_multiplier,
            flatten: params.flatten,
            fill_gaps: params.fill_gaps,
            jagged: params.jagged,
            jagged_percent: params.jagged_percent.clamp(0.0, 1.0),
        }
    }

    /// Discretized elevation for a normalized height.
    ///
    /// `floor(height * level_count * 2) * height_multiplier`, or zero when flattened.
    pub fn base_elevation(&self, height: f64) -> i32 {
        if self.flatten {
            return 0;
        }
        let tile_height = height * self.table.len() as f64 * 2.0;
        (tile_height.floor() as i32).saturating_mul(self.height_multiplier)
    }

    /// Build the column for one cell.
    ///
    /// When jagged is enabled exactly one value is drawn from `rng`; the cell
    /// sinks by its level's elevation delta (never below zero) when the draw is
    /// `>= 1 - jagged_percent`. A percent of `1.0` sinks every cell by its
    /// level's delta, which reads as no perturbation at all.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::LevelOutOfRange`] if `level` is not in the table.
    pub fn build<R: Rng>(
        &self,
        height: f64,
        level: usize,
        rng: &mut R,
    ) -> Result<Column, TerrainError> {
        let terrain = self.table.get(level)?;
        let base_z = self.base_elevation(height);

        let mut z = base_z;
        let mut jagged = false;
        if self.jagged {
            let roll: f64 = rng.random();
            if roll >= 1.0 - self.jagged_percent {
                z = (z - terrain.elevation_delta).max(0);
                jagged = true;
            }
        }

        let fills = if self.fill_gaps {
            pillar_fills(z)
        } else {
            Vec::new()
        };

        Ok(Column {
            level,
            tile: terrain.display_tile(),
            foliage: None,
            base_z,
            z,
            jagged,
            fills,
        })
    }
}

/// Pillar fill elevations below `z`: `z - 3, z - 6, ...` while strictly positive.
///
/// Empty unless `z - 3 > 0`.
pub fn pillar_fills(z: i32) -> Vec<i32> {
    let mut fills = Vec::new();
    let mut current = z - FILL_STRIDE;
    while current > 0 {
        fills.push(current);
        current -= FILL_STRIDE;
    }
    fills
}
