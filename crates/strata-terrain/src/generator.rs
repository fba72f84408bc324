//! Full generation pipeline: noise, falloff, compositing, classification and
//! column building.
//!
//! Every call recomputes the whole grid from the inputs. Each stage produces
//! a new grid from the previous stage's output.

use tracing::{debug, debug_span};

use crate::classifier::{classify_foliage, classify_grid};
use crate::column::{Column, ColumnBuilder};
use crate::compositor::{CompositeFlags, composite};
use crate::curve::RemapCurve;
use crate::error::TerrainError;
use crate::falloff::generate_falloff;
use crate::grid::Grid;
use crate::levels::{FoliageTable, TerrainLevelTable};
use crate::noise_field::NoiseField;
use crate::params::GenerationParameters;
use crate::seed::cell_rng;

/// Result of one generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMap {
    /// Side length of the square grid.
    pub dimension: usize,
    /// Final normalized heights in `[0, 1]`.
    pub heights: Grid<f64>,
    /// Terrain level index per cell.
    pub levels: Grid<usize>,
    /// Column description per cell.
    pub columns: Grid<Column>,
}

/// Runs the pipeline stages for one parameter set and level table.
pub struct TerrainGenerator<'a> {
    params: GenerationParameters,
    table: &'a TerrainLevelTable,
    foliage: Option<&'a FoliageTable>,
}

impl<'a> TerrainGenerator<'a> {
    /// Create a generator. Parameters are sanitized on the way in.
    pub fn new(params: &GenerationParameters, table: &'a TerrainLevelTable) -> Self {
        Self {
            params: params.sanitized(),
            table,
            foliage: None,
        }
    }

    /// Also classify each column against a foliage table.
    pub fn with_foliage(mut self, foliage: &'a FoliageTable) -> Self {
        self.foliage = Some(foliage);
        self
    }

    /// The sanitized parameters in use.
    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Stage 1: the normalized noise grid.
    pub fn noise(&self) -> Grid<f64> {
        let n = self.params.dimension;
        NoiseField::new(&self.params, n, n).generate(self.params.normalization)
    }

    /// Stage 2: the falloff mask, sized to match the height field, if enabled.
    pub fn falloff(&self) -> Option<Grid<f64>> {
        self.params
            .use_falloff
            .then(|| generate_falloff(self.params.dimension, &self.params.falloff))
    }

    /// Stage 3 with the parameters' own height curve.
    pub fn heights(&self) -> Result<Grid<f64>, TerrainError> {
        self.heights_with_curve(&self.params.height_curve)
    }

    /// Stage 3 with a caller-supplied remap curve.
    pub fn heights_with_curve(&self, curve: &impl RemapCurve) -> Result<Grid<f64>, TerrainError> {
        let noise = self.noise();
        let falloff = self.falloff();
        let flags = CompositeFlags {
            falloff_only: self.params.falloff_only,
            invert: self.params.invert,
        };
        composite(&noise, falloff.as_ref(), curve, flags)
    }

    /// Stages 4 and 5 over an already composited height field.
    pub fn build_columns(
        &self,
        heights: &Grid<f64>,
    ) -> Result<(Grid<usize>, Grid<Column>), TerrainError> {
        let levels = classify_grid(heights, self.table);
        let builder = ColumnBuilder::new(&self.params, self.table);

        let columns = Grid::try_from_fn(heights.width(), heights.height(), |x, y| {
            let height = heights[(x, y)];
            let mut rng = cell_rng(self.params.seed, x, y);
            let mut column = builder.build(height, levels[(x, y)], &mut rng)?;
            column.foliage = self.foliage.and_then(|f| classify_foliage(height, f));
            Ok(column)
        })?;
        Ok((levels, columns))
    }

    /// Run every stage.
    pub fn generate(&self) -> Result<TerrainMap, TerrainError> {
        self.generate_with_curve(&self.params.height_curve)
    }

    /// Run every stage with a caller-supplied remap curve.
    pub fn generate_with_curve(&self, curve: &impl RemapCurve) -> Result<TerrainMap, TerrainError> {
        let span = debug_span!(
            "generate_terrain",
            dimension = self.params.dimension,
            seed = self.params.seed
        );
        let _enter = span.enter();

        let heights = self.heights_with_curve(curve)?;
        let (levels, columns) = self.build_columns(&heights)?;

        let jagged = columns.as_slice().iter().filter(|c| c.jagged).count();
        debug!(
            cells = columns.as_slice().len(),
            jagged,
            levels = self.table.len(),
            "terrain generated"
        );

        Ok(TerrainMap {
            dimension: self.params.dimension,
            heights,
            levels,
            columns,
        })
    }
}

/// Convenience wrapper: generate a map in one call.
pub fn generate_map(
    params: &GenerationParameters,
    table: &TerrainLevelTable,
    foliage: Option<&FoliageTable>,
) -> Result<TerrainMap, TerrainError> {
    let generator = TerrainGenerator::new(params, table);
    match foliage {
        Some(foliage) => generator.with_foliage(foliage).generate(),
        None => generator.generate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{FoliageLevel, TerrainLevel, TileId};

    fn table() -> TerrainLevelTable {
        TerrainLevelTable::new(vec![
            TerrainLevel::new(30.0, TileId(0)).with_elevation_delta(1),
            TerrainLevel::new(50.0, TileId(1)).with_elevation_delta(1),
            TerrainLevel::new(75.0, TileId(2)).with_elevation_delta(2),
            TerrainLevel::new(100.0, TileId(3)).with_elevation_delta(3),
        ])
        .unwrap()
    }

    fn params() -> GenerationParameters {
        GenerationParameters {
            dimension: 24,
            seed: 11,
            scale: 12.0,
            octaves: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_shapes_match_dimension() {
        let map = generate_map(&params(), &table(), None).unwrap();
        assert_eq!(map.heights.dimensions(), (24, 24));
        assert_eq!(map.levels.dimensions(), (24, 24));
        assert_eq!(map.columns.dimensions(), (24, 24));
    }

    #[test]
    fn test_generation_is_deterministic_with_jagged() {
        let p = GenerationParameters {
            jagged: true,
            jagged_percent: 0.4,
            fill_gaps: true,
            ..params()
        };
        let a = generate_map(&p, &table(), None).unwrap();
        let b = generate_map(&p, &table(), None).unwrap();
        assert_eq!(a, b, "per-cell streams must make jagged output repeatable");
    }

    #[test]
    fn test_levels_match_columns() {
        let map = generate_map(&params(), &table(), None).unwrap();
        for (x, y, column) in map.columns.iter_cells() {
            assert_eq!(column.level, map.levels[(x, y)], "mismatch at ({x}, {y})");
        }
    }

    #[test]
    fn test_falloff_only_returns_mask() {
        let p = GenerationParameters {
            use_falloff: true,
            falloff_only: true,
            ..params()
        };
        let t = table();
        let heights = TerrainGenerator::new(&p, &t).heights().unwrap();
        let mask = generate_falloff(24, &p.falloff);
        assert_eq!(heights, mask);
    }

    #[test]
    fn test_falloff_lowers_edges() {
        let plain = generate_map(&params(), &table(), None).unwrap();
        let island = generate_map(
            &GenerationParameters {
                use_falloff: true,
                ..params()
            },
            &table(),
            None,
        )
        .unwrap();
        let corner = island.heights[(0, 0)];
        assert!(corner <= plain.heights[(0, 0)], "falloff must not raise the corner");
        assert_eq!(corner, 0.0, "corner mask is ~1 so the corner should clamp to 0");
    }

    #[test]
    fn test_caller_curve_is_used() {
        let t = table();
        let generator = TerrainGenerator::new(&params(), &t);
        let zero = generator.heights_with_curve(&|_t: f64| 0.0).unwrap();
        assert!(zero.as_slice().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_foliage_is_attached() {
        let foliage = FoliageTable::new(vec![FoliageLevel {
            threshold: 100.0,
            tile: TileId(42),
        }])
        .unwrap();
        let map = generate_map(&params(), &table(), Some(&foliage)).unwrap();
        assert!(map.columns.as_slice().iter().all(|c| c.foliage == Some(TileId(42))));
    }
}
