//! Ordered threshold tables that partition normalized height into bands.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Opaque tile identifier handed to the painter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u16);

/// One band of the terrain table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainLevel {
    /// Upper bound of `height * 100` that maps to this level, in `[0, 100]`.
    pub threshold: f64,
    /// Tile placed for this level.
    pub tile: TileId,
    /// Animated variant preferred by the painter when present.
    #[serde(default)]
    pub animated_tile: Option<TileId>,
    /// RGBA color used by the noise preview.
    #[serde(default = "default_color")]
    pub color: [u8; 4],
    /// How far a jagged cell of this level sinks.
    #[serde(default)]
    pub elevation_delta: i32,
}

fn default_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

impl TerrainLevel {
    /// A level with only threshold and tile set.
    pub fn new(threshold: f64, tile: TileId) -> Self {
        Self {
            threshold,
            tile,
            animated_tile: None,
            color: default_color(),
            elevation_delta: 0,
        }
    }

    /// Set the preview color.
    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    /// Set the jagged elevation delta.
    pub fn with_elevation_delta(mut self, delta: i32) -> Self {
        self.elevation_delta = delta;
        self
    }

    /// Set the animated tile variant.
    pub fn with_animated_tile(mut self, tile: TileId) -> Self {
        self.animated_tile = Some(tile);
        self
    }

    /// Tile the painter should place: the animated variant if any, otherwise the static tile.
    pub fn display_tile(&self) -> TileId {
        self.animated_tile.unwrap_or(self.tile)
    }

    /// Threshold as a normalized height in `[0, 1]`.
    pub fn normalized_threshold(&self) -> f64 {
        self.threshold / 100.0
    }
}

/// Non-empty terrain table with non-decreasing thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TerrainLevel>", into = "Vec<TerrainLevel>")]
pub struct TerrainLevelTable {
    levels: Vec<TerrainLevel>,
}

impl TerrainLevelTable {
    /// Validate and wrap a list of levels.
    ///
    /// # Errors
    ///
    /// Fails on an empty list, a threshold outside `[0, 100]`, or a threshold
    /// lower than its predecessor.
    pub fn new(levels: Vec<TerrainLevel>) -> Result<Self, TerrainError> {
        if levels.is_empty() {
            return Err(TerrainError::EmptyLevelTable);
        }
        validate_thresholds(levels.iter().map(|l| l.threshold))?;
        Ok(Self { levels })
    }

    /// Wrap levels already known to be valid, such as built-in presets.
    pub(crate) fn from_valid(levels: Vec<TerrainLevel>) -> Self {
        debug_assert!(Self::new(levels.clone()).is_ok(), "invalid built-in level table");
        Self { levels }
    }

    /// All levels in order.
    pub fn levels(&self) -> &[TerrainLevel] {
        &self.levels
    }

    /// Number of levels (always at least one).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::LevelOutOfRange`] for an index past the end.
    pub fn get(&self, index: usize) -> Result<&TerrainLevel, TerrainError> {
        self.levels.get(index).ok_or(TerrainError::LevelOutOfRange {
            index,
            len: self.levels.len(),
        })
    }

    /// Preview color for a raw sample: the first level whose normalized
    /// threshold is strictly above the sample, else the last level's color.
    pub fn color_for(&self, sample: f64) -> [u8; 4] {
        self.levels
            .iter()
            .find(|level| sample < level.normalized_threshold())
            .or(self.levels.last())
            .map_or([0, 0, 0, 255], |level| level.color)
    }
}

impl TryFrom<Vec<TerrainLevel>> for TerrainLevelTable {
    type Error = TerrainError;

    fn try_from(levels: Vec<TerrainLevel>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<TerrainLevelTable> for Vec<TerrainLevel> {
    fn from(table: TerrainLevelTable) -> Self {
        table.levels
    }
}

/// One foliage band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoliageLevel {
    /// Upper bound of `height * 100` for this band, in `[0, 100]`.
    pub threshold: f64,
    /// Foliage tile placed on top of the column.
    pub tile: TileId,
}

/// Ordered foliage table. May be empty, in which case no cell gets foliage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FoliageLevel>", into = "Vec<FoliageLevel>")]
pub struct FoliageTable {
    levels: Vec<FoliageLevel>,
}

impl FoliageTable {
    /// Validate and wrap a list of foliage levels.
    ///
    /// # Errors
    ///
    /// Fails on a threshold outside `[0, 100]` or out of order.
    pub fn new(levels: Vec<FoliageLevel>) -> Result<Self, TerrainError> {
        validate_thresholds(levels.iter().map(|l| l.threshold))?;
        Ok(Self { levels })
    }

    pub(crate) fn from_valid(levels: Vec<FoliageLevel>) -> Self {
        debug_assert!(Self::new(levels.clone()).is_ok(), "invalid built-in foliage table");
        Self { levels }
    }

    /// All foliage levels in order.
    pub fn levels(&self) -> &[FoliageLevel] {
        &self.levels
    }

    /// Number of foliage levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` when the table has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl TryFrom<Vec<FoliageLevel>> for FoliageTable {
    type Error = TerrainError;

    fn try_from(levels: Vec<FoliageLevel>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<FoliageTable> for Vec<FoliageLevel> {
    fn from(table: FoliageTable) -> Self {
        table.levels
    }
}

fn validate_thresholds(thresholds: impl Iterator<Item = f64>) -> Result<(), TerrainError> {
    let mut previous: Option<f64> = None;
    for (index, threshold) in thresholds.enumerate() {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(TerrainError::ThresholdOutOfRange { index, threshold });
        }
        if let Some(previous) = previous
            && threshold < previous
        {
            return Err(TerrainError::UnorderedThresholds {
                index,
                previous,
                threshold,
            });
        }
        previous = Some(threshold);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(threshold: f64, tile: u16) -> TerrainLevel {
        TerrainLevel::new(threshold, TileId(tile))
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert_eq!(
            TerrainLevelTable::new(Vec::new()),
            Err(TerrainError::EmptyLevelTable)
        );
    }

    #[test]
    fn test_decreasing_thresholds_are_rejected() {
        let err = TerrainLevelTable::new(vec![level(40.0, 0), level(30.0, 1)]).unwrap_err();
        assert!(
            matches!(err, TerrainError::UnorderedThresholds { index: 1, .. }),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn test_equal_thresholds_are_accepted() {
        assert!(TerrainLevelTable::new(vec![level(50.0, 0), level(50.0, 1)]).is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_is_rejected() {
        let err = TerrainLevelTable::new(vec![level(120.0, 0)]).unwrap_err();
        assert_eq!(
            err,
            TerrainError::ThresholdOutOfRange {
                index: 0,
                threshold: 120.0
            }
        );
    }

    #[test]
    fn test_get_out_of_range() {
        let table = TerrainLevelTable::new(vec![level(100.0, 0)]).unwrap();
        assert_eq!(
            table.get(3).unwrap_err(),
            TerrainError::LevelOutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn test_display_tile_prefers_animated() {
        let plain = level(10.0, 4);
        assert_eq!(plain.display_tile(), TileId(4));
        let animated = plain.with_animated_tile(TileId(9));
        assert_eq!(animated.display_tile(), TileId(9));
    }

    #[test]
    fn test_color_for_falls_back_to_last_level() {
        let table = TerrainLevelTable::new(vec![
            level(30.0, 0).with_color([0, 0, 255, 255]),
            level(60.0, 1).with_color([0, 255, 0, 255]),
        ])
        .unwrap();
        assert_eq!(table.color_for(0.1), [0, 0, 255, 255]);
        assert_eq!(table.color_for(0.3), [0, 255, 0, 255]);
        assert_eq!(table.color_for(0.9), [0, 255, 0, 255]);
    }

    #[test]
    fn test_deserialize_rejects_empty_table() {
        let result: Result<TerrainLevelTable, _> = ron::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_fills_optional_fields() {
        let table: TerrainLevelTable =
            ron::from_str("[(threshold: 40.0, tile: (2)), (threshold: 100.0, tile: (3))]").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.levels()[0].elevation_delta, 0);
        assert_eq!(table.levels()[1].animated_tile, None);
    }

    #[test]
    fn test_foliage_table_may_be_empty() {
        assert!(FoliageTable::new(Vec::new()).unwrap().is_empty());
    }
}
