//! Painter seam: turns generated columns into `(position, tile)` placements.
//!
//! The core never draws anything itself. A [`TilePainter`] receives every
//! placement and decides how to show it.

use glam::IVec3;
use hashbrown::HashMap;

use crate::generator::TerrainMap;
use crate::levels::TileId;

/// Which layer a placement belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileLayer {
    /// Terrain tiles, including pillar fill.
    Ground,
    /// Foliage tiles sitting on top of a column.
    Foliage,
}

/// A single tile placement, in centered map coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePlacement {
    /// Target layer.
    pub layer: TileLayer,
    /// `(x - dimension/2, y - dimension/2, z)`.
    pub position: IVec3,
    /// Tile to place.
    pub tile: TileId,
}

/// Something that can receive tile placements.
pub trait TilePainter {
    /// Remove every tile previously placed.
    fn clear_all_tiles(&mut self);

    /// Place `tile` at `position` on `layer`, replacing whatever was there.
    fn set_tile(&mut self, layer: TileLayer, position: IVec3, tile: TileId);
}

impl TerrainMap {
    /// Every placement for this map, in row-major cell order.
    ///
    /// For each cell the pillar fill entries come first (top down), then the
    /// top tile, then foliage one step above the top tile.
    pub fn placements(&self) -> Vec<TilePlacement> {
        let half = (self.dimension / 2) as i32;
        let mut out = Vec::new();
        for (x, y, column) in self.columns.iter_cells() {
            let px = x as i32 - half;
            let py = y as i32 - half;
            for &fz in &column.fills {
                out.push(TilePlacement {
                    layer: TileLayer::Ground,
                    position: IVec3::new(px, py, fz),
                    tile: column.tile,
                });
            }
            out.push(TilePlacement {
                layer: TileLayer::Ground,
                position: IVec3::new(px, py, column.z),
                tile: column.tile,
            });
            if let Some(foliage) = column.foliage {
                out.push(TilePlacement {
                    layer: TileLayer::Foliage,
                    position: IVec3::new(px, py, column.z + 1),
                    tile: foliage,
                });
            }
        }
        out
    }
}

/// Clear `painter` and replay every placement of `map` into it.
///
/// Returns the number of placements issued.
pub fn paint_map(map: &TerrainMap, painter: &mut impl TilePainter) -> usize {
    painter.clear_all_tiles();
    let placements = map.placements();
    for p in &placements {
        painter.set_tile(p.layer, p.position, p.tile);
    }
    tracing::debug!(placements = placements.len(), "map painted");
    placements.len()
}

/// In-memory painter keeping the last tile written at each position.
#[derive(Clone, Debug, Default)]
pub struct TileBuffer {
    ground: HashMap<IVec3, TileId>,
    foliage: HashMap<IVec3, TileId>,
}

impl TileBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile at `position` on `layer`.
    pub fn get(&self, layer: TileLayer, position: IVec3) -> Option<TileId> {
        self.layer(layer).get(&position).copied()
    }

    /// Number of occupied positions on `layer`.
    pub fn len(&self, layer: TileLayer) -> usize {
        self.layer(layer).len()
    }

    /// Returns `true` if both layers are empty.
    pub fn is_empty(&self) -> bool {
        self.ground.is_empty() && self.foliage.is_empty()
    }

    /// Highest occupied z at column `(x, y)` on the ground layer.
    pub fn top_z(&self, x: i32, y: i32) -> Option<i32> {
        self.ground
            .keys()
            .filter(|p| p.x == x && p.y == y)
            .map(|p| p.z)
            .max()
    }

    fn layer(&self, layer: TileLayer) -> &HashMap<IVec3, TileId> {
        match layer {
            TileLayer::Ground => &self.ground,
            TileLayer::Foliage => &self.foliage,
        }
    }
}

impl TilePainter for TileBuffer {
    fn clear_all_tiles(&mut self) {
        self.ground.clear();
        self.foliage.clear();
    }

    fn set_tile(&mut self, layer: TileLayer, position: IVec3, tile: TileId) {
        let target = match layer {
            TileLayer::Ground => &mut self.ground,
            TileLayer::Foliage => &mut self.foliage,
        };
        target.insert(position, tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::grid::Grid;

    fn column(z: i32, fills: Vec<i32>, tile: u16) -> Column {
        Column {
            level: 0,
            tile: TileId(tile),
            foliage: None,
            base_z: z,
            z,
            jagged: false,
            fills,
        }
    }

    fn map(columns: Vec<Column>, dimension: usize) -> TerrainMap {
        TerrainMap {
            dimension,
            heights: Grid::filled(dimension, dimension, 0.0),
            levels: Grid::filled(dimension, dimension, 0),
            columns: Grid::from_vec(dimension, dimension, columns).unwrap(),
        }
    }

    #[test]
    fn test_placements_are_centered() {
        let m = map(
            vec![
                column(0, vec![], 1),
                column(0, vec![], 2),
                column(0, vec![], 3),
                column(0, vec![], 4),
            ],
            2,
        );
        let positions: Vec<IVec3> = m.placements().iter().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![
                IVec3::new(-1, -1, 0),
                IVec3::new(0, -1, 0),
                IVec3::new(-1, 0, 0),
                IVec3::new(0, 0, 0),
            ]
        );
    }

    #[test]
    fn test_fill_precedes_top_and_shares_tile() {
        let m = map(vec![column(10, vec![7, 4, 1], 5)], 1);
        let placements = m.placements();
        let zs: Vec<i32> = placements.iter().map(|p| p.position.z).collect();
        assert_eq!(zs, vec![7, 4, 1, 10]);
        assert!(placements.iter().all(|p| p.tile == TileId(5)));
    }

    #[test]
    fn test_paint_map_clears_previous_tiles() {
        let mut buffer = TileBuffer::new();
        buffer.set_tile(TileLayer::Ground, IVec3::new(99, 99, 99), TileId(1));

        let m = map(vec![column(4, vec![1], 2)], 1);
        let count = paint_map(&m, &mut buffer);

        assert_eq!(count, 2);
        assert_eq!(buffer.get(TileLayer::Ground, IVec3::new(99, 99, 99)), None);
        assert_eq!(buffer.len(TileLayer::Ground), 2);
        assert_eq!(buffer.top_z(0, 0), Some(4));
    }

    #[test]
    fn test_foliage_sits_above_column() {
        let mut c = column(6, vec![], 1);
        c.foliage = Some(TileId(30));
        let m = map(vec![c], 1);
        let mut buffer = TileBuffer::new();
        paint_map(&m, &mut buffer);
        assert_eq!(
            buffer.get(TileLayer::Foliage, IVec3::new(0, 0, 7)),
            Some(TileId(30))
        );
    }
}
