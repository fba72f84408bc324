//! Flat preview of the noise and height fields.
//!
//! [`export_noise`] produces the flattened 1D noise buffer handed to a
//! [`MapRenderer`]. [`TexturePreview`] is the built-in renderer: it colors
//! each sample with the terrain table's preview colors.

mod image;

pub use self::image::PreviewImage;

use crate::generator::TerrainMap;
use crate::levels::TerrainLevelTable;
use crate::noise_field::NoiseField;
use crate::params::{GenerationParameters, Normalization};

/// Flattened, row-major noise samples in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseExport {
    /// Width in samples.
    pub width: usize,
    /// Height in samples.
    pub height: usize,
    /// `width * height` samples, row-major.
    pub samples: Vec<f64>,
}

/// Export the raw noise field as a flat buffer, clamping each sample independently.
pub fn export_noise(params: &GenerationParameters) -> NoiseExport {
    let params = params.sanitized();
    let n = params.dimension;
    let grid = NoiseField::new(&params, n, n).generate(Normalization::Clamp);
    NoiseExport {
        width: n,
        height: n,
        samples: grid.into_vec(),
    }
}

/// An external surface that can show a flat sample buffer.
pub trait MapRenderer {
    /// Render `samples` (row-major, `width * height` entries).
    fn render_map(&mut self, width: usize, height: usize, samples: &[f64]);
}

/// Per-sample colors: the first level with `sample < threshold / 100`,
/// otherwise the last level's color.
pub fn color_map(samples: &[f64], table: &TerrainLevelTable) -> Vec<[u8; 4]> {
    samples.iter().map(|&s| table.color_for(s)).collect()
}

/// Renderer that paints samples into a [`PreviewImage`] using level colors.
#[derive(Clone, Debug)]
pub struct TexturePreview {
    table: TerrainLevelTable,
    image: Option<PreviewImage>,
}

impl TexturePreview {
    /// Create a renderer coloring with `table`.
    pub fn new(table: TerrainLevelTable) -> Self {
        Self { table, image: None }
    }

    /// The last rendered image.
    pub fn image(&self) -> Option<&PreviewImage> {
        self.image.as_ref()
    }

    /// Take ownership of the last rendered image.
    pub fn take_image(&mut self) -> Option<PreviewImage> {
        self.image.take()
    }
}

impl MapRenderer for TexturePreview {
    fn render_map(&mut self, width: usize, height: usize, samples: &[f64]) {
        let colors = color_map(samples, &self.table);
        let width = u32::try_from(width).unwrap_or(u32::MAX);
        let height = u32::try_from(height).unwrap_or(u32::MAX);
        self.image = Some(PreviewImage::from_colors(width, height, &colors));
    }
}

/// Render a generated map's final heights through `renderer`.
pub fn render_heights(map: &TerrainMap, renderer: &mut impl MapRenderer) {
    let (w, h) = map.heights.dimensions();
    renderer.render_map(w, h, map.heights.as_slice());
}
