//! A preview image stored as a flat array of RGBA pixels.

/// A 2D preview image, stored as row-major RGBA pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl PreviewImage {
    /// Create a new transparent black image with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    /// Build an image from row-major colors. Missing trailing pixels stay
    /// transparent black and extra colors are ignored.
    pub fn from_colors(width: u32, height: u32, colors: &[[u8; 4]]) -> Self {
        let mut image = Self::new(width, height);
        for (dst, color) in image.pixels.chunks_exact_mut(4).zip(colors) {
            dst.copy_from_slice(color);
        }
        image
    }

    /// Set a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Get a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.offset(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Count the number of unique colors (ignoring alpha) in the image.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = hashbrown::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }
}

/// RGBA buffer length for a `width x height` image, computed in `usize`.
pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_image_correct_dimensions() {
        let image = PreviewImage::new(32, 16);
        assert_eq!(image.dimensions(), (32, 16));
        assert_eq!(image.pixels.len(), 32 * 16 * 4);
    }

    #[test]
    fn test_byte_len_does_not_wrap_at_u32() {
        assert_eq!(byte_len(65_536, 65_536), 1_usize << 34);
        assert_eq!(byte_len(u32::MAX, 1), u32::MAX as usize * 4);
    }

    #[test]
    fn test_wide_image_indexes_past_u16() {
        let mut image = PreviewImage::new(70_000, 2);
        image.set_pixel(69_999, 1, [1, 2, 3, 4]);
        assert_eq!(image.get_pixel(69_999, 1), [1, 2, 3, 4]);
        assert_eq!(&image.pixels[image.pixels.len() - 4..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_set_pixel_writes_row_major() {
        let mut image = PreviewImage::new(10, 10);
        image.set_pixel(3, 5, [255, 128, 64, 255]);
        let idx = ((5 * 10 + 3) * 4) as usize;
        assert_eq!(&image.pixels[idx..idx + 4], &[255, 128, 64, 255]);
        assert_eq!(image.get_pixel(3, 5), [255, 128, 64, 255]);
    }

    #[test]
    fn test_from_colors_tolerates_short_input() {
        let image = PreviewImage::from_colors(2, 2, &[[7, 7, 7, 255], [8, 8, 8, 255]]);
        assert_eq!(image.get_pixel(1, 0), [8, 8, 8, 255]);
        assert_eq!(image.get_pixel(1, 1), [0, 0, 0, 0], "unset pixels stay transparent");
    }

    #[test]
    fn test_unique_color_count_ignores_alpha() {
        let mut image = PreviewImage::new(3, 1);
        image.set_pixel(0, 0, [1, 2, 3, 255]);
        image.set_pixel(1, 0, [1, 2, 3, 0]);
        image.set_pixel(2, 0, [9, 9, 9, 255]);
        assert_eq!(image.unique_color_count(), 2);
    }
}
