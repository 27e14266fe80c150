//! Frame surface: a color buffer and a depth buffer of equal size

use super::codec::{decode_depth, encode_depth};
use super::types::Color;

/// Framebuffer for software rendering.
///
/// Both buffers are flat arrays indexed by `y * width + x`, packed as 32-bit
/// words: ARGB for color, [`encode_depth`] output for depth. Dimensions are
/// fixed for the lifetime of the surface; resizing means building a new one.
pub struct Framebuffer {
    pixels: Vec<u32>,
    zbuffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Color::BLACK.to_argb(); width * height],
            zbuffer: vec![encode_depth(1.0); width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color, depth: f32) {
        self.pixels.fill(color.to_argb());
        self.zbuffer.fill(encode_depth(depth));
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Write a color. Coordinates outside the surface are ignored.
    pub fn write_pixel(&mut self, x: usize, y: usize, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.to_argb();
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.index(x, y).map(|idx| Color::from_argb(self.pixels[idx]))
    }

    /// Compare `z` against the stored depth and store it if the test passes.
    ///
    /// Fails (and leaves the buffer untouched) when the stored depth is less
    /// than `z`; equal depths pass. Coordinates outside the surface fail.
    pub fn depth_test_and_write(&mut self, x: usize, y: usize, z: f32) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if decode_depth(self.zbuffer[idx]) < z {
            return false;
        }
        self.zbuffer[idx] = encode_depth(z);
        true
    }

    /// Copy the color buffer into `out` as RGBA bytes for texture upload
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for &argb in &self.pixels {
            out.extend_from_slice(&Color::from_argb(argb).to_bytes());
        }
    }

    /// Snapshot the color buffer as an image
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let color = self.pixel(x as usize, y as usize).unwrap_or_default();
            image::Rgba(color.to_bytes())
        })
    }
}

#[cfg(test)]
impl Framebuffer {
    /// Raw ARGB color words, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw encoded depth words, row-major
    pub fn depth_pixels(&self) -> &[u32] {
        &self.zbuffer
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|idx| decode_depth(self.zbuffer[idx]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_sets_every_pixel() {
        let mut fb = Framebuffer::new(8, 4);
        fb.clear(Color::RED, 0.5);
        assert!(fb.pixels().iter().all(|&p| p == Color::RED.to_argb()));
        assert!(fb.depth_pixels().iter().all(|&d| d == encode_depth(0.5)));
        assert_eq!(fb.pixels().len(), fb.depth_pixels().len());
    }

    #[test]
    fn test_write_pixel_out_of_range_is_ignored() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(Color::WHITE, 1.0);
        fb.write_pixel(4, 0, Color::RED);
        fb.write_pixel(0, 4, Color::RED);
        assert!(fb.pixels().iter().all(|&p| p == Color::WHITE.to_argb()));

        fb.write_pixel(3, 2, Color::BLUE);
        assert_eq!(fb.pixel(3, 2), Some(Color::BLUE));
        assert_eq!(fb.pixels()[2 * 4 + 3], Color::BLUE.to_argb());
    }

    #[test]
    fn test_depth_test_fails_when_stored_is_less() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Color::WHITE, 0.5);

        assert!(!fb.depth_test_and_write(1, 1, 0.7));
        assert_eq!(fb.depth_pixels()[3], encode_depth(0.5));

        assert!(fb.depth_test_and_write(1, 1, 0.3));
        assert!((fb.depth(1, 1).unwrap() - 0.3).abs() < 1e-6);

        // Once lowered, the old depth no longer passes
        assert!(!fb.depth_test_and_write(1, 1, 0.5));
    }

    #[test]
    fn test_depth_test_equal_passes() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(Color::WHITE, 1.0);
        assert!(fb.depth_test_and_write(0, 0, 1.0));
        assert!(fb.depth_test_and_write(0, 0, 0.25));
        assert!(fb.depth_test_and_write(0, 0, 0.25));
    }

    #[test]
    fn test_depth_test_out_of_range_fails() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Color::WHITE, 1.0);
        assert!(!fb.depth_test_and_write(2, 0, 0.0));
    }

    #[test]
    fn test_rgba_export() {
        let mut fb = Framebuffer::new(2, 1);
        fb.clear(Color::with_alpha(1, 2, 3, 4), 1.0);
        let mut out = Vec::new();
        fb.write_rgba8(&mut out);
        assert_eq!(out, vec![1, 2, 3, 4, 1, 2, 3, 4]);

        let img = fb.to_image();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [1, 2, 3, 4]);
    }
}
