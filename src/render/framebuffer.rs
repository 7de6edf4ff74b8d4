//! Owning ARGB8888 color buffer.
//!
//! One `u32` per pixel, rows stored contiguously. The rasterizer addresses
//! pixels by linear offset (`x + y * width`); presentation hands the raw
//! bytes to SDL or encodes them as a PNG.

use std::path::Path;

use image::{ImageResult, Rgba, RgbaImage};

pub struct ColorBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl ColorBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0xFF00_0000; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Raw bytes for uploading to an ARGB8888 streaming texture.
    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(self.pixels.as_ptr() as *const u8, self.pixels.len() * 4)
        }
    }

    /// Writes the buffer to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let mut out = RgbaImage::new(self.width, self.height);
        for (i, pixel) in self.pixels.iter().enumerate() {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            let [a, r, g, b] = pixel.to_be_bytes();
            out.put_pixel(x, y, Rgba([r, g, b, a]));
        }
        out.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_fills_every_pixel() {
        let mut buffer = ColorBuffer::new(4, 3);
        buffer.clear(0xFFAA_BBCC);
        assert!(buffer.pixels().iter().all(|&p| p == 0xFFAA_BBCC));
        assert_eq!(buffer.pixels().len(), 12);
    }

    #[test]
    fn byte_view_covers_four_bytes_per_pixel() {
        let buffer = ColorBuffer::new(8, 2);
        assert_eq!(buffer.as_bytes().len(), 8 * 2 * 4);
    }
}
