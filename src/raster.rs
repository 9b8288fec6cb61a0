//! The canonical in-memory page image.
//!
//! ## Why a fixed BGR layout?
//!
//! Pages reach the recognition engine from two origins: still-image decoding
//! and PDF rasterisation. The engine is not format-aware, so both paths must
//! hand it byte-identical pixel layouts. [`Raster`] commits to tightly packed
//! 3-channel BGR rows (the order OCR model stacks conventionally consume);
//! alpha channels from PDF rendering and palette/grayscale sources are
//! flattened away at construction time, and nothing downstream ever needs to
//! ask where a page came from.

use image::DynamicImage;
use std::io::Cursor;

/// A decoded page image: `width * height` pixels, 3 bytes per pixel, BGR,
/// row-major, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Flatten any decoded image into the canonical layout.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for px in rgb.pixels() {
            pixels.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// BGR pixel data, `width * height * 3` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when either dimension is zero. Decoders treat such a result as
    /// a failed decode.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Re-encode the page as a lossless PNG, for engines that take an image
    /// file over the wire rather than a pixel buffer. PNG keeps rendered
    /// text crisp; lossy artefacts measurably hurt recognition.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut rgb = image::RgbImage::new(self.width, self.height);
        for (i, px) in rgb.pixels_mut().enumerate() {
            let at = i * 3;
            *px = image::Rgb([self.pixels[at + 2], self.pixels[at + 1], self.pixels[at]]);
        }
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn rgb_source_is_swapped_to_bgr() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, Rgb([255, 10, 0])));
        let raster = Raster::from_dynamic(&img);
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 1);
        // red pixel: B=0, G=10, R=255
        assert_eq!(&raster.pixels()[..3], &[0, 10, 255]);
    }

    #[test]
    fn alpha_is_dropped() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 128])));
        let raster = Raster::from_dynamic(&img);
        assert_eq!(raster.pixels().len(), 3 * 2 * 3);
        assert_eq!(&raster.pixels()[..3], &[3, 2, 1]);
    }

    #[test]
    fn png_round_trip_restores_channel_order() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([200, 50, 25])));
        let raster = Raster::from_dynamic(&img);
        let png = raster.to_png().expect("encode");
        let decoded = image::load_from_memory(&png).expect("valid PNG").to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([200, 50, 25]));
    }

    #[test]
    fn zero_size_is_empty() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(Raster::from_dynamic(&img).is_empty());
    }
}
