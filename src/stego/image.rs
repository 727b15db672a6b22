//! # Image LSB Carrier
//!
//! Hides bits in the least significant bit of 8-bit pixel channels.
//!
//! ## Unit order
//! Pixels are visited row-major (left to right, top to bottom). Within a pixel the
//! channels go R, G, B, then A only when alpha embedding is enabled and the image
//! actually has an alpha channel:
//! ```text
//! unit 0 = (0,0).R   unit 1 = (0,0).G   unit 2 = (0,0).B   unit 3 = (1,0).R ...
//! ```
//!
//! ### Capacity
//! `width * height * channels_used` units. A 4x4 RGB image has 48 units, which
//! leaves 16 payload bits after the default 32-bit header.
//!
//! Only the LSB of a channel is ever rewritten (`value & 0xFE | bit`); the other
//! seven bits are preserved. The result must be stored losslessly (PNG, BMP) to be
//! decodable.

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::config::ImageConfig;
use crate::error::{Result, StegoError};

use super::Carrier;

/// Decoded raster used as a carrier.
///
/// Pixels are held as RGBA internally; `has_alpha` records whether the source
/// had an alpha channel. Output is RGB8 without alpha and RGBA8 with it, so
/// grayscale sources come back as RGB and gray+alpha sources as RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCarrier {
    pixels: RgbaImage,
    has_alpha: bool,
    channels_used: u32,
}

impl ImageCarrier {
    /// Wrap an RGB raster. Only R, G and B exist, so `include_alpha` has no effect.
    pub fn from_rgb(image: RgbImage, _config: ImageConfig) -> Self {
        Self {
            pixels: DynamicImage::ImageRgb8(image).to_rgba8(),
            has_alpha: false,
            channels_used: 3,
        }
    }

    /// Wrap an RGBA raster.
    pub fn from_rgba(image: RgbaImage, config: ImageConfig) -> Self {
        Self {
            pixels: image,
            has_alpha: true,
            channels_used: if config.include_alpha { 4 } else { 3 },
        }
    }

    /// Wrap a decoded image of any 8-bit colour type.
    ///
    /// Grayscale images are widened to RGB (and LA to RGBA), which is exact. The
    /// widening is kept on output; the gray layout is not restored.
    ///
    /// # Errors
    /// `UnsupportedFormat` for 16-bit and floating point rasters, since narrowing
    /// them to 8 bits would silently alter the cover.
    pub fn from_dynamic(image: &DynamicImage, config: ImageConfig) -> Result<Self> {
        let color = image.color();
        if color.bytes_per_pixel() != color.channel_count() {
            return Err(StegoError::UnsupportedFormat(format!(
                "{color:?} images are not supported, only 8 bits per channel"
            )));
        }

        Ok(if color.has_alpha() {
            Self::from_rgba(image.to_rgba8(), config)
        } else {
            Self::from_rgb(image.to_rgb8(), config)
        })
    }

    /// Convert back into a `DynamicImage` with the source channel layout.
    pub fn into_dynamic(self) -> DynamicImage {
        let rgba = DynamicImage::ImageRgba8(self.pixels);
        if self.has_alpha {
            rgba
        } else {
            DynamicImage::ImageRgb8(rgba.to_rgb8())
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Channels per pixel that carry payload bits (3 or 4).
    pub fn channels_used(&self) -> u32 {
        self.channels_used
    }

    /// Pixels in RGBA form; alpha is 255 when the source had none.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Pixel coordinates and channel index of a unit.
    fn locate(&self, index: usize) -> (u32, u32, usize) {
        let used = self.channels_used as usize;
        let width = self.pixels.width() as usize;
        let pixel = index / used;
        ((pixel % width) as u32, (pixel / width) as u32, index % used)
    }
}

impl Carrier for ImageCarrier {
    fn unit_count(&self) -> usize {
        let (width, height) = self.pixels.dimensions();
        width as usize * height as usize * self.channels_used as usize
    }

    fn read_unit(&self, index: usize) -> bool {
        let (x, y, channel) = self.locate(index);
        self.pixels.get_pixel(x, y)[channel] & 1 == 1
    }

    fn write_unit(&mut self, index: usize, bit: bool) {
        let (x, y, channel) = self.locate(index);
        let pixel = self.pixels.get_pixel_mut(x, y);
        pixel[channel] = (pixel[channel] & 0xFE) | u8::from(bit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::{capacity_bits, conceal, reveal, Framer};
    use image::{Luma, Rgb, Rgba};

    fn gradient_rgb(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 37 + y) as u8, (y * 53 + 7) as u8, (x * y + 200) as u8])
        })
    }

    #[test]
    fn test_units_and_capacity() {
        let carrier = ImageCarrier::from_rgb(gradient_rgb(4, 4), ImageConfig::default());

        assert_eq!(carrier.unit_count(), 48);
        assert_eq!(capacity_bits(&carrier, &Framer::default()), 16);
    }

    #[test]
    fn test_hi_exactly_fills_4x4() {
        let framer = Framer::default();
        let carrier = ImageCarrier::from_rgb(gradient_rgb(4, 4), ImageConfig::default());

        let stego = conceal(&carrier, &framer, b"Hi").unwrap();
        assert_eq!(reveal(&stego, &framer).unwrap(), b"Hi");

        assert!(conceal(&carrier, &framer, b"Hit").is_err());
    }

    #[test]
    fn test_raster_order() {
        let mut carrier = ImageCarrier::from_rgb(
            RgbImage::from_pixel(3, 2, Rgb([0, 0, 0])),
            ImageConfig::default(),
        );

        // unit 4 = pixel (1,0) G, unit 9 = pixel (0,1) R
        carrier.write_unit(4, true);
        carrier.write_unit(9, true);

        assert_eq!(carrier.pixels().get_pixel(1, 0), &Rgba([0, 1, 0, 255]));
        assert_eq!(carrier.pixels().get_pixel(0, 1), &Rgba([1, 0, 0, 255]));
    }

    #[test]
    fn test_channel_isolation() {
        let framer = Framer::default();
        let source = gradient_rgb(16, 9);
        let carrier = ImageCarrier::from_rgb(source.clone(), ImageConfig::default());

        let stego = conceal(&carrier, &framer, b"isolation check").unwrap();
        let output = stego.into_dynamic().to_rgb8();

        for (before, after) in source.pixels().zip(output.pixels()) {
            for channel in 0..3 {
                assert_eq!(before[channel] & 0xFE, after[channel] & 0xFE);
            }
        }
    }

    #[test]
    fn test_alpha_skipped_by_default() {
        let framer = Framer::default();
        let source = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128]));
        let carrier = ImageCarrier::from_rgba(source, ImageConfig::default());
        assert_eq!(carrier.unit_count(), 8 * 8 * 3);

        let stego = conceal(&carrier, &framer, &[0xFF; 8]).unwrap();
        assert!(stego.pixels().pixels().all(|p| p[3] == 128));
    }

    #[test]
    fn test_alpha_included_when_configured() {
        let framer = Framer::default();
        let config = ImageConfig { include_alpha: true };
        let source = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128]));
        let carrier = ImageCarrier::from_rgba(source, config);
        assert_eq!(carrier.unit_count(), 8 * 8 * 4);

        let payload = [0xA5u8; 20];
        let stego = conceal(&carrier, &framer, &payload).unwrap();
        assert_eq!(reveal(&stego, &framer).unwrap(), payload);
        assert!(stego.pixels().pixels().any(|p| p[3] == 129));
    }

    #[test]
    fn test_layout_preserved() {
        let rgb = ImageCarrier::from_rgb(gradient_rgb(2, 2), ImageConfig::default());
        assert!(matches!(rgb.into_dynamic(), DynamicImage::ImageRgb8(_)));

        let rgba = ImageCarrier::from_rgba(RgbaImage::new(2, 2), ImageConfig::default());
        assert!(matches!(rgba.into_dynamic(), DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn test_grayscale_is_widened() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, Luma([77])));
        let carrier = ImageCarrier::from_dynamic(&gray, ImageConfig::default()).unwrap();

        assert!(!carrier.has_alpha());
        assert_eq!(carrier.unit_count(), 48);
        assert_eq!(carrier.pixels().get_pixel(3, 3), &Rgba([77, 77, 77, 255]));
    }

    #[test]
    fn test_gray_alpha_comes_back_as_rgba() {
        let la = DynamicImage::ImageLumaA8(image::GrayAlphaImage::from_pixel(3, 3, image::LumaA([90, 128])));
        let carrier = ImageCarrier::from_dynamic(&la, ImageConfig::default()).unwrap();

        assert!(carrier.has_alpha());
        assert_eq!(carrier.unit_count(), 27);
        assert_eq!(carrier.pixels().get_pixel(0, 0), &Rgba([90, 90, 90, 128]));
        assert!(matches!(carrier.into_dynamic(), DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn test_sixteen_bit_rejected() {
        let deep = DynamicImage::new_rgb16(4, 4);
        let result = ImageCarrier::from_dynamic(&deep, ImageConfig::default());

        assert!(matches!(result, Err(StegoError::UnsupportedFormat(_))));
    }
}
