//! The in-memory pixel grid and its format metadata.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EditError, Offset, Pixel};

/// Number of intensity channels a raster carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Single channel, mirrored into r, g and b.
    Gray,
    /// Three independent channels.
    Rgb,
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::Gray => f.write_str("grayscale"),
            ChannelMode::Rgb => f.write_str("RGB"),
        }
    }
}

/// netpbm format tags understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RasterFormat {
    /// ASCII grayscale.
    P2,
    /// ASCII RGB.
    P3,
    /// Binary grayscale.
    P5,
    /// Binary RGB.
    P6,
}

impl RasterFormat {
    /// Parse a two-character tag such as `"P3"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "P2" => Some(RasterFormat::P2),
            "P3" => Some(RasterFormat::P3),
            "P5" => Some(RasterFormat::P5),
            "P6" => Some(RasterFormat::P6),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            RasterFormat::P2 => "P2",
            RasterFormat::P3 => "P3",
            RasterFormat::P5 => "P5",
            RasterFormat::P6 => "P6",
        }
    }

    pub fn channel_mode(self) -> ChannelMode {
        match self {
            RasterFormat::P2 | RasterFormat::P5 => ChannelMode::Gray,
            RasterFormat::P3 | RasterFormat::P6 => ChannelMode::Rgb,
        }
    }

    pub fn is_ascii(self) -> bool {
        matches!(self, RasterFormat::P2 | RasterFormat::P3)
    }

    /// The format with the same channel mode in the requested encoding.
    pub fn with_encoding(self, ascii: bool) -> Self {
        Self::for_mode(self.channel_mode(), ascii)
    }

    pub fn for_mode(mode: ChannelMode, ascii: bool) -> Self {
        match (mode, ascii) {
            (ChannelMode::Gray, true) => RasterFormat::P2,
            (ChannelMode::Gray, false) => RasterFormat::P5,
            (ChannelMode::Rgb, true) => RasterFormat::P3,
            (ChannelMode::Rgb, false) => RasterFormat::P6,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Errors raised when assembling a buffer from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Invalid pixel data: expected {expected} pixels (width * height), got {actual}")]
    PixelCount { expected: usize, actual: usize },
}

/// A width x height grid of [`Pixel`]s stored row-major.
///
/// The pixel vector always holds exactly `width * height` entries; every
/// constructor enforces it, and no method can change the length without
/// also changing the dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    max_intensity: u16,
    format: RasterFormat,
    pixels: Vec<Pixel>,
}

impl RasterBuffer {
    /// Build a buffer from row-major pixels.
    pub fn new(
        width: u32,
        height: u32,
        max_intensity: u16,
        format: RasterFormat,
        pixels: Vec<Pixel>,
    ) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(BufferError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::from_parts(width, height, max_intensity, format, pixels))
    }

    /// Build a buffer by evaluating `f(x, y)` for every position.
    pub fn from_fn(
        width: u32,
        height: u32,
        max_intensity: u16,
        format: RasterFormat,
        mut f: impl FnMut(u32, u32) -> Pixel,
    ) -> Result<Self, BufferError> {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, max_intensity, format, pixels)
    }

    /// Build a buffer where every pixel equals `pixel`.
    pub fn filled(
        width: u32,
        height: u32,
        max_intensity: u16,
        format: RasterFormat,
        pixel: Pixel,
    ) -> Result<Self, BufferError> {
        let len = (width as usize) * (height as usize);
        Self::new(width, height, max_intensity, format, vec![pixel; len])
    }

    /// Internal constructor for transforms that derive dimensions from an
    /// already valid buffer.
    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        max_intensity: u16,
        format: RasterFormat,
        pixels: Vec<Pixel>,
    ) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            max_intensity,
            format,
            pixels,
        }
    }

    /// Create an 8-bit RGB buffer (tagged P6) from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| Pixel::new(p[0] as u16, p[1] as u16, p[2] as u16))
            .collect();
        Self::new(width, height, 255, RasterFormat::P6, pixels)
    }

    /// Create an 8-bit grayscale buffer (tagged P5) from an `image::GrayImage`.
    pub fn from_gray_image(img: image::GrayImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| Pixel::gray(p[0] as u16)).collect();
        Self::new(width, height, 255, RasterFormat::P5, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn max_intensity(&self) -> u16 {
        self.max_intensity
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.format.channel_mode()
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Pixels of row `y`.
    pub fn row(&self, y: u32) -> &[Pixel] {
        let start = (y as usize) * (self.width as usize);
        &self.pixels[start..start + self.width as usize]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
        let start = (y as usize) * (self.width as usize);
        let width = self.width as usize;
        &mut self.pixels[start..start + width]
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        let idx = self.index(x, y);
        self.pixels[idx] = pixel;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Fail with `UnsupportedFormat` unless the buffer has channel mode `required`.
    pub fn require_mode(&self, required: ChannelMode) -> Result<(), EditError> {
        if self.channel_mode() == required {
            Ok(())
        } else {
            Err(EditError::UnsupportedFormat { required })
        }
    }

    /// Whether a `width` x `height` region at `offset` lies inside this buffer.
    pub fn contains_region(&self, offset: Offset, width: u32, height: u32) -> bool {
        (offset.x as u64) + (width as u64) <= self.width as u64
            && (offset.y as u64) + (height as u64) <= self.height as u64
    }

    /// Raise the declared maximum intensity to at least `floor`.
    ///
    /// Filter and equalize results live in 0..=255 regardless of the source
    /// maxval, so the header must cover them.
    pub fn raise_max_intensity(&mut self, floor: u16) {
        self.max_intensity = self.max_intensity.max(floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_fn(width, height, 255, RasterFormat::P3, |x, y| {
            Pixel::new((x * 10) as u16, (y * 10) as u16, 7)
        })
        .unwrap()
    }

    #[test]
    fn test_format_tags() {
        for format in [
            RasterFormat::P2,
            RasterFormat::P3,
            RasterFormat::P5,
            RasterFormat::P6,
        ] {
            assert_eq!(RasterFormat::from_tag(format.tag()), Some(format));
        }
        assert_eq!(RasterFormat::from_tag("P1"), None);
        assert_eq!(RasterFormat::from_tag("p3"), None);
    }

    #[test]
    fn test_with_encoding_keeps_channel_mode() {
        assert_eq!(RasterFormat::P5.with_encoding(true), RasterFormat::P2);
        assert_eq!(RasterFormat::P6.with_encoding(true), RasterFormat::P3);
        assert_eq!(RasterFormat::P2.with_encoding(false), RasterFormat::P5);
        assert_eq!(RasterFormat::P3.with_encoding(false), RasterFormat::P6);
        assert_eq!(RasterFormat::P2.with_encoding(true), RasterFormat::P2);
        assert_eq!(RasterFormat::P6.with_encoding(false), RasterFormat::P6);
    }

    #[test]
    fn test_channel_modes() {
        assert_eq!(RasterFormat::P2.channel_mode(), ChannelMode::Gray);
        assert_eq!(RasterFormat::P5.channel_mode(), ChannelMode::Gray);
        assert_eq!(RasterFormat::P3.channel_mode(), ChannelMode::Rgb);
        assert_eq!(RasterFormat::P6.channel_mode(), ChannelMode::Rgb);
        assert!(RasterFormat::P3.is_ascii());
        assert!(!RasterFormat::P6.is_ascii());
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let err = RasterBuffer::new(0, 4, 255, RasterFormat::P2, vec![]).unwrap_err();
        assert_eq!(err, BufferError::ZeroDimension { width: 0, height: 4 });
    }

    #[test]
    fn test_new_rejects_pixel_count_mismatch() {
        let err = RasterBuffer::new(2, 2, 255, RasterFormat::P2, vec![Pixel::gray(0); 3])
            .unwrap_err();
        assert_eq!(
            err,
            BufferError::PixelCount {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let img = gradient(3, 2);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.pixel(2, 1), Pixel::new(20, 10, 7));
        assert_eq!(img.pixels()[5], Pixel::new(20, 10, 7));
        assert_eq!(img.row(1)[0], Pixel::new(0, 10, 7));
    }

    #[test]
    fn test_set_pixel() {
        let mut img = gradient(3, 3);
        img.set_pixel(1, 2, Pixel::gray(99));
        assert_eq!(img.pixel(1, 2), Pixel::gray(99));
        assert_eq!(img.row(2)[1], Pixel::gray(99));
    }

    #[test]
    fn test_require_mode() {
        let img = gradient(2, 2);
        assert!(img.require_mode(ChannelMode::Rgb).is_ok());
        assert!(matches!(
            img.require_mode(ChannelMode::Gray),
            Err(EditError::UnsupportedFormat {
                required: ChannelMode::Gray
            })
        ));
    }

    #[test]
    fn test_contains_region() {
        let img = gradient(10, 5);
        assert!(img.contains_region(Offset::new(0, 0), 10, 5));
        assert!(img.contains_region(Offset::new(8, 3), 2, 2));
        assert!(!img.contains_region(Offset::new(9, 0), 2, 1));
        assert!(!img.contains_region(Offset::new(0, 4), 1, 2));
    }

    #[test]
    fn test_raise_max_intensity_never_lowers() {
        let mut img = RasterBuffer::filled(1, 1, 15, RasterFormat::P2, Pixel::gray(3)).unwrap();
        img.raise_max_intensity(255);
        assert_eq!(img.max_intensity(), 255);
        img.raise_max_intensity(100);
        assert_eq!(img.max_intensity(), 255);
    }

    #[test]
    fn test_from_image_crate_buffers() {
        let rgb = image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let img = RasterBuffer::from_rgb_image(rgb).unwrap();
        assert_eq!(img.format(), RasterFormat::P6);
        assert_eq!(img.pixel(1, 0), Pixel::new(4, 5, 6));

        let gray = image::GrayImage::from_raw(1, 2, vec![9, 200]).unwrap();
        let img = RasterBuffer::from_gray_image(gray).unwrap();
        assert_eq!(img.format(), RasterFormat::P5);
        assert_eq!(img.pixel(0, 1), Pixel::gray(200));
    }
}
