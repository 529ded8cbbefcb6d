//! PNG encoding for export.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::raster::{ChannelMode, RasterBuffer};

/// Encode `image` as an 8-bit PNG.
///
/// Grayscale images are written as L8, RGB as Rgb8. Samples are rescaled
/// to 0..=255 when the maximum intensity is not already 255.
///
/// # Errors
///
/// Returns `EncodeError::EncodingFailed` if the PNG encoder fails.
pub fn encode_png(image: &RasterBuffer) -> Result<Vec<u8>, EncodeError> {
    let max = u32::from(image.max_intensity());
    let to_8bit = |v: u16| -> u8 {
        if max == 255 {
            v.min(255) as u8
        } else {
            ((u32::from(v).min(max) * 255 + max / 2) / max) as u8
        }
    };

    let (data, color) = match image.channel_mode() {
        ChannelMode::Gray => (
            image.pixels().iter().map(|p| to_8bit(p.r)).collect::<Vec<_>>(),
            ExtendedColorType::L8,
        ),
        ChannelMode::Rgb => (
            image
                .pixels()
                .iter()
                .flat_map(|p| p.channels().map(to_8bit))
                .collect(),
            ExtendedColorType::Rgb8,
        ),
    };

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&data, image.width(), image.height(), color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(out)
}
