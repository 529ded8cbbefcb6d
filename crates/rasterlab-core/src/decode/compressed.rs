//! PNG/JPEG import through the `image` crate.

use std::io::Cursor;

use image::ImageReader;

use super::DecodeError;
use crate::raster::RasterBuffer;

/// Decode any format the `image` crate can guess from the content.
///
/// Images with color become 8-bit P6 buffers, grayscale ones 8-bit P5.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the format is unknown or the
/// data is damaged.
pub fn decode_compressed(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let buffer = if img.color().has_color() {
        RasterBuffer::from_rgb_image(img.into_rgb8())?
    } else {
        RasterBuffer::from_gray_image(img.into_luma8())?
    };
    log::debug!(
        "decoded {}x{} compressed image as {}",
        buffer.width(),
        buffer.height(),
        buffer.format()
    );
    Ok(buffer)
}
