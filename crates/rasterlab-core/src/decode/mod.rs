//! Image decoding for Rasterlab.
//!
//! This module provides functionality for:
//! - Decoding the netpbm family (P2/P3 ASCII, P5/P6 binary)
//! - Importing PNG and JPEG files through the `image` crate
//!
//! # Examples
//!
//! ```ignore
//! use rasterlab_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.ppm").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} {}", image.width(), image.height(), image.format());
//! ```

mod compressed;
mod netpbm;
mod types;

pub use compressed::decode_compressed;
pub use netpbm::decode_netpbm;
pub use types::DecodeError;

use crate::raster::RasterBuffer;

/// Decode any supported file.
///
/// netpbm data is recognised by its leading `P`; everything else goes
/// through the `image` crate with the format guessed from the content.
pub fn decode_image(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    match bytes.first() {
        Some(b'P') => decode_netpbm(bytes),
        Some(_) => decode_compressed(bytes),
        None => Err(DecodeError::Truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterFormat;

    #[test]
    fn test_dispatch_netpbm() {
        let img = decode_image(b"P2\n1 1\n255\n7\n").unwrap();
        assert_eq!(img.format(), RasterFormat::P2);
    }

    #[test]
    fn test_dispatch_empty() {
        assert!(matches!(decode_image(b""), Err(DecodeError::Truncated)));
    }

    #[test]
    fn test_dispatch_garbage_goes_to_image_crate() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(DecodeError::CorruptedFile(_))
        ));
    }
}
