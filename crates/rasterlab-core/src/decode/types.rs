//! Core types for image decoding.

use thiserror::Error;

use crate::raster::BufferError;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The magic number is not one of P2, P3, P5, P6.
    #[error("Unsupported raster format: {0}")]
    InvalidFormat(String),

    /// Width, height or maxval is missing or not a number.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Width or height is zero, or maxval is outside 1..=65535.
    #[error("Invalid dimensions: {width}x{height}, maxval {max_intensity}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        max_intensity: u32,
    },

    /// The pixel data ended early.
    #[error("Unexpected end of pixel data")]
    Truncated,

    /// An ASCII sample is not a number.
    #[error("Invalid sample: {0:?}")]
    InvalidSample(String),

    /// A sample exceeds the declared maxval.
    #[error("Sample {value} exceeds maxval {max_intensity}")]
    SampleOutOfRange { value: u32, max_intensity: u16 },

    /// The `image` crate could not read the file.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}
