//! Error type shared by all session operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::ChannelMode;

/// Errors returned by editing operations.
///
/// None of these are fatal: a failed operation leaves the session exactly
/// as it was before the call.
#[derive(Debug, Error)]
pub enum EditError {
    /// The operation needs an image and none is loaded.
    #[error("No image loaded")]
    NotLoaded,

    /// Selection coordinates are degenerate or outside the image.
    #[error("Invalid selection ({x1}, {y1}) - ({x2}, {y2})")]
    InvalidRegion { x1: i32, y1: i32, x2: i32, y2: i32 },

    /// An odd number of quarter turns was requested on a non-square selection.
    #[error("Selection must be square to rotate it in place, got {width}x{height}")]
    NonSquareSelection { width: u32, height: u32 },

    /// A region does not fit inside the buffer it is read from or merged into.
    #[error(
        "Region {width}x{height} at ({x}, {y}) does not fit inside {target_width}x{target_height}"
    )]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },

    /// The operation needs the other channel mode.
    #[error("Operation requires a {required} image")]
    UnsupportedFormat { required: ChannelMode },

    /// Filter name is not one of the predefined kernels.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// Rotation angle is not a multiple of 90 degrees.
    #[error("Unsupported rotation angle: {0}")]
    UnsupportedAngle(i32),

    /// Histogram bin count is not a power of two in 2..=256.
    #[error("Invalid bin count {0}: must be a power of two between 2 and 256")]
    InvalidBinning(u32),

    /// The image file could not be read.
    #[error("Failed to load {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The image file could not be written.
    #[error("Failed to save {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}
