//! Rasterlab Core - region-of-interest raster editing
//!
//! This crate provides the editing engine behind Rasterlab: an in-memory
//! pixel grid loaded from the netpbm family (P2/P3/P5/P6), a session that
//! tracks the active selection, and the pixel transforms that run under it
//! (3x3 convolution filters, quarter-turn rotation, histogram analysis and
//! equalization).
//!
//! # Module Structure
//!
//! - `raster` - The pixel grid and its format metadata
//! - `filter` - 3x3 convolution kernels
//! - `transform` - Region extraction/merge-back and rotation
//! - `histogram` - Intensity frequencies, binned histograms, equalization
//! - `session` - The selection state machine driving all of the above
//! - `decode` / `encode` - netpbm codec plus PNG/JPEG import and PNG export

pub mod decode;
pub mod encode;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod raster;
pub mod session;
pub mod transform;

pub use error::EditError;
pub use filter::{convolve, Kernel};
pub use histogram::{equalize, frequencies, BinnedHistogram, Frequencies};
pub use raster::{BufferError, ChannelMode, RasterBuffer, RasterFormat};
pub use session::{Selection, Session};
pub use transform::{extract_region, merge_region, quarter_turns, rotate, rotate90};

/// One RGB sample triple.
///
/// Grayscale rasters store the same intensity in all three channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Pixel {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Pixel {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Create a gray pixel with all channels set to `value`.
    pub const fn gray(value: u16) -> Self {
        Self::new(value, value, value)
    }

    /// Channels in r, g, b order.
    pub fn channels(self) -> [u16; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_channels([r, g, b]: [u16; 3]) -> Self {
        Self::new(r, g, b)
    }

    /// Largest of the three channels.
    pub fn max_channel(self) -> u16 {
        self.r.max(self.g).max(self.b)
    }
}

/// Top-left corner of a selection, in full-image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

impl Offset {
    pub const ORIGIN: Offset = Offset { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}
