//! Image encoding for export.
//!
//! - netpbm in either ASCII (P2/P3) or binary (P5/P6) form
//! - PNG through the `image` crate's encoder

mod netpbm;
mod png;

pub use netpbm::encode_netpbm;
pub use png::encode_png;

use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}
