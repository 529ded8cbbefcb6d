//! Geometric operations: region extraction/merge-back and rotation.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x grows right, y grows down
//! - Regions are half-open: `[x, x + width) x [y, y + height)`
//! - Rotation is clockwise in quarter turns only

mod region;
mod rotation;

pub use region::{extract_region, merge_region};
pub use rotation::{quarter_turns, rotate, rotate90, rotate_quarter_turns};
