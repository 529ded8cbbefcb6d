//! The editing session: loaded image, active selection and its position.
//!
//! # States
//!
//! ```text
//! Empty ──load──▶ Loaded ──select──▶ Selected
//!                   ▲                   │
//!                   └─select_all/crop───┘
//! ```
//!
//! - `Empty`: no foreground, no background
//! - `Loaded`: the foreground is the whole image
//! - `Selected`: the background is the whole image and the foreground is
//!   the region at `last_offset` inside it
//!
//! Edits under a selection are written back into the background as soon
//! as they are computed, so the background always holds the current image.
//! A failed operation leaves every field as it was: results are built on
//! the side and only swapped in once all checks have passed.

use std::fs;
use std::path::Path;

use crate::decode::decode_image;
use crate::encode::{encode_netpbm, encode_png};
use crate::filter::{convolve, convolve_standalone, Kernel};
use crate::histogram::{self, BinnedHistogram};
use crate::raster::{ChannelMode, RasterBuffer};
use crate::transform::{extract_region, merge_region, quarter_turns, rotate_quarter_turns};
use crate::{EditError, Offset};

/// A normalized selection rectangle, `[x1, x2) x [y1, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Selection {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Top-left corner.
    pub fn offset(&self) -> Offset {
        Offset::new(self.x1, self.y1)
    }
}

/// One editing session.
#[derive(Debug, Default)]
pub struct Session {
    foreground: Option<RasterBuffer>,
    background: Option<RasterBuffer>,
    last_offset: Offset,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.foreground.is_some()
    }

    /// The buffer operations act on: the selection, or the whole image.
    pub fn foreground(&self) -> Option<&RasterBuffer> {
        self.foreground.as_ref()
    }

    /// The whole image while a selection is active.
    pub fn background(&self) -> Option<&RasterBuffer> {
        self.background.as_ref()
    }

    /// The whole image, whether or not a selection is active.
    pub fn full_image(&self) -> Option<&RasterBuffer> {
        self.background.as_ref().or(self.foreground.as_ref())
    }

    pub fn has_selection(&self) -> bool {
        self.background.is_some()
    }

    pub fn last_offset(&self) -> Offset {
        self.last_offset
    }

    fn loaded(&self) -> Result<&RasterBuffer, EditError> {
        self.foreground.as_ref().ok_or(EditError::NotLoaded)
    }

    /// Replace whatever is loaded with `image`.
    pub fn load(&mut self, image: RasterBuffer) {
        self.background = None;
        self.foreground = Some(image);
        self.last_offset = Offset::ORIGIN;
    }

    /// Read, decode and load a file.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file cannot be read, `Decode` if it is not a
    /// supported image. The session is unchanged on error.
    pub fn load_path(&mut self, path: &Path) -> Result<(), EditError> {
        let bytes = fs::read(path).map_err(|source| EditError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decode_image(&bytes)?;
        log::info!(
            "loaded {} ({}x{} {}, maxval {})",
            path.display(),
            image.width(),
            image.height(),
            image.format(),
            image.max_intensity()
        );
        self.load(image);
        Ok(())
    }

    /// Select the rectangle between two corners of the whole image.
    ///
    /// Corners may be given in any order. Coordinates are validated against
    /// the whole image, even while another selection is active, and the new
    /// selection replaces it.
    ///
    /// # Errors
    ///
    /// `InvalidRegion` if a corner lies outside `0..=width` x `0..=height`
    /// or the rectangle has zero width or height.
    pub fn select(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Selection, EditError> {
        let full = self.full_image().ok_or(EditError::NotLoaded)?;

        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };

        let within = |lo: i32, hi: i32, limit: u32| lo >= 0 && i64::from(hi) <= i64::from(limit);
        if !within(x1, x2, full.width()) || !within(y1, y2, full.height()) || x1 == x2 || y1 == y2 {
            return Err(EditError::InvalidRegion { x1, y1, x2, y2 });
        }

        // All four are non-negative now
        let selection = Selection {
            x1: x1 as u32,
            y1: y1 as u32,
            x2: x2 as u32,
            y2: y2 as u32,
        };
        let region = extract_region(
            full,
            selection.offset(),
            selection.width(),
            selection.height(),
        )?;

        if self.background.is_none() {
            self.background = self.foreground.take();
        }
        self.foreground = Some(region);
        self.last_offset = selection.offset();

        log::debug!(
            "selected {}x{} at ({}, {})",
            selection.width(),
            selection.height(),
            selection.x1,
            selection.y1
        );
        Ok(selection)
    }

    /// Make the whole image the selection again.
    pub fn select_all(&mut self) -> Result<(), EditError> {
        self.loaded()?;
        if let Some(full) = self.background.take() {
            self.foreground = Some(full);
            log::debug!("selection cleared");
        }
        Ok(())
    }

    /// Discard everything outside the selection.
    pub fn crop(&mut self) -> Result<(), EditError> {
        let foreground = self.loaded()?;
        let (width, height) = foreground.dimensions();
        if self.background.take().is_some() {
            log::debug!("cropped to {width}x{height}");
        }
        Ok(())
    }

    /// Apply a kernel by name, e.g. `"GAUSSIAN_BLUR"`.
    ///
    /// # Errors
    ///
    /// Checked in this order: `NotLoaded`, `UnsupportedFormat` for a
    /// grayscale image, `UnknownFilter` for an unrecognised name.
    pub fn apply_filter(&mut self, name: &str) -> Result<Kernel, EditError> {
        self.loaded()?.require_mode(ChannelMode::Rgb)?;
        let kernel: Kernel = name.parse()?;
        self.apply_kernel(kernel)?;
        Ok(kernel)
    }

    /// Convolve the selection with `kernel`.
    ///
    /// Under a selection the surrounding image supplies the neighbours, so
    /// only pixels on the border of the whole image are left unfiltered.
    pub fn apply_kernel(&mut self, kernel: Kernel) -> Result<(), EditError> {
        let foreground = self.loaded()?;
        let filtered = match &self.background {
            Some(full) => convolve(foreground, full, self.last_offset, kernel)?,
            None => convolve_standalone(foreground, kernel)?,
        };
        self.install(filtered)?;
        log::debug!("applied {kernel}");
        Ok(())
    }

    /// Rotate the selection by a multiple of 90 degrees (positive is clockwise).
    ///
    /// A selection covering the whole image is dropped first, so the image
    /// itself rotates and may change shape. Any other selection must be
    /// square for an odd number of quarter turns.
    ///
    /// # Errors
    ///
    /// Checked in this order: `NotLoaded`, `UnsupportedAngle`,
    /// `NonSquareSelection`.
    pub fn rotate(&mut self, angle_degrees: i32) -> Result<(), EditError> {
        let foreground = self.loaded()?;
        let turns = quarter_turns(angle_degrees)?;

        let covers_image = self
            .background
            .as_ref()
            .is_some_and(|full| full.dimensions() == foreground.dimensions());
        if self.background.is_some()
            && !covers_image
            && turns % 2 == 1
            && !foreground.is_square()
        {
            return Err(EditError::NonSquareSelection {
                width: foreground.width(),
                height: foreground.height(),
            });
        }

        let rotated = rotate_quarter_turns(foreground, turns);
        if covers_image {
            self.background = None;
            self.foreground = Some(rotated);
        } else {
            self.install(rotated)?;
        }
        log::debug!("rotated {angle_degrees} degrees ({turns} quarter turns)");
        Ok(())
    }

    /// Histogram of the selection.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for RGB images, then `InvalidBinning`.
    pub fn histogram(&self, display_width: u32, bins: u32) -> Result<BinnedHistogram, EditError> {
        histogram::histogram(self.loaded()?, display_width, bins)
    }

    /// Equalize the selection.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for RGB images.
    pub fn equalize(&mut self) -> Result<(), EditError> {
        let mut equalized = self.loaded()?.clone();
        histogram::equalize(&mut equalized)?;
        self.install(equalized)
    }

    /// Write the whole image to `path`.
    ///
    /// Paths ending in `.png` are written as PNG; anything else as netpbm,
    /// ASCII or binary per `ascii`.
    pub fn save(&self, path: &Path, ascii: bool) -> Result<(), EditError> {
        let image = self.full_image().ok_or(EditError::NotLoaded)?;

        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        let bytes = if is_png {
            encode_png(image)?
        } else {
            encode_netpbm(image, ascii)
        };

        fs::write(path, bytes).map_err(|source| EditError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("saved {}", path.display());
        Ok(())
    }

    /// Drop the image and any selection.
    pub fn close(&mut self) {
        self.foreground = None;
        self.background = None;
        self.last_offset = Offset::ORIGIN;
    }

    /// Make `edited` the foreground, writing it back into the whole image
    /// under a selection.
    fn install(&mut self, edited: RasterBuffer) -> Result<(), EditError> {
        if let Some(full) = self.background.as_mut() {
            merge_region(full, &edited, self.last_offset)?;
            log::debug!(
                "merged {}x{} back at ({}, {})",
                edited.width(),
                edited.height(),
                self.last_offset.x,
                self.last_offset.y
            );
        }
        self.foreground = Some(edited);
        Ok(())
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
