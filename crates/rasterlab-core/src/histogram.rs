//! Intensity histograms and histogram equalization for grayscale rasters.
//!
//! Frequencies are counted per intensity value into 257 buckets; values
//! above 256 (only possible with 16-bit samples) land in the last bucket.
//! For display the 0..256 range is split into `bins` equal intervals and
//! each interval's total is scaled so the fullest bin is `display_width`
//! wide. All arithmetic is integer and truncating.

use std::io::{self, Write};

use crate::raster::{ChannelMode, RasterBuffer};
use crate::{EditError, Pixel};

/// Number of frequency buckets (intensities 0..=256).
pub const FREQUENCY_BUCKETS: usize = 257;

/// Width of the intensity range partitioned into display bins.
pub const INTENSITY_RANGE: u32 = 256;

/// Most glyphs written to the output in one call when drawing a bar.
pub const BAR_CHUNK: usize = 1024;

/// Output intensity of a fully saturated equalized pixel.
const EQUALIZED_MAX: u64 = 255;

/// Per-intensity pixel counts.
pub type Frequencies = [u32; FREQUENCY_BUCKETS];

/// Count pixels per red-channel intensity.
///
/// # Errors
///
/// `UnsupportedFormat` unless the image is grayscale.
pub fn frequencies(image: &RasterBuffer) -> Result<Frequencies, EditError> {
    image.require_mode(ChannelMode::Gray)?;

    let mut freqs = [0u32; FREQUENCY_BUCKETS];
    for pixel in image.pixels() {
        freqs[bucket(pixel.r)] += 1;
    }
    Ok(freqs)
}

#[inline]
fn bucket(value: u16) -> usize {
    (value as usize).min(FREQUENCY_BUCKETS - 1)
}

/// Fail with `InvalidBinning` unless `bins` is a power of two in 2..=256.
pub fn validate_bins(bins: u32) -> Result<(), EditError> {
    if (2..=INTENSITY_RANGE).contains(&bins) && bins.is_power_of_two() {
        Ok(())
    } else {
        Err(EditError::InvalidBinning(bins))
    }
}

/// Sum frequencies over `bins` equal-width intervals of 0..256.
pub fn bin_frequencies(freqs: &Frequencies, bins: u32) -> Result<Vec<u64>, EditError> {
    validate_bins(bins)?;
    let interval = (INTENSITY_RANGE / bins) as usize;

    Ok(freqs[..INTENSITY_RANGE as usize]
        .chunks(interval)
        .map(|chunk| chunk.iter().map(|&f| f as u64).sum())
        .collect())
}

/// A binned histogram scaled for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinnedHistogram {
    sums: Vec<u64>,
    values: Vec<u64>,
    display_width: u32,
}

impl BinnedHistogram {
    /// Bin `freqs` and scale each bin to `display_width`.
    pub fn from_frequencies(
        freqs: &Frequencies,
        display_width: u32,
        bins: u32,
    ) -> Result<Self, EditError> {
        let sums = bin_frequencies(freqs, bins)?;
        let max_scale = sums.iter().copied().max().unwrap_or(0);

        let values = sums
            .iter()
            .map(|&sum| {
                if max_scale == 0 {
                    0
                } else {
                    sum * display_width as u64 / max_scale
                }
            })
            .collect();

        Ok(Self {
            sums,
            values,
            display_width,
        })
    }

    /// Raw pixel count per bin.
    pub fn sums(&self) -> &[u64] {
        &self.sums
    }

    /// Scaled bar length per bin.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Largest raw bin count, the value scaled to `display_width`.
    pub fn max_scale(&self) -> u64 {
        self.sums.iter().copied().max().unwrap_or(0)
    }

    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    pub fn bin_count(&self) -> usize {
        self.sums.len()
    }

    /// Write one line per bin: `"{value}\t|\t"` followed by `value` glyphs.
    ///
    /// Bars are streamed in chunks of at most [`BAR_CHUNK`] glyphs, so a huge
    /// display width never needs a bar-sized allocation.
    pub fn write_rows<W: Write>(&self, glyph: char, out: &mut W) -> io::Result<()> {
        let mut encoded = [0u8; 4];
        let glyph = glyph.encode_utf8(&mut encoded).as_bytes();
        let chunk = glyph.repeat(BAR_CHUNK);

        for &value in &self.values {
            write!(out, "{value}\t|\t")?;
            let mut remaining = value as usize;
            while remaining > 0 {
                let take = remaining.min(BAR_CHUNK);
                out.write_all(&chunk[..take * glyph.len()])?;
                remaining -= take;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Compute the display histogram of a grayscale image.
///
/// The channel mode is checked before the bin count.
pub fn histogram(
    image: &RasterBuffer,
    display_width: u32,
    bins: u32,
) -> Result<BinnedHistogram, EditError> {
    let freqs = frequencies(image)?;
    BinnedHistogram::from_frequencies(&freqs, display_width, bins)
}

/// Equalize a grayscale image in place.
///
/// Every pixel becomes `255 * cdf(v) / (width * height)` where `cdf(v)` is
/// the number of pixels with intensity `<= v` before the call.
///
/// # Errors
///
/// `UnsupportedFormat` unless the image is grayscale; the image is not
/// modified in that case.
pub fn equalize(image: &mut RasterBuffer) -> Result<(), EditError> {
    let freqs = frequencies(image)?;
    let area = image.pixel_count() as u64;

    let mut cdf = [0u64; FREQUENCY_BUCKETS];
    let mut running = 0u64;
    for (slot, &count) in cdf.iter_mut().zip(freqs.iter()) {
        running += count as u64;
        *slot = running;
    }

    for pixel in image.pixels_mut() {
        let value = EQUALIZED_MAX * cdf[bucket(pixel.r)] / area;
        *pixel = Pixel::gray(value as u16);
    }
    image.raise_max_intensity(EQUALIZED_MAX as u16);

    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
