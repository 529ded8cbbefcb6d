//! Rectangular region extraction and merge-back.
//!
//! A selection is carved out of the full image with [`extract_region`] and,
//! after being edited, written back at the same place with [`merge_region`].
//! Both are bounds-checked up front, so a failing call never writes a pixel.
//!
//! # Example
//!
//! ```ignore
//! let patch = extract_region(&image, Offset::new(2, 2), 4, 4)?;
//! let edited = convolve(&patch, &image, Offset::new(2, 2), Kernel::Blur)?;
//! merge_region(&mut image, &edited, Offset::new(2, 2))?;
//! ```

use crate::raster::RasterBuffer;
use crate::{EditError, Offset};

/// Copy the `width` x `height` region at `offset` into a new buffer.
///
/// The result keeps the source's format and maximum intensity.
///
/// # Errors
///
/// `RegionOutOfBounds` if the region is empty or extends past the image.
pub fn extract_region(
    image: &RasterBuffer,
    offset: Offset,
    width: u32,
    height: u32,
) -> Result<RasterBuffer, EditError> {
    if width == 0 || height == 0 || !image.contains_region(offset, width, height) {
        return Err(out_of_bounds(image, offset, width, height));
    }

    let mut output = Vec::with_capacity((width as usize) * (height as usize));

    // Copy pixel data row by row
    let x0 = offset.x as usize;
    let x1 = x0 + width as usize;
    for y in 0..height {
        output.extend_from_slice(&image.row(offset.y + y)[x0..x1]);
    }

    Ok(RasterBuffer::from_parts(
        width,
        height,
        image.max_intensity(),
        image.format(),
        output,
    ))
}

/// Write `patch` into `target` with its top-left corner at `offset`.
///
/// The target is never resized. If the patch declares a higher maximum
/// intensity the target's is raised to match.
///
/// # Errors
///
/// `RegionOutOfBounds` if the patch does not fit; `target` is untouched.
pub fn merge_region(
    target: &mut RasterBuffer,
    patch: &RasterBuffer,
    offset: Offset,
) -> Result<(), EditError> {
    let (width, height) = patch.dimensions();
    if !target.contains_region(offset, width, height) {
        return Err(out_of_bounds(target, offset, width, height));
    }

    let x0 = offset.x as usize;
    let x1 = x0 + width as usize;
    for y in 0..height {
        target.row_mut(offset.y + y)[x0..x1].copy_from_slice(patch.row(y));
    }
    target.raise_max_intensity(patch.max_intensity());

    Ok(())
}

fn out_of_bounds(target: &RasterBuffer, offset: Offset, width: u32, height: u32) -> EditError {
    EditError::RegionOutOfBounds {
        x: offset.x,
        y: offset.y,
        width,
        height,
        target_width: target.width(),
        target_height: target.height(),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::raster::RasterFormat;
    use crate::Pixel;
    use proptest::prelude::*;

    /// Strategy for an image size plus a non-empty region inside it.
    fn region_strategy() -> impl Strategy<Value = (u32, u32, Offset, u32, u32)> {
        (1u32..=40, 1u32..=40).prop_flat_map(|(w, h)| {
            (0..w, 0..h).prop_flat_map(move |(x, y)| {
                (
                    Just(w),
                    Just(h),
                    Just(Offset::new(x, y)),
                    1..=(w - x),
                    1..=(h - y),
                )
            })
        })
    }

    fn create_test_image(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_fn(width, height, 255, RasterFormat::P3, |x, y| {
            Pixel::new((x % 256) as u16, (y % 256) as u16, ((x + y) % 256) as u16)
        })
        .unwrap()
    }

    proptest! {
        /// Property: Extracted pixels match the source at the offset.
        #[test]
        fn prop_extracted_pixels_from_source(
            (width, height, offset, rw, rh) in region_strategy(),
        ) {
            let img = create_test_image(width, height);
            let region = extract_region(&img, offset, rw, rh).unwrap();

            prop_assert_eq!(region.dimensions(), (rw, rh));
            for y in 0..rh {
                for x in 0..rw {
                    prop_assert_eq!(region.pixel(x, y), img.pixel(offset.x + x, offset.y + y));
                }
            }
        }

        /// Property: Merging an unmodified extraction back is a no-op.
        #[test]
        fn prop_extract_then_merge_is_identity(
            (width, height, offset, rw, rh) in region_strategy(),
        ) {
            let img = create_test_image(width, height);
            let region = extract_region(&img, offset, rw, rh).unwrap();

            let mut merged = img.clone();
            merge_region(&mut merged, &region, offset).unwrap();
            prop_assert_eq!(merged, img);
        }

        /// Property: Merge only touches pixels inside the region.
        #[test]
        fn prop_merge_is_local(
            (width, height, offset, rw, rh) in region_strategy(),
        ) {
            let img = create_test_image(width, height);
            let patch = RasterBuffer::filled(rw, rh, 255, RasterFormat::P3, Pixel::gray(999)).unwrap();

            let mut merged = img.clone();
            merge_region(&mut merged, &patch, offset).unwrap();
            for y in 0..height {
                for x in 0..width {
                    let inside = x >= offset.x && x < offset.x + rw
                        && y >= offset.y && y < offset.y + rh;
                    let expected = if inside { Pixel::gray(999) } else { img.pixel(x, y) };
                    prop_assert_eq!(merged.pixel(x, y), expected);
                }
            }
        }
    }
}
