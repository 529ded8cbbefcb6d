//! Lossless rotation by multiples of 90 degrees.
//!
//! # Algorithm
//!
//! A clockwise quarter turn maps every source pixel directly to its
//! destination, no interpolation involved:
//!
//! ```text
//! dst[x][height - 1 - y] = src[y][x]      (dst is height wide, width tall)
//! ```
//!
//! Larger angles apply the quarter turn repeatedly. Negative angles are
//! normalized into 0..360 first, so -90 is three clockwise quarter turns.

use crate::raster::RasterBuffer;
use crate::EditError;

/// Number of clockwise quarter turns (0..=3) equivalent to `angle_degrees`.
///
/// # Errors
///
/// `UnsupportedAngle` unless the angle is a multiple of 90.
///
/// # Example
///
/// ```ignore
/// assert_eq!(quarter_turns(-90)?, 3);
/// assert_eq!(quarter_turns(450)?, 1);
/// ```
pub fn quarter_turns(angle_degrees: i32) -> Result<u32, EditError> {
    if angle_degrees % 90 != 0 {
        return Err(EditError::UnsupportedAngle(angle_degrees));
    }
    Ok((angle_degrees.rem_euclid(360) / 90) as u32)
}

/// Rotate 90 degrees clockwise. Width and height swap.
pub fn rotate90(image: &RasterBuffer) -> RasterBuffer {
    let (src_w, src_h) = image.dimensions();
    let (dst_w, dst_h) = (src_h, src_w);

    let mut output = vec![image.pixel(0, 0); image.pixel_count()];

    for y in 0..src_h {
        let row = image.row(y);
        let dst_x = (src_h - 1 - y) as usize;
        for (x, &pixel) in row.iter().enumerate() {
            // Source column x becomes destination row x
            output[x * dst_w as usize + dst_x] = pixel;
        }
    }

    RasterBuffer::from_parts(
        dst_w,
        dst_h,
        image.max_intensity(),
        image.format(),
        output,
    )
}

/// Apply `turns` clockwise quarter turns (taken modulo 4).
pub fn rotate_quarter_turns(image: &RasterBuffer, turns: u32) -> RasterBuffer {
    let mut result = image.clone();
    for _ in 0..turns % 4 {
        result = rotate90(&result);
    }
    result
}

/// Rotate by a multiple of 90 degrees (positive = clockwise).
///
/// # Errors
///
/// `UnsupportedAngle` unless the angle is a multiple of 90; the image is
/// not touched in that case.
pub fn rotate(image: &RasterBuffer, angle_degrees: i32) -> Result<RasterBuffer, EditError> {
    let turns = quarter_turns(angle_degrees)?;
    Ok(rotate_quarter_turns(image, turns))
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

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=30, 1u32..=30)
    }

    fn create_test_image(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_fn(width, height, 255, RasterFormat::P6, |x, y| {
            Pixel::new((x * 7 % 256) as u16, (y * 13 % 256) as u16, ((x ^ y) % 256) as u16)
        })
        .unwrap()
    }

    proptest! {
        /// Property: Four quarter turns restore the original.
        #[test]
        fn prop_four_turns_identity((width, height) in dimensions_strategy()) {
            let img = create_test_image(width, height);
            let mut result = img.clone();
            for _ in 0..4 {
                result = rotate90(&result);
            }
            prop_assert_eq!(result, img);
        }

        /// Property: Opposite rotations cancel.
        #[test]
        fn prop_opposite_rotations_cancel(
            (width, height) in dimensions_strategy(),
            k in -8i32..=8,
        ) {
            let img = create_test_image(width, height);
            let there = rotate(&img, k * 90).unwrap();
            let back = rotate(&there, -k * 90).unwrap();
            prop_assert_eq!(back, img);
        }

        /// Property: Odd turn counts swap dimensions, even ones keep them.
        #[test]
        fn prop_dimension_parity(
            (width, height) in dimensions_strategy(),
            k in -8i32..=8,
        ) {
            let img = create_test_image(width, height);
            let result = rotate(&img, k * 90).unwrap();
            if k.rem_euclid(2) == 1 {
                prop_assert_eq!(result.dimensions(), (height, width));
            } else {
                prop_assert_eq!(result.dimensions(), (width, height));
            }
        }

        /// Property: Rotation permutes pixels without changing the multiset.
        #[test]
        fn prop_rotation_preserves_pixels((width, height) in dimensions_strategy()) {
            let img = create_test_image(width, height);
            let mut before = img.pixels().to_vec();
            let mut after = rotate90(&img).pixels().to_vec();
            before.sort_by_key(|p| p.channels());
            after.sort_by_key(|p| p.channels());
            prop_assert_eq!(before, after);
        }
    }
}
