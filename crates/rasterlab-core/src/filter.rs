//! 3x3 convolution filters.
//!
//! A filtered buffer may be a selection carved out of a larger image. In that
//! case neighbours are read from the larger image (the *context*), so pixels
//! on the edge of the selection still see their real surroundings. Pixels
//! without a full 3x3 neighbourhood inside the context are copied unchanged.
//!
//! Per channel the output is
//!
//! ```text
//! clamp(sum(context[gy + ky - 1][gx + kx - 1] * k[ky][kx]) / divisor, 0, 255)
//! ```
//!
//! with truncating integer division.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::raster::{ChannelMode, RasterBuffer};
use crate::{EditError, Offset, Pixel};

/// Side length of every kernel.
pub const KERNEL_SIZE: usize = 3;

const EDGE: [[i32; KERNEL_SIZE]; KERNEL_SIZE] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];

const SHARPEN: [[i32; KERNEL_SIZE]; KERNEL_SIZE] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

const BLUR: [[i32; KERNEL_SIZE]; KERNEL_SIZE] = [[1, 1, 1], [1, 1, 1], [1, 1, 1]];

const GAUSSIAN_BLUR: [[i32; KERNEL_SIZE]; KERNEL_SIZE] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

/// The predefined convolution kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kernel {
    /// Laplacian edge detector.
    Edge,
    Sharpen,
    /// Box blur.
    Blur,
    GaussianBlur,
}

impl Kernel {
    pub const ALL: [Kernel; 4] = [
        Kernel::Edge,
        Kernel::Sharpen,
        Kernel::Blur,
        Kernel::GaussianBlur,
    ];

    pub fn matrix(self) -> &'static [[i32; KERNEL_SIZE]; KERNEL_SIZE] {
        match self {
            Kernel::Edge => &EDGE,
            Kernel::Sharpen => &SHARPEN,
            Kernel::Blur => &BLUR,
            Kernel::GaussianBlur => &GAUSSIAN_BLUR,
        }
    }

    /// Normalization divisor applied to the weighted sum.
    pub fn divisor(self) -> i32 {
        match self {
            Kernel::Edge | Kernel::Sharpen => 1,
            Kernel::Blur => 9,
            Kernel::GaussianBlur => 16,
        }
    }

    /// Command-line name of the kernel.
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Edge => "EDGE",
            Kernel::Sharpen => "SHARPEN",
            Kernel::Blur => "BLUR",
            Kernel::GaussianBlur => "GAUSSIAN_BLUR",
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = EditError;

    /// Names match exactly; `"blur"` is not `BLUR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kernel::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| EditError::UnknownFilter(s.to_string()))
    }
}

/// Convolve `image`, which sits at `offset` inside `context`, with `kernel`.
///
/// Pass the image itself as `context` (with `Offset::ORIGIN`) to filter a
/// standalone buffer; see [`convolve_standalone`].
///
/// # Errors
///
/// - `UnsupportedFormat` if `image` is grayscale
/// - `RegionOutOfBounds` if `image` does not fit inside `context` at `offset`
pub fn convolve(
    image: &RasterBuffer,
    context: &RasterBuffer,
    offset: Offset,
    kernel: Kernel,
) -> Result<RasterBuffer, EditError> {
    image.require_mode(ChannelMode::Rgb)?;
    if !context.contains_region(offset, image.width(), image.height()) {
        return Err(EditError::RegionOutOfBounds {
            x: offset.x,
            y: offset.y,
            width: image.width(),
            height: image.height(),
            target_width: context.width(),
            target_height: context.height(),
        });
    }

    let matrix = kernel.matrix();
    let divisor = kernel.divisor();
    let (ctx_w, ctx_h) = context.dimensions();

    let mut output = Vec::with_capacity(image.pixel_count());
    for y in 0..image.height() {
        let gy = offset.y + y;
        for x in 0..image.width() {
            let gx = offset.x + x;

            // Missing neighbours: leave the pixel alone
            if gy == 0 || gy + 1 >= ctx_h || gx == 0 || gx + 1 >= ctx_w {
                output.push(image.pixel(x, y));
                continue;
            }

            let mut sum = [0i32; 3];
            for (ky, weights) in matrix.iter().enumerate() {
                let row = context.row(gy + ky as u32 - 1);
                for (kx, &weight) in weights.iter().enumerate() {
                    let neighbor = row[(gx as usize) + kx - 1].channels();
                    for c in 0..3 {
                        sum[c] += neighbor[c] as i32 * weight;
                    }
                }
            }

            output.push(Pixel::from_channels(sum.map(|s| clamp_channel(s / divisor))));
        }
    }

    let mut result = RasterBuffer::from_parts(
        image.width(),
        image.height(),
        image.max_intensity(),
        image.format(),
        output,
    );
    result.raise_max_intensity(255);
    Ok(result)
}

/// Convolve a buffer that is not part of a larger image.
pub fn convolve_standalone(image: &RasterBuffer, kernel: Kernel) -> Result<RasterBuffer, EditError> {
    convolve(image, image, Offset::ORIGIN, kernel)
}

#[inline]
fn clamp_channel(value: i32) -> u16 {
    value.clamp(0, 255) as u16
}


// ============================================================================
// Property-Based Tests
// ============================================================================
