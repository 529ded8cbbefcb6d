//! netpbm encoding.

use std::fmt::Write as _;

use crate::raster::{ChannelMode, RasterBuffer};

/// Serialize `image` as netpbm.
///
/// The format tag follows the image's channel mode with the requested
/// encoding: `ascii` picks P2/P3, otherwise P5/P6. Binary samples take two
/// big-endian bytes when the maximum intensity exceeds 255.
///
/// ```text
/// P3
/// 2 1
/// 255
/// 1 2 3 4 5 6 
/// ```
pub fn encode_netpbm(image: &RasterBuffer, ascii: bool) -> Vec<u8> {
    let format = image.format().with_encoding(ascii);
    let header = format!(
        "{}\n{} {}\n{}\n",
        format.tag(),
        image.width(),
        image.height(),
        image.max_intensity()
    );

    let channels: &[usize] = match image.channel_mode() {
        ChannelMode::Gray => &[0],
        ChannelMode::Rgb => &[0, 1, 2],
    };

    if ascii {
        let mut text = header;
        for y in 0..image.height() {
            for pixel in image.row(y) {
                let samples = pixel.channels();
                for &c in channels {
                    // Infallible for String
                    let _ = write!(text, "{} ", samples[c]);
                }
            }
            text.push('\n');
        }
        text.into_bytes()
    } else {
        let wide = image.max_intensity() > 255;
        let mut out = header.into_bytes();
        for pixel in image.pixels() {
            let samples = pixel.channels();
            for &c in channels {
                if wide {
                    out.extend_from_slice(&samples[c].to_be_bytes());
                } else {
                    out.push(samples[c] as u8);
                }
            }
        }
        out
    }
}
