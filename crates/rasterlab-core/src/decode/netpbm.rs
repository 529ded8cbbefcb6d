//! netpbm decoding (P2, P3, P5, P6).
//!
//! # Layout
//!
//! ```text
//! P6            magic tag
//! # comment     comments run to end of line, header only
//! 4 2           width height
//! 255           maxval (1..=65535)
//! <samples>     ASCII integers (P2/P3) or packed bytes (P5/P6)
//! ```
//!
//! Binary data starts after exactly one whitespace byte following maxval,
//! so sample bytes that happen to look like whitespace are kept. Samples
//! are two big-endian bytes when maxval exceeds 255.

use super::DecodeError;
use crate::raster::{ChannelMode, RasterBuffer, RasterFormat};
use crate::Pixel;

/// Largest maxval the format allows.
pub const MAX_INTENSITY_LIMIT: u32 = 65535;

/// Decode a complete netpbm file.
///
/// # Errors
///
/// - `InvalidFormat` for a tag other than P2/P3/P5/P6
/// - `InvalidHeader` when width, height or maxval is missing or malformed
/// - `InvalidDimensions` for zero dimensions or maxval out of range
/// - `Truncated` when fewer samples than `width * height * channels`
/// - `InvalidSample` / `SampleOutOfRange` for bad sample values
pub fn decode_netpbm(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    let mut tokens = Tokens::new(bytes);

    let tag = tokens.next_token().ok_or(DecodeError::Truncated)?;
    let tag = String::from_utf8_lossy(tag);
    let format =
        RasterFormat::from_tag(&tag).ok_or_else(|| DecodeError::InvalidFormat(tag.into_owned()))?;

    let width = header_number(tokens.next_token(), "width")?;
    let height = header_number(tokens.next_token(), "height")?;
    let max_intensity = header_number(tokens.next_token(), "maxval")?;

    if width == 0 || height == 0 || max_intensity == 0 || max_intensity > MAX_INTENSITY_LIMIT {
        return Err(DecodeError::InvalidDimensions {
            width,
            height,
            max_intensity,
        });
    }

    let channels = match format.channel_mode() {
        ChannelMode::Gray => 1,
        ChannelMode::Rgb => 3,
    };
    let sample_count = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(DecodeError::InvalidDimensions {
            width,
            height,
            max_intensity,
        })?;

    let samples = if format.is_ascii() {
        read_ascii_samples(&mut tokens, sample_count, max_intensity)?
    } else {
        let data = tokens.binary_payload()?;
        read_binary_samples(data, sample_count, max_intensity)?
    };

    let pixels = match format.channel_mode() {
        ChannelMode::Gray => samples.into_iter().map(Pixel::gray).collect(),
        ChannelMode::Rgb => samples
            .chunks_exact(3)
            .map(|c| Pixel::new(c[0], c[1], c[2]))
            .collect(),
    };

    log::debug!("decoded {width}x{height} {format} image, maxval {max_intensity}");
    Ok(RasterBuffer::new(
        width,
        height,
        max_intensity as u16,
        format,
        pixels,
    )?)
}

fn header_number(token: Option<&[u8]>, field: &str) -> Result<u32, DecodeError> {
    let token = token.ok_or_else(|| DecodeError::InvalidHeader(format!("missing {field}")))?;
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            DecodeError::InvalidHeader(format!(
                "{field} is not a number: {:?}",
                String::from_utf8_lossy(token)
            ))
        })
}

fn read_ascii_samples(
    tokens: &mut Tokens<'_>,
    count: usize,
    max_intensity: u32,
) -> Result<Vec<u16>, DecodeError> {
    // Every sample needs at least two bytes, which bounds the allocation
    let mut samples = Vec::with_capacity(count.min(tokens.remaining() / 2 + 1));
    for _ in 0..count {
        let token = tokens.next_token().ok_or(DecodeError::Truncated)?;
        let value: u32 = std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| DecodeError::InvalidSample(String::from_utf8_lossy(token).into_owned()))?;
        samples.push(checked_sample(value, max_intensity)?);
    }
    Ok(samples)
}

fn read_binary_samples(
    data: &[u8],
    count: usize,
    max_intensity: u32,
) -> Result<Vec<u16>, DecodeError> {
    let bytes_per_sample = if max_intensity > 255 { 2 } else { 1 };
    let needed = count * bytes_per_sample;
    if data.len() < needed {
        return Err(DecodeError::Truncated);
    }

    data[..needed]
        .chunks_exact(bytes_per_sample)
        .map(|chunk| {
            // Big-endian when two bytes wide
            let value = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
            checked_sample(value, max_intensity)
        })
        .collect()
}

fn checked_sample(value: u32, max_intensity: u32) -> Result<u16, DecodeError> {
    if value > max_intensity {
        return Err(DecodeError::SampleOutOfRange {
            value,
            max_intensity: max_intensity as u16,
        });
    }
    Ok(value as u16)
}

/// Whitespace-separated tokens with `#` comments skipped.
struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while self.bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Option<&'a [u8]> {
        self.skip_separators();
        let bytes = self.bytes;
        let start = self.pos;
        while bytes
            .get(self.pos)
            .is_some_and(|&b| !b.is_ascii_whitespace() && b != b'#')
        {
            self.pos += 1;
        }
        let end = self.pos;
        (end > start).then(|| &bytes[start..end])
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    /// Consume the single whitespace byte ending the header and return the rest.
    fn binary_payload(&mut self) -> Result<&'a [u8], DecodeError> {
        match self.bytes.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => Ok(&self.bytes[self.pos + 1..]),
            Some(_) => Err(DecodeError::InvalidHeader(
                "expected whitespace after maxval".to_string(),
            )),
            None => Err(DecodeError::Truncated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_p2() {
        let img = decode_netpbm(b"P2\n3 2\n255\n0 1 2\n3 4 5\n").unwrap();

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.format(), RasterFormat::P2);
        assert_eq!(img.max_intensity(), 255);
        assert_eq!(img.pixel(2, 1), Pixel::gray(5));
    }

    #[test]
    fn test_decode_p3() {
        let img = decode_netpbm(b"P3 2 1 15 1 2 3 4 5 6").unwrap();

        assert_eq!(img.format(), RasterFormat::P3);
        assert_eq!(img.max_intensity(), 15);
        assert_eq!(img.pixel(0, 0), Pixel::new(1, 2, 3));
        assert_eq!(img.pixel(1, 0), Pixel::new(4, 5, 6));
    }

    #[test]
    fn test_header_comments() {
        let data = b"P2\n# created by hand\n2 # width\n1\n# maxval next\n9\n7 8\n";
        let img = decode_netpbm(data).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.pixel(1, 0), Pixel::gray(8));
    }

    #[test]
    fn test_decode_p5_keeps_whitespace_valued_samples() {
        // Samples 10 ('\n') and 32 (' ') must not be eaten as separators
        let mut data = b"P5\n2 1\n255\n".to_vec();
        data.extend_from_slice(&[10, 32]);
        let img = decode_netpbm(&data).unwrap();

        assert_eq!(img.format(), RasterFormat::P5);
        assert_eq!(img.pixel(0, 0), Pixel::gray(10));
        assert_eq!(img.pixel(1, 0), Pixel::gray(32));
    }

    #[test]
    fn test_decode_p6() {
        let mut data = b"P6 1 2 255\n".to_vec();
        data.extend_from_slice(&[1, 2, 3, 250, 251, 252]);
        let img = decode_netpbm(&data).unwrap();

        assert_eq!(img.pixel(0, 0), Pixel::new(1, 2, 3));
        assert_eq!(img.pixel(0, 1), Pixel::new(250, 251, 252));
    }

    #[test]
    fn test_decode_16_bit_binary() {
        let mut data = b"P5\n2 1\n1000\n".to_vec();
        data.extend_from_slice(&[0x03, 0xE8, 0x00, 0x05]);
        let img = decode_netpbm(&data).unwrap();

        assert_eq!(img.max_intensity(), 1000);
        assert_eq!(img.pixel(0, 0), Pixel::gray(1000));
        assert_eq!(img.pixel(1, 0), Pixel::gray(5));
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(
            decode_netpbm(b"P7\n1 1\n255\n0\n"),
            Err(DecodeError::InvalidFormat(tag)) if tag == "P7"
        ));
        assert!(matches!(
            decode_netpbm(b"P1\n1 1\n1\n"),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_header_fields() {
        assert!(matches!(
            decode_netpbm(b"P2\n3\n"),
            Err(DecodeError::InvalidHeader(_))
        ));
        assert!(matches!(
            decode_netpbm(b"P2\nthree 2\n255\n"),
            Err(DecodeError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            decode_netpbm(b"P2\n0 2\n255\n"),
            Err(DecodeError::InvalidDimensions { width: 0, .. })
        ));
        assert!(matches!(
            decode_netpbm(b"P2\n1 1\n0\n0\n"),
            Err(DecodeError::InvalidDimensions { max_intensity: 0, .. })
        ));
        assert!(matches!(
            decode_netpbm(b"P2\n1 1\n70000\n0\n"),
            Err(DecodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_truncated_data() {
        assert!(matches!(
            decode_netpbm(b"P2\n2 2\n255\n1 2 3\n"),
            Err(DecodeError::Truncated)
        ));

        let mut data = b"P6\n2 1\n255\n".to_vec();
        data.extend_from_slice(&[1, 2, 3, 4]);
        assert!(matches!(decode_netpbm(&data), Err(DecodeError::Truncated)));

        assert!(matches!(decode_netpbm(b"P5 1 1 255"), Err(DecodeError::Truncated)));
    }

    #[test]
    fn test_sample_errors() {
        assert!(matches!(
            decode_netpbm(b"P2\n2 1\n100\n5 101\n"),
            Err(DecodeError::SampleOutOfRange {
                value: 101,
                max_intensity: 100
            })
        ));
        assert!(matches!(
            decode_netpbm(b"P2\n2 1\n100\n5 x\n"),
            Err(DecodeError::InvalidSample(s)) if s == "x"
        ));
    }

    #[test]
    fn test_binary_sample_above_maxval() {
        let mut data = b"P5\n1 1\n100\n".to_vec();
        data.push(200);
        assert!(matches!(
            decode_netpbm(&data),
            Err(DecodeError::SampleOutOfRange { value: 200, .. })
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
