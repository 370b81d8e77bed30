//! Color layouts and expansion to RGBA.
//!
//! The compactor only works on RGBA8. Decoders hand back whatever 8-bit
//! layout the file used, so [`expand_to_rgba`] widens it first. Channel
//! values are copied as-is; no color-space conversion happens here.

use crate::error::{Error, Result};

/// Supported 8-bit pixel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    /// Grayscale, 1 byte per pixel.
    Gray,
    /// Grayscale with alpha, 2 bytes per pixel.
    GrayAlpha,
    /// RGB, 3 bytes per pixel.
    Rgb,
    /// RGBA, 4 bytes per pixel.
    Rgba,
}

impl ColorType {
    /// Returns the number of bytes per pixel for this color type.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Gray => 1,
            ColorType::GrayAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }
}

/// Expand pixel data of any supported layout to RGBA8.
///
/// Missing alpha becomes fully opaque (255). Gray is replicated into R, G
/// and B.
///
/// # Errors
///
/// Returns [`Error::InvalidDataLength`] if `data` is not a whole number of
/// pixels for `color_type`.
pub fn expand_to_rgba(data: &[u8], color_type: ColorType) -> Result<Vec<u8>> {
    let bpp = color_type.bytes_per_pixel();
    if data.len() % bpp != 0 {
        return Err(Error::InvalidDataLength {
            expected: data.len() - data.len() % bpp,
            actual: data.len(),
        });
    }

    let pixel_count = data.len() / bpp;
    let mut out = Vec::with_capacity(pixel_count * 4);

    match color_type {
        ColorType::Rgba => out.extend_from_slice(data),
        ColorType::Rgb => {
            for rgb in data.chunks_exact(3) {
                out.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
        }
        ColorType::GrayAlpha => {
            for ga in data.chunks_exact(2) {
                out.extend_from_slice(&[ga[0], ga[0], ga[0], ga[1]]);
            }
        }
        ColorType::Gray => {
            for &g in data {
                out.extend_from_slice(&[g, g, g, 255]);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(ColorType::Gray.bytes_per_pixel(), 1);
        assert_eq!(ColorType::GrayAlpha.bytes_per_pixel(), 2);
        assert_eq!(ColorType::Rgb.bytes_per_pixel(), 3);
        assert_eq!(ColorType::Rgba.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_expand_gray() {
        let out = expand_to_rgba(&[0, 128], ColorType::Gray).unwrap();
        assert_eq!(out, vec![0, 0, 0, 255, 128, 128, 128, 255]);
    }

    #[test]
    fn test_expand_gray_alpha_keeps_alpha() {
        let out = expand_to_rgba(&[50, 7], ColorType::GrayAlpha).unwrap();
        assert_eq!(out, vec![50, 50, 50, 7]);
    }

    #[test]
    fn test_expand_rgb_opaque() {
        let out = expand_to_rgba(&[1, 2, 3, 4, 5, 6], ColorType::Rgb).unwrap();
        assert_eq!(out, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_expand_rgba_passthrough() {
        let data = [9, 8, 7, 6];
        assert_eq!(expand_to_rgba(&data, ColorType::Rgba).unwrap(), data);
    }

    #[test]
    fn test_expand_partial_pixel_rejected() {
        let err = expand_to_rgba(&[1, 2, 3, 4], ColorType::Rgb).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDataLength {
                expected: 3,
                actual: 4
            }
        );
    }
}
