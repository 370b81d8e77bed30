//! RGBA8 raster with row-keyed access.

use crate::color::{expand_to_rgba, ColorType};
use crate::error::{Error, Result};

/// Maximum supported dimension.
pub const MAX_DIMENSION: u32 = 1 << 24;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// A width x height grid of RGBA8 pixels stored row-major.
///
/// The pixel buffer always holds exactly `4 * width * height` bytes; the
/// checked constructors guarantee it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Build a raster from RGBA8 pixel data.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or above
    /// [`MAX_DIMENSION`], or if `pixels.len() != 4 * width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        validate_len(width, height, pixels.len())?;

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a raster from pixel data in any supported layout, expanding it
    /// to RGBA8.
    pub fn from_color_type(
        width: u32,
        height: u32,
        data: &[u8],
        color_type: ColorType,
    ) -> Result<Self> {
        let expected_rgba = checked_len(width, height, 0)?;
        let expected = expected_rgba / CHANNELS * color_type.bytes_per_pixel();
        if data.len() != expected {
            return Err(Error::InvalidDataLength {
                expected,
                actual: data.len(),
            });
        }

        Self::new(width, height, expand_to_rgba(data, color_type)?)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes (`4 * width`).
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// The whole RGBA8 buffer.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the raster and return its buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Row `y` as a slice of `stride()` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(
            y < self.height as usize,
            "row {y} out of bounds for height {}",
            self.height
        );
        let stride = self.stride();
        &self.pixels[y * stride..(y + 1) * stride]
    }

    /// Iterate over rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.pixels.chunks_exact(self.stride())
    }

    /// Build a raster whose invariants the caller has already established.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * CHANNELS);
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Check that `len` bytes hold exactly a `width` x `height` RGBA8 image.
pub(crate) fn validate_len(width: u32, height: u32, len: usize) -> Result<()> {
    let expected = checked_len(width, height, len)?;
    if len != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Validate dimensions and compute `4 * width * height` without overflow.
fn checked_len(width: u32, height: u32, actual: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::ImageTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(Error::InvalidDataLength {
            expected: usize::MAX,
            actual,
        })
}
