//! Error types for the stripper library.
//!
//! The compaction routines themselves never fail. These errors come from the
//! checked constructors that sit at the boundary (raster construction,
//! byte-slice entry points, color expansion) and from file decoding.

use std::fmt;

/// Result type alias for stripper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the edges of the library: validation and file I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid image dimensions (zero width or height).
    InvalidDimensions {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Pixel data length doesn't match expected size.
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        actual: usize,
    },
    /// Image dimensions exceed maximum supported size.
    ImageTooLarge {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Maximum supported dimension.
        max: u32,
    },
    /// Tolerance outside of 0-255.
    InvalidTolerance(u32),
    /// Color layout cannot be expanded to RGBA.
    UnsupportedColorType,
    /// File is neither PNG nor JPEG.
    UnknownFormat,
    /// Image file could not be decoded.
    Decode(String),
    /// Image could not be encoded.
    Encode(String),
    /// Reading or writing a file failed.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {width}x{height}")
            }
            Error::InvalidDataLength { expected, actual } => {
                write!(
                    f,
                    "Invalid pixel data length: expected {expected} bytes, got {actual}"
                )
            }
            Error::ImageTooLarge { width, height, max } => {
                write!(f, "Image {width}x{height} exceeds maximum dimension {max}")
            }
            Error::InvalidTolerance(t) => {
                write!(f, "Invalid tolerance {t}: must be 0-255")
            }
            Error::UnsupportedColorType => {
                write!(f, "Unsupported color type for RGBA expansion")
            }
            Error::UnknownFormat => {
                write!(f, "Unknown image format. Supported: PNG, JPEG")
            }
            Error::Decode(msg) => write!(f, "Decode error: {msg}"),
            Error::Encode(msg) => write!(f, "Encode error: {msg}"),
            Error::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
