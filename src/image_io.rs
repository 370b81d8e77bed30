//! Reading and writing image files.
//!
//! Decoding accepts PNG and JPEG and always produces an RGBA8 [`Raster`].
//! PNGs are normalized to 8 bits per channel first: palettes are expanded,
//! low bit depths are scaled up and 16-bit samples keep their high byte.
//! Output is always an RGBA8 PNG.

use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::color::ColorType;
use crate::error::{Error, Result};
use crate::raster::Raster;

/// PNG file signature (magic bytes).
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG start-of-image marker followed by the first marker prefix.
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Container formats understood by [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
}

/// Decoded image, already expanded to RGBA.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixels as RGBA8.
    pub raster: Raster,
    /// Layout the file stored, after PNG normalization.
    pub color_type: ColorType,
    /// Container the pixels came from.
    pub format: InputFormat,
}

/// Detect the container from the leading bytes of a file.
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] for anything that is not PNG or JPEG,
/// including inputs too short to hold a signature.
pub fn detect_format(header: &[u8]) -> Result<InputFormat> {
    if header.starts_with(&PNG_SIGNATURE) {
        Ok(InputFormat::Png)
    } else if header.starts_with(&JPEG_SIGNATURE) {
        Ok(InputFormat::Jpeg)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Decode an in-memory PNG or JPEG file.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    match detect_format(bytes)? {
        InputFormat::Png => decode_png(bytes),
        InputFormat::Jpeg => decode_jpeg(bytes),
    }
}

/// Decode a PNG stream.
pub fn decode_png<R: Read>(reader: R) -> Result<DecodedImage> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(decode_error)?;

    let mut pixels = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels).map_err(decode_error)?;
    pixels.truncate(info.buffer_size());

    let color_type = match info.color_type {
        png::ColorType::Grayscale => ColorType::Gray,
        png::ColorType::GrayscaleAlpha => ColorType::GrayAlpha,
        png::ColorType::Rgb => ColorType::Rgb,
        png::ColorType::Rgba => ColorType::Rgba,
        png::ColorType::Indexed => return Err(Error::UnsupportedColorType),
    };

    Ok(DecodedImage {
        raster: Raster::from_color_type(info.width, info.height, &pixels, color_type)?,
        color_type,
        format: InputFormat::Png,
    })
}

/// Decode a JPEG stream. Only 8-bit grayscale and RGB are accepted.
pub fn decode_jpeg<R: Read>(reader: R) -> Result<DecodedImage> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder.decode().map_err(decode_error)?;
    let info = decoder
        .info()
        .ok_or_else(|| Error::Decode("missing JPEG frame header".into()))?;

    let color_type = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => ColorType::Gray,
        jpeg_decoder::PixelFormat::RGB24 => ColorType::Rgb,
        jpeg_decoder::PixelFormat::L16 | jpeg_decoder::PixelFormat::CMYK32 => {
            return Err(Error::UnsupportedColorType)
        }
    };

    Ok(DecodedImage {
        raster: Raster::from_color_type(
            u32::from(info.width),
            u32::from(info.height),
            &pixels,
            color_type,
        )?,
        color_type,
        format: InputFormat::Jpeg,
    })
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<DecodedImage> {
    let bytes = fs::read(path).map_err(io_error)?;
    decode(&bytes)
}

/// Encode a raster as an RGBA8 PNG.
pub fn encode_png<W: Write>(writer: W, raster: &Raster) -> Result<()> {
    let mut encoder = png::Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header().map_err(encode_error)?;
    writer
        .write_image_data(raster.pixels())
        .map_err(encode_error)?;
    writer.finish().map_err(encode_error)
}

/// Write a raster to `path` as an RGBA8 PNG.
pub fn save_png(path: &Path, raster: &Raster) -> Result<()> {
    let file = fs::File::create(path).map_err(io_error)?;
    encode_png(BufWriter::new(file), raster)
}

/// `shot.png` becomes `shot.compacted.png`; the output is always PNG.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("compacted.png")
}

fn decode_error(e: impl std::fmt::Display) -> Error {
    Error::Decode(e.to_string())
}

fn encode_error(e: impl std::fmt::Display) -> Error {
    Error::Encode(e.to_string())
}

fn io_error(e: std::io::Error) -> Error {
    Error::Io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode raw (already packed) sample data with the given PNG layout.
    fn png_bytes(
        data: &[u8],
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        palette: Option<Vec<u8>>,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if let Some(palette) = palette {
                encoder.set_palette(palette);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_detect_format_signatures() {
        assert_eq!(detect_format(&PNG_SIGNATURE), Ok(InputFormat::Png));
        assert_eq!(
            detect_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]),
            Ok(InputFormat::Jpeg)
        );
    }

    #[test]
    fn test_detect_format_rejects_unknown_header() {
        assert_eq!(detect_format(b"GIF89a\x01\x00"), Err(Error::UnknownFormat));
        assert_eq!(detect_format(b"P6\n1 1\n255\n"), Err(Error::UnknownFormat));
    }

    #[test]
    fn test_detect_format_rejects_short_input() {
        assert_eq!(detect_format(&[]), Err(Error::UnknownFormat));
        assert_eq!(detect_format(&PNG_SIGNATURE[..4]), Err(Error::UnknownFormat));
        assert_eq!(detect_format(&[0xFF, 0xD8]), Err(Error::UnknownFormat));
    }

    #[test]
    fn test_decode_indexed_png_expands_palette() {
        // Row 0 uses palette entry 0 (red), row 1 entry 1 (blue).
        let file = png_bytes(
            &[0, 0, 1, 1],
            2,
            2,
            png::ColorType::Indexed,
            png::BitDepth::Eight,
            Some(vec![255, 0, 0, 0, 0, 255]),
        );
        let img = decode(&file).unwrap();
        assert_eq!(img.format, InputFormat::Png);
        assert_eq!(img.color_type, ColorType::Rgb);
        assert_eq!(
            img.raster.pixels(),
            &[255, 0, 0, 255, 255, 0, 0, 255, 0, 0, 255, 255, 0, 0, 255, 255][..]
        );
    }

    #[test]
    fn test_decode_16bit_png_keeps_high_byte() {
        let file = png_bytes(
            &[0x12, 0x34, 0xAB, 0xCD, 0xFF, 0x00],
            1,
            1,
            png::ColorType::Rgb,
            png::BitDepth::Sixteen,
            None,
        );
        let img = decode(&file).unwrap();
        assert_eq!(img.color_type, ColorType::Rgb);
        assert_eq!(img.raster.pixels(), &[0x12, 0xAB, 0xFF, 255][..]);
    }

    #[test]
    fn test_decode_1bit_gray_png_scales_to_8bit() {
        // 8 pixels per packed byte: a white row then a black row.
        let file = png_bytes(
            &[0xFF, 0x00],
            8,
            2,
            png::ColorType::Grayscale,
            png::BitDepth::One,
            None,
        );
        let img = decode(&file).unwrap();
        assert_eq!(img.color_type, ColorType::Gray);
        assert_eq!(img.raster.row(0), &[255u8; 32][..]);
        assert_eq!(
            img.raster.row(1),
            &[0, 0, 0, 255].repeat(8)[..]
        );
    }

    #[test]
    fn test_decode_truncated_jpeg_is_an_error() {
        let err = decode(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_encode_png_roundtrip() {
        let pixels: Vec<u8> = (0..3 * 2 * 4).map(|i| (i * 11) as u8).collect();
        let raster = Raster::new(3, 2, pixels).unwrap();

        let mut file = Vec::new();
        encode_png(&mut file, &raster).unwrap();
        let img = decode(&file).unwrap();
        assert_eq!(img.color_type, ColorType::Rgba);
        assert_eq!(img.raster, raster);
    }

    #[test]
    fn test_save_and_load_png() {
        let path = std::env::temp_dir().join(format!("stripper-io-{}.png", std::process::id()));
        let raster = Raster::new(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        save_png(&path, &raster).unwrap();
        let loaded = load_image(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.raster, raster);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("shot.png")),
            PathBuf::from("shot.compacted.png")
        );
        assert_eq!(
            default_output_path(Path::new("dir/photo.v2.jpg")),
            PathBuf::from("dir/photo.v2.compacted.png")
        );
        assert_eq!(
            default_output_path(Path::new("scan")),
            PathBuf::from("scan.compacted.png")
        );
    }
}
