//! End-to-end checks through the same decode -> compact -> encode path the
//! CLI runs.

#![cfg(feature = "cli")]

use rand::{rngs::StdRng, Rng, SeedableRng};
use stripper::image_io::{decode, encode_png, InputFormat};
use stripper::{compact_vertically, ColorType, CompactOptions};

fn encode_fixture(data: &[u8], width: u32, height: u32, color: png::ColorType) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    out
}

/// Random rows, each repeated a random number of times.
fn banded_rgb(width: u32, bands: usize, seed: u64) -> (Vec<u8>, u32) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::new();
    let mut height = 0;
    for _ in 0..bands {
        let row: Vec<u8> = (0..width * 3).map(|_| rng.gen()).collect();
        let repeat = rng.gen_range(1..12);
        for _ in 0..repeat {
            data.extend_from_slice(&row);
        }
        height += repeat;
    }
    (data, height)
}

#[test]
fn test_rgb_png_compacts_and_reencodes() {
    let width = 24;
    let (rgb, height) = banded_rgb(width, 20, 7);
    let file = encode_fixture(&rgb, width, height, png::ColorType::Rgb);

    let img = decode(&file).unwrap();
    assert_eq!(img.format, InputFormat::Png);
    assert_eq!(img.color_type, ColorType::Rgb);

    let options = CompactOptions::builder().max_strip_size(3).build();
    let compacted = compact_vertically(&img.raster, &options);
    assert!(compacted.height() <= height);
    assert!(compacted.height() >= 20);

    let mut out_file = Vec::new();
    encode_png(&mut out_file, &compacted).unwrap();
    let round = decode(&out_file).unwrap();
    assert_eq!(round.color_type, ColorType::Rgba);
    assert_eq!(round.raster, *compacted);
}

#[test]
fn test_gray_png_expands_to_opaque_rgba() {
    let gray = [10u8, 10, 10, 10, 10, 200];
    let file = encode_fixture(&gray, 1, 6, png::ColorType::Grayscale);
    let img = decode(&file).unwrap();

    let options = CompactOptions::builder().max_strip_size(2).build();
    let compacted = compact_vertically(&img.raster, &options);
    assert_eq!(
        compacted.pixels(),
        &[10, 10, 10, 255, 10, 10, 10, 255, 200, 200, 200, 255][..]
    );
}

#[test]
fn test_indexed_png_runs_collapse_after_expansion() {
    // Ten rows of palette entry 0, then two of entry 1.
    let mut indices = vec![0u8; 10 * 3];
    indices.extend_from_slice(&[1; 2 * 3]);
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, 3, 12);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![0, 128, 0, 255, 255, 0]);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&indices).unwrap();
    }

    let img = decode(&out).unwrap();
    let compacted = compact_vertically(&img.raster, &CompactOptions::default());
    assert_eq!(compacted.height(), 7 + 2);
    assert_eq!(&compacted.row(8)[..4], &[255, 255, 0, 255]);
}
