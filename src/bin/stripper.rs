//! stripper CLI - vertical image compaction
//!
//! Reads a PNG or JPEG, collapses runs of near-duplicate rows and writes the
//! result as an RGBA PNG.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stripper::image_io::{default_output_path, load_image, save_png};
use stripper::{compact_vertically, CompactOptions};

/// Compact an image vertically by dropping rows of long near-duplicate runs.
///
/// To compact horizontally, rotate the image before and after.
#[derive(Parser, Debug)]
#[command(name = "stripper")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image file (PNG or JPEG)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PNG path [default: <INPUT>.compacted.png]
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Starting parameter set; explicit flags override it
    #[arg(long, value_enum, default_value = "exact")]
    preset: PresetArg,

    /// Rows kept per run of near-duplicate rows
    #[arg(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    max_strip_size: Option<u32>,

    /// Maximum per-channel RGB difference (0-255); alpha must match exactly
    #[arg(short, long)]
    tolerance: Option<u8>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// Byte-identical rows only (tolerance 0)
    Exact,
    /// Tolerate light noise (tolerance 8)
    Lenient,
}

impl PresetArg {
    fn options(self) -> CompactOptions {
        match self {
            PresetArg::Exact => CompactOptions::exact(),
            PresetArg::Lenient => CompactOptions::lenient(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "stripper=debug"
    } else {
        "stripper=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = Instant::now();
    let img = load_image(&args.input)?;
    debug!(
        input = ?args.input,
        format = ?img.format,
        color_type = ?img.color_type,
        width = img.raster.width(),
        height = img.raster.height(),
        elapsed = ?start.elapsed(),
        "loaded image"
    );

    let mut options = args.preset.options();
    if let Some(max_strip_size) = args.max_strip_size {
        options.max_strip_size = max_strip_size;
    }
    if let Some(tolerance) = args.tolerance {
        options.tolerance = tolerance;
    }

    let compact_start = Instant::now();
    let compacted = compact_vertically(&img.raster, &options);
    debug!(
        max_strip_size = options.max_strip_size,
        tolerance = options.tolerance,
        elapsed = ?compact_start.elapsed(),
        "compacted"
    );

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    save_png(&output_path, &compacted)?;
    debug!(output = ?output_path, "wrote png");

    println!(
        "{}x{} -> {}x{} ({} rows discarded)",
        img.raster.width(),
        img.raster.height(),
        compacted.width(),
        compacted.height(),
        img.raster.height() - compacted.height(),
    );

    Ok(())
}
