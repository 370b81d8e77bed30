//! # stripper
//!
//! Vertical compaction for RGBA rasters.
//!
//! The library scans an image top to bottom, groups consecutive rows that
//! are near-duplicates of a run's first row, and drops every row of a run
//! beyond a configurable strip size. Width never changes; row order is
//! preserved. To compact horizontally, rotate the image before and after.
//!
//! ## Features
//!
//! - **No runtime dependencies** in the core besides `tracing`
//! - **Exact alpha, tolerant RGB** row similarity
//! - **Zero-copy no-op path**: untouched images come back borrowed
//! - Optional command-line front end via the `cli` feature (default)
//! - Optional browser bindings via the `wasm` feature
//!
//! ## Example
//!
//! ```rust
//! use stripper::{compact_vertically, CompactOptions, Raster};
//!
//! // 1x5 image: A, A, A, B, B
//! let a = [10, 20, 30, 255];
//! let b = [200, 0, 0, 255];
//! let pixels: Vec<u8> = [a, a, a, b, b].concat();
//! let raster = Raster::new(1, 5, pixels).unwrap();
//!
//! let options = CompactOptions::builder().max_strip_size(2).tolerance(0).build();
//! let compacted = compact_vertically(&raster, &options);
//!
//! assert_eq!(compacted.width(), 1);
//! assert_eq!(compacted.height(), 4);
//! assert_eq!(compacted.pixels(), &[a, a, b, b].concat()[..]);
//! ```
//!
//! See [`guides::row_compaction`] for the algorithm and
//! [`guides::browser_usage`] for the WebAssembly workflow.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod color;
pub mod compact;
pub mod error;
pub mod raster;

#[cfg(feature = "cli")]
pub mod image_io;

#[cfg(feature = "wasm")]
pub mod wasm;

pub mod guides {
    //! Long-form guides, rendered from the markdown files under `docs/`.

    include!(concat!(env!("OUT_DIR"), "/guides.rs"));
}

pub use color::ColorType;
pub use compact::{
    compact_pixels, compact_vertically, repack, repack_into, rows_similar, scan_duplicate_rows,
    CompactOptions, CompactOptionsBuilder, DiscardSet,
};
pub use error::{Error, Result};
pub use raster::Raster;
