//! Vertical row compaction.
//!
//! Compaction runs in two passes over a [`Raster`]:
//!
//! 1. [`scan_duplicate_rows`] walks the rows once, keeping a reference row
//!    and a run counter, and marks every row past the strip size of its run
//!    in a [`DiscardSet`].
//! 2. [`repack`] copies the surviving rows, in order, into a new buffer.
//!
//! [`compact_vertically`] chains both and hands the input back untouched
//! (borrowed, no allocation) when nothing was discarded.
//!
//! A row is "similar" to the reference when every R, G and B channel is
//! within `tolerance` and every alpha value is identical. The reference is
//! pinned to the first row of a run, so small per-row differences can't
//! accumulate across a long gradient.

use std::borrow::Cow;

use tracing::debug;

use crate::error::{Error, Result};
use crate::raster::{self, Raster, CHANNELS};

/// Compaction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactOptions {
    /// Rows kept per duplicate run: the reference plus up to
    /// `max_strip_size - 1` duplicates. Must be at least 1.
    pub max_strip_size: u32,
    /// Maximum per-channel R/G/B difference still counted as similar.
    /// Alpha always has to match exactly.
    pub tolerance: u8,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            max_strip_size: 7,
            tolerance: 0,
        }
    }
}

impl CompactOptions {
    /// Only byte-identical rows form a run.
    pub fn exact() -> Self {
        Self::default()
    }

    /// Absorbs light noise and compression artifacts.
    pub fn lenient() -> Self {
        Self {
            max_strip_size: 7,
            tolerance: 8,
        }
    }

    /// Build options from untyped values, as received over FFI.
    ///
    /// `max_strip_size` is clamped to at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTolerance`] if `tolerance > 255`.
    pub fn try_new(max_strip_size: u32, tolerance: u32) -> Result<Self> {
        let tolerance = u8::try_from(tolerance).map_err(|_| Error::InvalidTolerance(tolerance))?;
        Ok(Self::builder()
            .max_strip_size(max_strip_size)
            .tolerance(tolerance)
            .build())
    }

    /// Start a builder from the defaults.
    pub fn builder() -> CompactOptionsBuilder {
        CompactOptionsBuilder::default()
    }
}

/// Builder for [`CompactOptions`].
#[derive(Debug, Clone, Default)]
pub struct CompactOptionsBuilder {
    options: CompactOptions,
}

impl CompactOptionsBuilder {
    /// Rows kept per run; values below 1 are raised to 1.
    pub fn max_strip_size(mut self, max_strip_size: u32) -> Self {
        self.options.max_strip_size = max_strip_size.max(1);
        self
    }

    /// Per-channel RGB tolerance.
    pub fn tolerance(mut self, tolerance: u8) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    /// Finish building.
    pub fn build(self) -> CompactOptions {
        self.options
    }
}

/// Row indices excluded from the compacted output.
///
/// Dense: one flag per row of the scanned raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardSet {
    flags: Vec<bool>,
    count: usize,
}

impl DiscardSet {
    /// Empty set covering `height` rows.
    pub fn new(height: usize) -> Self {
        Self {
            flags: vec![false; height],
            count: 0,
        }
    }

    /// Mark row `y` as discarded.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside the covered rows.
    pub fn insert(&mut self, y: usize) {
        if !self.flags[y] {
            self.flags[y] = true;
            self.count += 1;
        }
    }

    /// Whether row `y` is discarded. Rows outside the set are kept.
    #[inline]
    pub fn contains(&self, y: usize) -> bool {
        self.flags.get(y).copied().unwrap_or(false)
    }

    /// Number of discarded rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no row is discarded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of rows covered (the scanned raster's height).
    #[inline]
    pub fn height(&self) -> usize {
        self.flags.len()
    }

    /// Number of rows that survive.
    #[inline]
    pub fn retained(&self) -> usize {
        self.flags.len() - self.count
    }

    /// Discarded row indices in ascending order.
    ///
    /// ```rust
    /// use stripper::{scan_duplicate_rows, CompactOptions, Raster};
    ///
    /// let a = [7, 7, 7, 255];
    /// let b = [0, 0, 0, 255];
    /// let raster = Raster::new(1, 6, [a, a, a, b, b, b].concat()).unwrap();
    /// let options = CompactOptions::builder().max_strip_size(2).build();
    ///
    /// let discard = scan_duplicate_rows(&raster, &options);
    /// assert_eq!(discard.iter().collect::<Vec<_>>(), vec![2, 5]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(y, &discarded)| discarded.then_some(y))
    }
}

/// Compare two rows: RGB within `tolerance`, alpha exact.
///
/// Both rows must have the same length, a multiple of 4.
#[inline]
pub fn rows_similar(a: &[u8], b: &[u8], tolerance: u8) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.chunks_exact(CHANNELS)
        .zip(b.chunks_exact(CHANNELS))
        .all(|(p, q)| {
            p[..3]
                .iter()
                .zip(&q[..3])
                .all(|(&x, &y)| x.abs_diff(y) <= tolerance)
                && p[3] == q[3]
        })
}

/// Single pass over the rows, collecting every row past the strip size of
/// its duplicate run.
///
/// Scanning is skipped (empty set) when the image has fewer rows than the
/// tolerance value.
pub fn scan_duplicate_rows(raster: &Raster, options: &CompactOptions) -> DiscardSet {
    scan_rows(raster.rows(), raster.height(), options)
}

fn scan_rows<'a>(
    mut rows: impl Iterator<Item = &'a [u8]>,
    height: u32,
    options: &CompactOptions,
) -> DiscardSet {
    let mut discard = DiscardSet::new(height as usize);

    // Row count against channel tolerance; kept as-is, see DESIGN.md.
    if height < u32::from(options.tolerance) {
        debug!(
            height,
            tolerance = options.tolerance,
            "height below tolerance, skipping scan"
        );
        return discard;
    }

    let Some(mut reference) = rows.next() else {
        return discard;
    };
    let mut duplicate_count: u32 = 0;

    for (y, row) in (1..).zip(rows) {
        if !rows_similar(row, reference, options.tolerance) {
            duplicate_count = 0;
            reference = row;
            continue;
        }

        duplicate_count += 1;
        if duplicate_count >= options.max_strip_size {
            discard.insert(y);
        }
    }

    debug!(
        height,
        discarded = discard.len(),
        max_strip_size = options.max_strip_size,
        tolerance = options.tolerance,
        "duplicate row scan finished"
    );
    discard
}

/// Copy the rows not in `discard` into a new raster, preserving order.
pub fn repack(raster: &Raster, discard: &DiscardSet) -> Raster {
    let mut output = Vec::new();
    repack_into(&mut output, raster, discard);
    Raster::from_parts(raster.width(), discard.retained() as u32, output)
}

/// Copy the rows not in `discard` into a caller-provided buffer.
///
/// The `output` buffer is cleared and reused, so repeated compactions can
/// avoid reallocating. On return it holds `discard.retained()` rows.
pub fn repack_into(output: &mut Vec<u8>, raster: &Raster, discard: &DiscardSet) {
    debug_assert_eq!(discard.height(), raster.height() as usize);
    copy_retained(output, raster.rows(), raster.stride(), discard);
}

fn copy_retained<'a>(
    output: &mut Vec<u8>,
    rows: impl Iterator<Item = &'a [u8]>,
    stride: usize,
    discard: &DiscardSet,
) {
    output.clear();
    output.reserve(discard.retained() * stride);

    for (y, row) in rows.enumerate() {
        if !discard.contains(y) {
            output.extend_from_slice(row);
        }
    }
}

/// Compact `raster` vertically.
///
/// Returns the input itself when no row is discarded, a freshly built
/// raster otherwise. Width is unchanged and row order preserved.
pub fn compact_vertically<'a>(raster: &'a Raster, options: &CompactOptions) -> Cow<'a, Raster> {
    let discard = scan_duplicate_rows(raster, options);
    if discard.is_empty() {
        return Cow::Borrowed(raster);
    }
    Cow::Owned(repack(raster, &discard))
}

/// Compact raw RGBA8 bytes.
///
/// Geometry is validated before anything is allocated, and the rows are
/// scanned in place. The returned buffer is the only allocation, including
/// when nothing is discarded. The compacted height is
/// `result.len() / (4 * width)`.
///
/// # Errors
///
/// Returns an error if the geometry is invalid (see [`Raster::new`]).
pub fn compact_pixels(
    data: &[u8],
    width: u32,
    height: u32,
    options: &CompactOptions,
) -> Result<Vec<u8>> {
    raster::validate_len(width, height, data.len())?;
    let stride = width as usize * CHANNELS;

    let discard = scan_rows(data.chunks_exact(stride), height, options);
    let mut output = Vec::new();
    copy_retained(&mut output, data.chunks_exact(stride), stride, &discard);
    Ok(output)
}
