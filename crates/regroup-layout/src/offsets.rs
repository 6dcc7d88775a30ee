#![forbid(unsafe_code)]

//! Pixel offsets derived from position mappings.
//!
//! Every section occupies `header_height + rows × row_height`; offsets are the
//! sum of everything ordered before the target. All functions are pure.

use rustc_hash::FxHashMap;

use crate::error::LayoutError;
use crate::model::{EntityId, Section};
use crate::positions::PositionMap;

/// Uniform row and header dimensions, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub row_height: f64,
    pub header_height: f64,
}

impl Metrics {
    #[inline]
    pub const fn new(row_height: f64, header_height: f64) -> Self {
        Self {
            row_height,
            header_height,
        }
    }

    /// Height of a section with `rows` items, header included.
    #[inline]
    pub fn section_height(&self, rows: usize) -> f64 {
        self.header_height + rows as f64 * self.row_height
    }
}

/// Top edge of `target`, summing the heights of every section ordered
/// before it in `positions`.
///
/// # Errors
///
/// [`LayoutError::TargetNotMapped`] when `target` has no ordinal, and
/// [`LayoutError::MissingSection`] when a preceding mapped id has no record in
/// `sections`.
pub fn section_top<I>(
    positions: &PositionMap,
    sections: &[Section<I>],
    target: &EntityId,
    metrics: Metrics,
) -> Result<f64, LayoutError> {
    let target_ordinal = positions
        .ordinal(target)
        .ok_or_else(|| LayoutError::TargetNotMapped(target.clone()))?;

    let rows: FxHashMap<&EntityId, usize> =
        sections.iter().map(|s| (&s.id, s.row_count())).collect();

    let mut top = 0.0;
    for (id, ordinal) in positions.iter() {
        if ordinal >= target_ordinal {
            continue;
        }
        let count = rows
            .get(id)
            .copied()
            .ok_or_else(|| LayoutError::MissingSection(id.clone()))?;
        top += metrics.section_height(count);
    }
    Ok(top)
}

/// Top edge of an item inside its section. Unmapped items sit at ordinal 0.
pub fn item_top(item: &EntityId, positions: &PositionMap, metrics: Metrics) -> f64 {
    positions.ordinal_or_zero(item) as f64 * metrics.row_height + metrics.header_height
}

/// Total scrollable height of all sections.
pub fn content_height<I>(sections: &[Section<I>], metrics: Metrics) -> f64 {
    let rows: usize = sections.iter().map(Section::row_count).sum();
    rows as f64 * metrics.row_height + sections.len() as f64 * metrics.header_height
}

/// Saturating clamp that tolerates `lo > hi` by preferring `lo`.
#[inline]
pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        if hi < lo { lo } else { hi }
    } else {
        value
    }
}

/// The slot an offset falls into: `clamp(floor(offset / stride), 0, count - 1)`.
///
/// Degenerate inputs (no slots, non-positive stride, non-finite offset) map
/// to slot 0.
pub fn ordinal_at(offset: f64, stride: f64, count: usize) -> usize {
    if count == 0 || stride.is_nan() || stride <= 0.0 || !offset.is_finite() {
        return 0;
    }
    let raw = (offset / stride).floor();
    if raw <= 0.0 {
        0
    } else {
        clamp(raw as usize, 0, count - 1)
    }
}
