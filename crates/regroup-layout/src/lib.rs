#![forbid(unsafe_code)]

//! Position model and reorder commits for regroup.
//!
//! Everything here is pure: functions take mappings and section slices and
//! return new values. The drag controllers in `regroup-list` call into this
//! crate on every frame and once more at commit time.
//!
//! - [`PositionMap`]: id → ordinal bijection, mutated only by pairwise swaps.
//! - [`section_top`], [`item_top`], [`content_height`]: pixel offsets.
//! - [`reorder_after_item_drop`], [`reorder_sections`]: commit algorithms.

pub mod error;
pub mod model;
pub mod offsets;
pub mod positions;
pub mod reorder;

pub use error::LayoutError;
pub use model::{EntityId, Item, Keyed, Section};
pub use offsets::{Metrics, clamp, content_height, item_top, ordinal_at, section_top};
pub use positions::{PositionMap, generate_positions, swap_positions};
pub use reorder::{ItemMove, reorder_after_item_drop, reorder_sections};
