#![forbid(unsafe_code)]

//! Drag controllers for a reorderable grouped list.
//!
//! A [`ListController`] mounts one [`SectionController`] per section and one
//! [`ItemController`] per item. Controllers coordinate through the shared
//! values in a [`ListContext`] rather than a central store:
//!
//! - item mappings are swapped live while an item is dragged;
//! - the section mapping is swapped live while a header is dragged;
//! - the [`MovingItem`] descriptor tells sections which item hovers where;
//! - the pending auto-scroll value drives the host's scroll surface.
//!
//! Commits happen once, at drag end, through the `on_reorder` callback.
//!
//! Time is driven by the host: call [`ListController::tick`] once per frame.

pub mod autoscroll;
pub mod config;
pub mod context;
pub mod error;
pub mod item;
pub mod list;
pub mod moving;
pub mod render;
pub mod section;
pub mod visual;

pub use autoscroll::{EdgeZone, edge_zone};
pub use config::{ConfigError, ListConfig};
pub use context::{ListContext, ReorderCallback};
pub use error::ListError;
pub use item::ItemController;
pub use list::ListController;
pub use moving::MovingItem;
pub use render::{RenderedItem, RenderedSection, ScrollSurface, SectionRenderer};
pub use section::SectionController;
pub use visual::{
    DRAGGING_SHADOW_OPACITY, DRAGGING_Z_INDEX, ItemFrame, ItemVisual, ListFrame, RESTING_Z_INDEX,
    SectionFrame, SectionVisual,
};
