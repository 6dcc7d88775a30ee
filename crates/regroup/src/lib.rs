#![forbid(unsafe_code)]

//! Regroup public facade crate.
//!
//! Re-exports the types most hosts need from the internal crates and offers
//! a prelude for day-to-day usage.
//!
//! ```rust,ignore
//! use regroup::prelude::*;
//!
//! let sections = vec![Section::new("today", vec![Item::new("milk"), Item::new("eggs")])];
//! let mut list = ListController::new(ListConfig::default(), sections)
//!     .with_on_reorder(|next| println!("{} sections", next.len()));
//! list.item_pan(&"today".into(), &"eggs".into(), PanEvent::Begin { absolute_y: 115.0 })?;
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use regroup_core::{
    AnimatedValue, Insets, PanConfig, PanEvent, PanRecognizer, PointerEvent, SharedValue,
    Snapshot, Span, Subscription, Viewport,
};

// --- Layout re-exports -----------------------------------------------------

pub use regroup_layout::{
    EntityId, Item, ItemMove, Keyed, LayoutError, Metrics, PositionMap, Section, content_height,
    generate_positions, item_top, reorder_after_item_drop, reorder_sections, section_top,
    swap_positions,
};

// --- List re-exports -------------------------------------------------------

pub use regroup_list::{
    ConfigError, ItemController, ItemFrame, ItemVisual, ListConfig, ListContext, ListController,
    ListError, ListFrame, MovingItem, RenderedItem, RenderedSection, ScrollSurface,
    SectionController, SectionFrame, SectionRenderer, SectionVisual,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for regroup hosts.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// A pan event named an unmounted section or item.
    List(ListError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::List(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::List(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ListError> for Error {
    fn from(err: ListError) -> Self {
        Self::List(err)
    }
}

/// Standard result type for regroup APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        EntityId, Error, Insets, Item, ListConfig, ListController, ListFrame, PanEvent,
        PanRecognizer, PointerEvent, Result, ScrollSurface, Section, SectionRenderer, Viewport,
    };

    pub use crate::{core, layout, list};
}

pub use regroup_core as core;
pub use regroup_layout as layout;
pub use regroup_list as list;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_drives_a_drag() -> Result<()> {
        let sections = vec![Section::new("s", vec![Item::new("a"), Item::new("b")])];
        let mut list = ListController::new(ListConfig::default(), sections);
        let s = EntityId::from("s");
        let b = EntityId::from("b");
        list.item_pan(&s, &b, PanEvent::Begin { absolute_y: 115.0 })?;
        list.item_pan(&s, &b, PanEvent::Update { absolute_y: 60.0 })?;
        list.item_pan(&s, &b, PanEvent::End)?;
        let order = list.item_positions(&s).map(|p| p.ordered_ids());
        assert_eq!(order, Some(vec![b, EntityId::from("a")]));
        Ok(())
    }

    #[test]
    fn list_errors_convert() {
        let mut list = ListController::<Item>::new(ListConfig::default(), Vec::new());
        let err: Error = list
            .item_pan(&"x".into(), &"y".into(), PanEvent::End)
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("unknown section x"));
    }
}
