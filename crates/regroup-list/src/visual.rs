#![forbid(unsafe_code)]

//! Per-frame visual state handed to the host renderer.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use regroup_layout::EntityId;

use crate::moving::MovingItem;

/// Stacking order of an element being dragged.
pub const DRAGGING_Z_INDEX: i32 = 100;
/// Stacking order of everything else; sinks below default content.
pub const RESTING_Z_INDEX: i32 = -1;
/// Shadow opacity an element springs toward while dragged.
pub const DRAGGING_SHADOW_OPACITY: f64 = 0.2;

#[inline]
pub(crate) fn z_index(dragging: bool) -> i32 {
    if dragging {
        DRAGGING_Z_INDEX
    } else {
        RESTING_Z_INDEX
    }
}

#[inline]
pub(crate) fn shadow_target(dragging: bool) -> f64 {
    if dragging { DRAGGING_SHADOW_OPACITY } else { 0.0 }
}

/// Where and how to draw one item, relative to its section's top.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ItemVisual {
    pub top: f64,
    /// 0–100; below 100 only during the collapse effect.
    pub width_percent: f64,
    pub z_index: i32,
    pub shadow_opacity: f64,
}

/// Where and how to draw one section, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct SectionVisual {
    pub top: f64,
    pub height: f64,
    pub z_index: i32,
    pub shadow_opacity: f64,
    pub border_width: f64,
    /// Another section's item hovers over this one.
    pub receiving_drop: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ItemFrame {
    pub id: EntityId,
    pub visual: ItemVisual,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct SectionFrame {
    pub id: EntityId,
    pub visual: SectionVisual,
    /// Items in data order.
    pub items: Vec<ItemFrame>,
}

/// A full snapshot of the list's visual state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ListFrame {
    pub scroll_y: f64,
    pub content_height: f64,
    pub moving_item: Option<MovingItem>,
    /// Sections in data order.
    pub sections: Vec<SectionFrame>,
}

impl ListFrame {
    #[must_use]
    pub fn section(&self, id: &EntityId) -> Option<&SectionFrame> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Section ids ordered by their drawn top edge.
    #[must_use]
    pub fn visual_section_order(&self) -> Vec<EntityId> {
        let mut sections: Vec<&SectionFrame> = self.sections.iter().collect();
        sections.sort_by(|a, b| a.visual.top.total_cmp(&b.visual.top));
        sections.into_iter().map(|s| s.id.clone()).collect()
    }
}

impl SectionFrame {
    #[must_use]
    pub fn item(&self, id: &EntityId) -> Option<&ItemFrame> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Item ids ordered by their drawn top edge.
    #[must_use]
    pub fn visual_item_order(&self) -> Vec<EntityId> {
        let mut items: Vec<&ItemFrame> = self.items.iter().collect();
        items.sort_by(|a, b| a.visual.top.total_cmp(&b.visual.top));
        items.into_iter().map(|i| i.id.clone()).collect()
    }
}
