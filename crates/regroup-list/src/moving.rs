#![forbid(unsafe_code)]

//! The moving-item descriptor.
//!
//! One descriptor exists per list while an item is being dragged. The dragging
//! item writes it on every pointer move; every section reads it to decide
//! whether it is the current drop target, and may write `to_section_id` back
//! once the current target's bounds no longer contain the pointer.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use regroup_layout::{EntityId, ItemMove};

/// Live state of the item being dragged.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct MovingItem {
    pub id: EntityId,
    /// Section the drag started in.
    pub section_id: EntityId,
    /// Section currently hovered; equals `section_id` until another section
    /// claims the item.
    pub to_section_id: EntityId,
    /// Ordinal at drag start.
    pub from_index: usize,
    /// Ordinal the pointer currently maps to in the origin section.
    pub to_index: usize,
    /// Pointer position in content coordinates, header-adjusted so it lines
    /// up with section bounds. This is not the raw pointer Y, not even at
    /// Begin: it is `absolute_y - section_header_height + scroll_y`.
    pub position_y: f64,
}

impl MovingItem {
    /// Descriptor for a drag that has not left its origin yet.
    pub fn begin(id: EntityId, section_id: EntityId, index: usize, position_y: f64) -> Self {
        Self {
            id,
            to_section_id: section_id.clone(),
            section_id,
            from_index: index,
            to_index: index,
            position_y,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_cross_section(&self) -> bool {
        self.section_id != self.to_section_id
    }

    /// The move to commit if the drag ended now.
    #[must_use]
    pub fn to_move(&self) -> ItemMove {
        ItemMove {
            item: self.id.clone(),
            from_section: self.section_id.clone(),
            to_section: self.to_section_id.clone(),
            from_index: self.from_index,
        }
    }
}
