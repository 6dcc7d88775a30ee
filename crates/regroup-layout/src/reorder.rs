#![forbid(unsafe_code)]

//! Reorder commits: turning a live position mapping back into data.
//!
//! Drags only ever touch mappings. When a drag ends, these functions build the
//! new section collections handed to the host; the inputs are never mutated.

use tracing::debug;

use crate::error::LayoutError;
use crate::model::{EntityId, Keyed, Section};
use crate::positions::PositionMap;

/// A finished item drag, as recorded by the moving-item descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMove {
    pub item: EntityId,
    pub from_section: EntityId,
    pub to_section: EntityId,
    pub from_index: usize,
}

impl ItemMove {
    #[inline]
    #[must_use]
    pub fn is_cross_section(&self) -> bool {
        self.from_section != self.to_section
    }
}

/// New sections after an item drop.
///
/// Within one section the items are stable-sorted by their ordinal in
/// `item_positions`. Across sections the item leaves its origin and is
/// inserted at the head of the destination; `item_positions` is not consulted.
///
/// The moved item is located by id, falling back to `from_index` when the id
/// is absent from the origin data.
///
/// # Errors
///
/// [`LayoutError::MissingSection`] if either section is absent, and
/// [`LayoutError::MissingItem`] if the item cannot be found in the origin.
pub fn reorder_after_item_drop<I: Keyed + Clone>(
    sections: &[Section<I>],
    mv: &ItemMove,
    item_positions: &PositionMap,
) -> Result<Vec<Section<I>>, LayoutError> {
    let from = position_of(sections, &mv.from_section)?;

    if !mv.is_cross_section() {
        let mut next = sections.to_vec();
        item_positions.sort_by_ordinal(&mut next[from].data);
        return Ok(next);
    }

    let to = position_of(sections, &mv.to_section)?;
    let origin = &sections[from].data;
    let index = origin
        .iter()
        .position(|i| i.id() == &mv.item)
        .or_else(|| (mv.from_index < origin.len()).then_some(mv.from_index))
        .ok_or_else(|| LayoutError::MissingItem {
            item: mv.item.clone(),
            section: mv.from_section.clone(),
        })?;

    let mut next = sections.to_vec();
    let moved = next[from].data.remove(index);
    next[to].data.insert(0, moved);
    debug!(
        item = %mv.item,
        from = %mv.from_section,
        to = %mv.to_section,
        "moved item across sections"
    );
    Ok(next)
}

/// Sections stable-sorted by their ordinal in `section_positions`.
pub fn reorder_sections<I: Clone>(
    sections: &[Section<I>],
    section_positions: &PositionMap,
) -> Vec<Section<I>> {
    let mut next = sections.to_vec();
    section_positions.sort_by_ordinal(&mut next);
    next
}

fn position_of<I>(sections: &[Section<I>], id: &EntityId) -> Result<usize, LayoutError> {
    sections
        .iter()
        .position(|s| &s.id == id)
        .ok_or_else(|| LayoutError::MissingSection(id.clone()))
}
