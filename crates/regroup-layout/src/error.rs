#![forbid(unsafe_code)]

use std::fmt;

use crate::model::EntityId;

/// Precondition violations detected by the position model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The requested section has no ordinal in the section mapping.
    TargetNotMapped(EntityId),
    /// A section id has no matching section record.
    MissingSection(EntityId),
    /// A dropped item is not in its origin section.
    MissingItem { item: EntityId, section: EntityId },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotMapped(id) => write!(f, "section {id} is not in the position mapping"),
            Self::MissingSection(id) => write!(f, "section {id} is missing from the collection"),
            Self::MissingItem { item, section } => {
                write!(f, "item {item} is not in section {section}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
