#![forbid(unsafe_code)]

use std::fmt;

use regroup_layout::{EntityId, LayoutError};

/// Errors surfaced by [`ListController`](crate::ListController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// No section with this id is mounted.
    UnknownSection(EntityId),
    /// The section is mounted but does not contain this item.
    UnknownItem { section: EntityId, item: EntityId },
    /// A layout precondition failed.
    Layout(LayoutError),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSection(id) => write!(f, "unknown section {id}"),
            Self::UnknownItem { section, item } => {
                write!(f, "unknown item {item} in section {section}")
            }
            Self::Layout(e) => write!(f, "layout error: {e}"),
        }
    }
}

impl std::error::Error for ListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutError> for ListError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}
