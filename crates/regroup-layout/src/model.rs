#![forbid(unsafe_code)]

//! Entity identifiers and the section data shape the engine reorders.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of an item or a section.
///
/// Cheap to clone: the text is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Arc<str>);

impl EntityId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Anything that carries a stable [`EntityId`].
///
/// Host item types implement this; the payload stays opaque to the engine.
pub trait Keyed {
    fn id(&self) -> &EntityId;
}

impl<T: Keyed + ?Sized> Keyed for &T {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

impl<T: Keyed + ?Sized> Keyed for Arc<T> {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

/// A titled group of items, owned by the host.
///
/// The engine never mutates a section in place; commits produce new
/// collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section<I> {
    pub id: EntityId,
    pub data: Vec<I>,
}

impl<I> Section<I> {
    pub fn new(id: impl Into<EntityId>, data: Vec<I>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Number of rows below the header.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}

impl<I> Keyed for Section<I> {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// A minimal keyed item, handy for demos and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    #[serde(default)]
    pub label: String,
}

impl Item {
    pub fn new(id: impl Into<EntityId>) -> Self {
        let id = id.into();
        let label = id.to_string();
        Self { id, label }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Keyed for Item {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_text() {
        let a = EntityId::from("a");
        let b = EntityId::from(String::from("a"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "a");
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let json = serde_json::to_string(&EntityId::new("row-1")).unwrap();
        assert_eq!(json, "\"row-1\"");
    }

    #[test]
    fn section_deserializes_with_items() {
        let json = r#"{"id":"A","data":[{"id":"i1"},{"id":"i2","label":"Two"}]}"#;
        let section: Section<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(section.id.as_str(), "A");
        assert_eq!(section.row_count(), 2);
        assert_eq!(section.data[0].label, "");
        assert_eq!(section.data[1].label, "Two");
    }

    #[test]
    fn item_label_defaults_to_id() {
        assert_eq!(Item::new("x").label, "x");
    }
}
