#![forbid(unsafe_code)]

//! Position mappings: id → ordinal bijections describing live visual order.
//!
//! A [`PositionMap`] is independent of the order of the underlying data. Drags
//! rearrange the mapping with pairwise swaps; the data is only rewritten when a
//! drag commits.
//!
//! # Invariants
//!
//! 1. A mapping generated from `n` entities with unique ids is a bijection onto
//!    `0..n` matching input order.
//! 2. [`PositionMap::swapped`] is a transposition: only the entities at the two
//!    given ordinals change, and applying it twice restores the original.
//! 3. A swap naming an unoccupied ordinal is a no-op, so the bijection survives
//!    out-of-range requests.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{EntityId, Keyed};

/// Mapping from entity id to its ordinal in the current visual order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionMap {
    ordinals: FxHashMap<EntityId, usize>,
}

impl PositionMap {
    /// Assign ordinal `i` to `entities[i]`. Empty input gives an empty map.
    pub fn generate<T: Keyed>(entities: &[T]) -> Self {
        Self::from_ids(entities.iter().map(|e| e.id().clone()))
    }

    /// Assign ordinals in iteration order.
    pub fn from_ids(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let ordinals = ids
            .into_iter()
            .enumerate()
            .map(|(ordinal, id)| (id, ordinal))
            .collect();
        Self { ordinals }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.ordinals.contains_key(id)
    }

    #[inline]
    #[must_use]
    pub fn ordinal(&self, id: &EntityId) -> Option<usize> {
        self.ordinals.get(id).copied()
    }

    /// Ordinal of `id`, or 0 when it is not mapped.
    #[inline]
    #[must_use]
    pub fn ordinal_or_zero(&self, id: &EntityId) -> usize {
        self.ordinal(id).unwrap_or(0)
    }

    /// The entity currently at `ordinal`.
    #[must_use]
    pub fn id_at(&self, ordinal: usize) -> Option<&EntityId> {
        self.ordinals
            .iter()
            .find_map(|(id, &o)| (o == ordinal).then_some(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, usize)> {
        self.ordinals.iter().map(|(id, &o)| (id, o))
    }

    /// Ids sorted by ordinal.
    #[must_use]
    pub fn ordered_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<(&EntityId, usize)> = self.iter().collect();
        ids.sort_by_key(|&(_, o)| o);
        ids.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// Whether the ordinals are exactly `0..len`.
    #[must_use]
    pub fn is_dense(&self) -> bool {
        let mut seen = vec![false; self.len()];
        for (_, ordinal) in self.iter() {
            match seen.get_mut(ordinal) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// A copy where the entities at `from` and `to` trade ordinals.
    #[must_use]
    pub fn swapped(&self, from: usize, to: usize) -> Self {
        let mut next = self.clone();
        next.swap(from, to);
        next
    }

    /// Swap in place. Returns `false`, leaving the map untouched, when
    /// `from == to` or either ordinal is unoccupied.
    pub fn swap(&mut self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let (Some(a), Some(b)) = (self.id_at(from).cloned(), self.id_at(to).cloned()) else {
            return false;
        };
        self.ordinals.insert(a, to);
        self.ordinals.insert(b, from);
        true
    }

    /// Stable-sort `entities` by ordinal. Unmapped entities go last, keeping
    /// their relative order.
    pub fn sort_by_ordinal<T: Keyed>(&self, entities: &mut [T]) {
        entities.sort_by_key(|e| self.ordinal(e.id()).unwrap_or(usize::MAX));
    }
}

/// Position mapping for `entities` in input order.
pub fn generate_positions<T: Keyed>(entities: &[T]) -> PositionMap {
    PositionMap::generate(entities)
}

/// Transpose the entities at ordinals `from` and `to`.
#[must_use]
pub fn swap_positions(mapping: &PositionMap, from: usize, to: usize) -> PositionMap {
    mapping.swapped(from, to)
}
