#![forbid(unsafe_code)]

//! The list context: shared state handed down to every controller.
//!
//! A [`ListContext`] bundles the scroll offset, the pending auto-scroll target,
//! the moving-item descriptor, the section mapping, the current sections
//! collection, and the live bounds of every mounted section. It is scoped to one [`ListController`](crate::ListController);
//! cloning it hands out another handle to the same state.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use regroup_core::{AnimatedValue, SharedValue, Snapshot, Span, Viewport};
use regroup_layout::{EntityId, PositionMap, Section};
use rustc_hash::FxHashMap;

use crate::config::ListConfig;
use crate::moving::MovingItem;

/// Host callback receiving the full sections collection after a drag.
pub type ReorderCallback<I> = Arc<dyn Fn(Vec<Section<I>>) + Send + Sync>;

/// Live handles to a mounted section's animated top and height.
#[derive(Debug, Clone)]
pub(crate) struct SectionBounds {
    pub(crate) top: AnimatedValue,
    pub(crate) height: SharedValue<f64>,
}

impl SectionBounds {
    pub(crate) fn span(&self) -> Span {
        Span::from_height(self.top.get(), self.height.get())
    }
}

struct ContextInner<I> {
    config: ListConfig,
    viewport: SharedValue<Viewport>,
    scroll_y: SharedValue<f64>,
    pending_scroll: AnimatedValue,
    moving_item: SharedValue<Option<MovingItem>>,
    section_positions: SharedValue<PositionMap>,
    sections: SharedValue<Snapshot<Vec<Section<I>>>>,
    content_height: SharedValue<f64>,
    bounds: Mutex<FxHashMap<EntityId, SectionBounds>>,
    on_reorder: Mutex<Option<ReorderCallback<I>>>,
}

/// Shared handle to one list's coordination state.
pub struct ListContext<I> {
    inner: Arc<ContextInner<I>>,
}

impl<I> Clone for ListContext<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I> fmt::Debug for ListContext<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListContext")
            .field("config", &self.inner.config)
            .field("scroll_y", &self.inner.scroll_y)
            .field("moving_item", &self.inner.moving_item)
            .finish_non_exhaustive()
    }
}

impl<I: Clone + Send + Sync + 'static> ListContext<I> {
    pub fn new(config: ListConfig, sections: Vec<Section<I>>) -> Self {
        let metrics = config.metrics();
        let positions = PositionMap::generate(&sections);
        let content_height = regroup_layout::content_height(&sections, metrics);
        Self {
            inner: Arc::new(ContextInner {
                viewport: SharedValue::new(config.viewport),
                config,
                scroll_y: SharedValue::new(0.0),
                pending_scroll: AnimatedValue::new(0.0),
                moving_item: SharedValue::new(None),
                section_positions: SharedValue::new(positions),
                sections: SharedValue::new(Snapshot::new(sections)),
                content_height: SharedValue::new(content_height),
                bounds: Mutex::new(FxHashMap::default()),
                on_reorder: Mutex::new(None),
            }),
        }
    }

    #[inline]
    pub fn config(&self) -> &ListConfig {
        &self.inner.config
    }

    pub fn viewport(&self) -> &SharedValue<Viewport> {
        &self.inner.viewport
    }

    /// Scroll offset as last reported by the scroll surface.
    pub fn scroll_y(&self) -> &SharedValue<f64> {
        &self.inner.scroll_y
    }

    /// Auto-scroll target; every change is forwarded to the scroll surface.
    pub fn pending_scroll(&self) -> &AnimatedValue {
        &self.inner.pending_scroll
    }

    pub fn moving_item(&self) -> &SharedValue<Option<MovingItem>> {
        &self.inner.moving_item
    }

    pub fn section_positions(&self) -> &SharedValue<PositionMap> {
        &self.inner.section_positions
    }

    /// Current sections collection. A new snapshot means a new identity.
    pub fn sections(&self) -> &SharedValue<Snapshot<Vec<Section<I>>>> {
        &self.inner.sections
    }

    pub fn content_height(&self) -> &SharedValue<f64> {
        &self.inner.content_height
    }

    /// Replace the bounds registry with the currently mounted sections.
    pub(crate) fn register_bounds(
        &self,
        sections: impl IntoIterator<Item = (EntityId, SectionBounds)>,
    ) {
        *self
            .inner
            .bounds
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = sections.into_iter().collect();
    }

    /// Current bounds of a mounted section.
    pub(crate) fn section_bounds(&self, id: &EntityId) -> Option<Span> {
        self.inner
            .bounds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(SectionBounds::span)
    }

    pub fn set_on_reorder(&self, callback: Option<ReorderCallback<I>>) {
        *self.lock_on_reorder() = callback;
    }

    pub fn has_on_reorder(&self) -> bool {
        self.lock_on_reorder().is_some()
    }

    /// Hand `sections` to the host. Returns `false` when no callback is
    /// registered.
    pub(crate) fn emit_reorder(&self, sections: Vec<Section<I>>) -> bool {
        let callback = self.lock_on_reorder().clone();
        match callback {
            Some(callback) => {
                callback(sections);
                true
            }
            None => false,
        }
    }

    fn lock_on_reorder(&self) -> MutexGuard<'_, Option<ReorderCallback<I>>> {
        self.inner
            .on_reorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
