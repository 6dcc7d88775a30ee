#![forbid(unsafe_code)]

//! Host seams: presentation callbacks and the scroll surface.

use std::sync::Arc;

use regroup_core::SharedValue;
use regroup_layout::{EntityId, Section};

use crate::visual::{ItemVisual, SectionVisual};

/// Host presentation for items and section headers.
///
/// The engine never looks inside a node; it only pairs each node with the
/// visual state it should be drawn with.
pub trait SectionRenderer<I> {
    type Node;

    fn render_item(&self, item: &I) -> Self::Node;

    fn render_header(&self, section: &Section<I>) -> Self::Node;
}

/// The scrollable surface the list lives in.
pub trait ScrollSurface: Send + Sync {
    /// Scroll so that `offset` is at the top of the viewport.
    fn scroll_to(&self, offset: f64);
}

impl<S: ScrollSurface + ?Sized> ScrollSurface for Arc<S> {
    fn scroll_to(&self, offset: f64) {
        (**self).scroll_to(offset);
    }
}

/// A surface that scrolls instantly and reports the new offset into a shared
/// value, typically the list's own scroll offset in headless use.
impl ScrollSurface for SharedValue<f64> {
    fn scroll_to(&self, offset: f64) {
        self.set(offset);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem<N> {
    pub id: EntityId,
    pub node: N,
    pub visual: ItemVisual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection<N> {
    pub id: EntityId,
    pub header: N,
    pub visual: SectionVisual,
    pub items: Vec<RenderedItem<N>>,
}
