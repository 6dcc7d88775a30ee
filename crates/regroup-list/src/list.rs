#![forbid(unsafe_code)]

//! List controller: the root of a mounted grouped list.
//!
//! Owns the [`ListContext`] and one [`SectionController`] per section, routes
//! pan events to the right controller, forwards pending auto-scroll to the
//! scroll surface, and reports committed orders through `on_reorder`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut list = ListController::new(ListConfig::new(50.0, 40.0), sections)
//!     .with_on_reorder(|next| store.replace(next));
//! list.attach_surface(surface);
//!
//! list.item_pan(&"groceries".into(), &"milk".into(), PanEvent::Begin { absolute_y: 130.0 })?;
//! list.item_pan(&"groceries".into(), &"milk".into(), PanEvent::Update { absolute_y: 40.0 })?;
//! list.item_pan(&"groceries".into(), &"milk".into(), PanEvent::End)?;
//! while list.tick(Duration::from_millis(16)) {}
//! ```

use std::sync::Arc;
use std::time::Duration;

use regroup_core::{PanEvent, Snapshot, Subscription, Viewport};
use regroup_layout::{EntityId, Keyed, PositionMap, Section, content_height};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::config::ListConfig;
use crate::context::{ListContext, ReorderCallback};
use crate::error::ListError;
use crate::moving::MovingItem;
use crate::render::{RenderedItem, RenderedSection, ScrollSurface, SectionRenderer};
use crate::section::{SectionController, current_top};
use crate::visual::ListFrame;

/// Root controller of one reorderable grouped list.
#[derive(Debug)]
pub struct ListController<I> {
    ctx: ListContext<I>,
    sections: Vec<SectionController<I>>,
    surface: Option<Subscription>,
}

impl<I: Keyed + Clone + Send + Sync + 'static> ListController<I> {
    pub fn new(config: ListConfig, sections: Vec<Section<I>>) -> Self {
        let ctx = ListContext::new(config, sections.clone());
        let controllers: Vec<_> = sections
            .into_iter()
            .map(|section| SectionController::new(section, &ctx))
            .collect();
        ctx.register_bounds(controllers.iter().map(SectionController::live_bounds));
        debug!(sections = controllers.len(), "list mounted");
        Self {
            ctx,
            sections: controllers,
            surface: None,
        }
    }

    /// Register the host callback invoked once per completed drag.
    #[must_use]
    pub fn with_on_reorder(self, callback: impl Fn(Vec<Section<I>>) + Send + Sync + 'static) -> Self {
        self.ctx.set_on_reorder(Some(Arc::new(callback)));
        self
    }

    /// Replace or remove the reorder callback. Without one, drags are
    /// visual-only.
    pub fn set_on_reorder(&self, callback: Option<ReorderCallback<I>>) {
        self.ctx.set_on_reorder(callback);
    }

    /// Forward every pending auto-scroll change to `surface`.
    pub fn attach_surface(&mut self, surface: impl ScrollSurface + 'static) {
        self.surface = Some(
            self.ctx
                .pending_scroll()
                .subscribe(move |&offset| surface.scroll_to(offset)),
        );
    }

    pub fn detach_surface(&mut self) {
        self.surface = None;
    }

    /// The scroll surface reported a new offset.
    pub fn on_scroll(&self, offset: f64) {
        self.ctx.scroll_y().set(offset);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.ctx.viewport().set(viewport);
    }

    /// Replace the sections collection.
    ///
    /// Regenerates the section mapping and syncs section controllers by id:
    /// survivors receive the new data, new ids are mounted, and missing ids
    /// are unmounted.
    pub fn set_sections(&mut self, sections: Vec<Section<I>>) {
        let metrics = self.ctx.config().metrics();
        self.ctx.sections().set(Snapshot::new(sections.clone()));
        self.ctx
            .content_height()
            .set(content_height(&sections, metrics));

        let mut survivors: FxHashMap<EntityId, SectionController<I>> = {
            let keep: FxHashSet<&EntityId> = sections.iter().map(|s| &s.id).collect();
            std::mem::take(&mut self.sections)
                .into_iter()
                .filter(|c| keep.contains(c.id()))
                .map(|c| (c.id().clone(), c))
                .collect()
        };

        self.ctx
            .section_positions()
            .set(PositionMap::generate(&sections));

        let ctx = &self.ctx;
        self.sections = sections
            .into_iter()
            .map(|section| match survivors.remove(&section.id) {
                Some(mut controller) => {
                    controller.set_data(section.data, ctx);
                    controller
                }
                None => SectionController::new(section, ctx),
            })
            .collect();
        ctx.register_bounds(self.sections.iter().map(SectionController::live_bounds));
        debug!(sections = self.sections.len(), "sections replaced");
    }

    /// Advance every animation by `dt`. Returns `true` while anything is
    /// still moving.
    pub fn tick(&self, dt: Duration) -> bool {
        let mut running = self.ctx.pending_scroll().tick(dt);
        for section in &self.sections {
            running |= section.tick(dt);
        }
        running
    }

    /// Deliver a pan event for an item.
    ///
    /// # Errors
    ///
    /// [`ListError::UnknownSection`] or [`ListError::UnknownItem`] when the
    /// ids are not mounted.
    pub fn item_pan(
        &mut self,
        section: &EntityId,
        item: &EntityId,
        event: PanEvent,
    ) -> Result<(), ListError> {
        let ctx = &self.ctx;
        let controller = self
            .sections
            .iter_mut()
            .find(|c| c.id() == section)
            .ok_or_else(|| ListError::UnknownSection(section.clone()))?;
        controller.item_pan(item, event, ctx)
    }

    /// Deliver a pan event for a section header.
    ///
    /// # Errors
    ///
    /// [`ListError::UnknownSection`] when the section is not mounted.
    pub fn section_pan(&mut self, section: &EntityId, event: PanEvent) -> Result<(), ListError> {
        let ctx = &self.ctx;
        let controller = self
            .sections
            .iter_mut()
            .find(|c| c.id() == section)
            .ok_or_else(|| ListError::UnknownSection(section.clone()))?;
        controller.header_pan(event, ctx);
        Ok(())
    }

    pub fn context(&self) -> &ListContext<I> {
        &self.ctx
    }

    pub fn config(&self) -> &ListConfig {
        self.ctx.config()
    }

    pub fn sections(&self) -> Snapshot<Vec<Section<I>>> {
        self.ctx.sections().get()
    }

    pub fn section(&self, id: &EntityId) -> Option<&SectionController<I>> {
        self.sections.iter().find(|c| c.id() == id)
    }

    pub fn section_controllers(&self) -> &[SectionController<I>] {
        &self.sections
    }

    pub fn moving_item(&self) -> Option<MovingItem> {
        self.ctx.moving_item().get()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.ctx.scroll_y().get()
    }

    pub fn content_height(&self) -> f64 {
        self.ctx.content_height().get()
    }

    pub fn section_positions(&self) -> PositionMap {
        self.ctx.section_positions().get()
    }

    pub fn item_positions(&self, section: &EntityId) -> Option<PositionMap> {
        self.section(section).map(SectionController::item_positions)
    }

    /// Settled top of a section under the current mapping.
    ///
    /// # Errors
    ///
    /// [`ListError::Layout`] when the section is not mapped.
    pub fn section_top(&self, section: &EntityId) -> Result<f64, ListError> {
        current_top(section, &self.ctx)
    }

    /// Whether any drag, item or section, is in progress.
    pub fn is_dragging(&self) -> bool {
        self.sections.iter().any(SectionController::has_active_drag)
    }

    /// Whether an auto-scroll is in flight.
    pub fn is_auto_scrolling(&self) -> bool {
        self.ctx.pending_scroll().is_animating()
    }

    pub fn frame(&self) -> ListFrame {
        ListFrame {
            scroll_y: self.ctx.scroll_y().get(),
            content_height: self.ctx.content_height().get(),
            moving_item: self.ctx.moving_item().get(),
            sections: self.sections.iter().map(SectionController::frame).collect(),
        }
    }

    /// Pair host nodes with their visual state, sections then items, in data
    /// order.
    pub fn render<R: SectionRenderer<I>>(&self, renderer: &R) -> Vec<RenderedSection<R::Node>> {
        self.sections
            .iter()
            .map(|controller| {
                let section = controller.section();
                let items = section
                    .data
                    .iter()
                    .zip(controller.items())
                    .map(|(item, item_controller)| RenderedItem {
                        id: item_controller.id().clone(),
                        node: renderer.render_item(item),
                        visual: item_controller.visual(),
                    })
                    .collect();
                RenderedSection {
                    id: section.id.clone(),
                    header: renderer.render_header(section),
                    visual: controller.visual(),
                    items,
                }
            })
            .collect()
    }
}
