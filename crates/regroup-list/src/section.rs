#![forbid(unsafe_code)]

//! Section drag controller.
//!
//! Owns one section's header drag, its item controllers, and its item mapping.
//! It also watches the moving-item descriptor and claims the drop when an item
//! from another section hovers inside its bounds.
//!
//! # Invariants
//!
//! 1. Bounds are half-open, `[top, top + height)`, using the current animated
//!    top.
//! 2. A section claims the hovered item only when the current target's bounds
//!    no longer contain the pointer. The origin reclaims it the same way, but
//!    never highlights.
//! 3. The drop highlight border is `drop_highlight_width` exactly while
//!    claiming, and animates back to 0 otherwise.
//! 4. Item controllers stay in data order; a data change keeps controllers
//!    for surviving ids.

use std::time::Duration;

use regroup_core::animation::{ease_in_out, linear};
use regroup_core::{AnimatedValue, PanEvent, SharedValue, Span, Subscription};
use regroup_layout::{
    EntityId, Keyed, PositionMap, Section, ordinal_at, reorder_sections, section_top,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, debug_span, info, trace, warn};

use crate::autoscroll;
use crate::context::{ListContext, SectionBounds};
use crate::error::ListError;
use crate::item::ItemController;
use crate::moving::MovingItem;
use crate::visual::{ItemFrame, SectionFrame, SectionVisual, shadow_target, z_index};

/// State shared between a section, its items, and its subscriptions.
#[derive(Debug, Clone)]
pub(crate) struct SectionHandle {
    pub(crate) id: EntityId,
    /// Displayed top, in content coordinates.
    pub(crate) top: AnimatedValue,
    pub(crate) height: SharedValue<f64>,
    pub(crate) item_positions: SharedValue<PositionMap>,
    pub(crate) dragging: SharedValue<bool>,
    pub(crate) receiving_drop: SharedValue<bool>,
    pub(crate) border: AnimatedValue,
    pub(crate) shadow: AnimatedValue,
}

impl SectionHandle {
    pub(crate) fn bounds(&self) -> Span {
        Span::from_height(self.top.get(), self.height.get())
    }

    pub(crate) fn live_bounds(&self) -> SectionBounds {
        SectionBounds {
            top: self.top.clone(),
            height: self.height.clone(),
        }
    }

    fn highlight(&self, on: bool, width: f64, duration: Duration) {
        self.receiving_drop.set(on);
        let target = if on { width } else { 0.0 };
        if self.border.target() != target {
            self.border.timing_to(target, duration, ease_in_out);
        }
    }
}

/// Drag controller for one section and everything inside it.
#[derive(Debug)]
pub struct SectionController<I> {
    section: Section<I>,
    handle: SectionHandle,
    items: Vec<ItemController>,
    drag_origin: Option<PositionMap>,
    span: tracing::Span,
    _subscriptions: Vec<Subscription>,
}

impl<I: Keyed + Clone + Send + Sync + 'static> SectionController<I> {
    pub(crate) fn new(section: Section<I>, ctx: &ListContext<I>) -> Self {
        let config = ctx.config();
        let metrics = config.metrics();

        let top = current_top(&section.id, ctx).unwrap_or_else(|error| {
            warn!(section = %section.id, %error, "section top unavailable; using 0");
            0.0
        });

        let handle = SectionHandle {
            id: section.id.clone(),
            top: AnimatedValue::new(top),
            height: SharedValue::new(metrics.section_height(section.row_count())),
            item_positions: SharedValue::new(PositionMap::generate(&section.data)),
            dragging: SharedValue::new(false),
            receiving_drop: SharedValue::new(false),
            border: AnimatedValue::new(0.0),
            shadow: AnimatedValue::new(0.0),
        };

        let items = section
            .data
            .iter()
            .map(|item| ItemController::new(item.id().clone(), &handle, ctx))
            .collect();

        let subscriptions = vec![
            Self::watch_moving_item(&handle, ctx),
            Self::watch_section_positions(&handle, ctx),
        ];

        Self {
            section,
            handle,
            items,
            drag_origin: None,
            span: tracing::Span::none(),
            _subscriptions: subscriptions,
        }
    }

    /// Drop targeting: claim or release the hovered item on every
    /// descriptor change.
    ///
    /// The current target keeps the item for as long as its bounds contain
    /// the pointer, so overlapping sections never contend for it.
    fn watch_moving_item(handle: &SectionHandle, ctx: &ListContext<I>) -> Subscription {
        let handle = handle.clone();
        let shared = ctx.clone();
        let width = ctx.config().drop_highlight_width;
        let duration = ctx.config().settle_duration();

        ctx.moving_item().subscribe(move |current: &Option<MovingItem>| {
            let hovered = current
                .as_ref()
                .filter(|m| handle.bounds().contains(m.position_y));
            let Some(moving) = hovered else {
                handle.highlight(false, width, duration);
                return;
            };

            if moving.to_section_id != handle.id {
                let target_holds = shared
                    .section_bounds(&moving.to_section_id)
                    .is_some_and(|bounds| bounds.contains(moving.position_y));
                if target_holds {
                    handle.highlight(false, width, duration);
                    return;
                }
                trace!(section = %handle.id, item = %moving.id, "hover target changed");
                let id = handle.id.clone();
                shared.moving_item().update(|slot| {
                    if let Some(m) = slot.as_mut() {
                        m.to_section_id = id;
                    }
                });
                // The nested notification has already highlighted.
                return;
            }
            handle.highlight(moving.section_id != handle.id, width, duration);
        })
    }

    /// Idle sections spring to their new top when the section mapping changes.
    fn watch_section_positions(handle: &SectionHandle, ctx: &ListContext<I>) -> Subscription {
        let handle = handle.clone();
        let sections = ctx.sections().clone();
        let metrics = ctx.config().metrics();

        ctx.section_positions().subscribe(move |positions| {
            if handle.dragging.get() {
                return;
            }
            let snapshot = sections.load();
            match section_top(positions, snapshot.as_slice(), &handle.id, metrics) {
                Ok(target) => {
                    if handle.top.target() != target {
                        handle.top.spring_to(target);
                    }
                }
                Err(error) => warn!(section = %handle.id, %error, "section top unavailable"),
            }
        })
    }

    #[inline]
    pub fn id(&self) -> &EntityId {
        &self.section.id
    }

    /// The section as last handed to the list.
    pub fn section(&self) -> &Section<I> {
        &self.section
    }

    pub fn items(&self) -> &[ItemController] {
        &self.items
    }

    /// Displayed top offset, in content coordinates.
    pub fn top(&self) -> &AnimatedValue {
        &self.handle.top
    }

    pub fn height(&self) -> f64 {
        self.handle.height.get()
    }

    pub fn bounds(&self) -> Span {
        self.handle.bounds()
    }

    pub(crate) fn live_bounds(&self) -> (EntityId, SectionBounds) {
        (self.handle.id.clone(), self.handle.live_bounds())
    }

    pub fn item_positions(&self) -> PositionMap {
        self.handle.item_positions.get()
    }

    pub fn is_dragging(&self) -> bool {
        self.handle.dragging.get()
    }

    pub fn is_receiving_drop(&self) -> bool {
        self.handle.receiving_drop.get()
    }

    /// Whether this section or one of its items is being dragged.
    pub fn has_active_drag(&self) -> bool {
        self.is_dragging() || self.items.iter().any(ItemController::is_dragging)
    }

    pub fn visual(&self) -> SectionVisual {
        let dragging = self.handle.dragging.get();
        SectionVisual {
            top: self.handle.top.get(),
            height: self.handle.height.get(),
            z_index: z_index(dragging),
            shadow_opacity: self.handle.shadow.get(),
            border_width: self.handle.border.get(),
            receiving_drop: self.handle.receiving_drop.get(),
        }
    }

    pub fn frame(&self) -> SectionFrame {
        SectionFrame {
            id: self.section.id.clone(),
            visual: self.visual(),
            items: self
                .items
                .iter()
                .map(|item| ItemFrame {
                    id: item.id().clone(),
                    visual: item.visual(),
                })
                .collect(),
        }
    }

    /// Advance this section's animations and its items'. Returns `true` while
    /// any is running.
    pub fn tick(&self, dt: Duration) -> bool {
        let mut running = self.handle.top.tick(dt);
        running |= self.handle.border.tick(dt);
        running |= self.handle.shadow.tick(dt);
        for item in &self.items {
            running |= item.tick(dt);
        }
        running
    }

    /// Replace the section's items.
    ///
    /// Regenerates the item mapping, keeps controllers for surviving ids,
    /// recomputes the height, and eases the top to its new offset.
    pub(crate) fn set_data(&mut self, data: Vec<I>, ctx: &ListContext<I>) {
        let metrics = ctx.config().metrics();

        let mut survivors: FxHashMap<EntityId, ItemController> = {
            let keep: FxHashSet<&EntityId> = data.iter().map(Keyed::id).collect();
            std::mem::take(&mut self.items)
                .into_iter()
                .filter(|item| keep.contains(item.id()))
                .map(|item| (item.id().clone(), item))
                .collect()
        };

        self.handle
            .item_positions
            .set(PositionMap::generate(&data));

        self.items = data
            .iter()
            .map(|item| {
                survivors
                    .remove(item.id())
                    .unwrap_or_else(|| ItemController::new(item.id().clone(), &self.handle, ctx))
            })
            .collect();

        self.handle
            .height
            .set(metrics.section_height(data.len()));
        self.section.data = data;

        if self.handle.dragging.get() {
            return;
        }
        match current_top(&self.section.id, ctx) {
            Ok(target) => {
                if self.handle.top.target() != target {
                    self.handle
                        .top
                        .timing_to(target, ctx.config().settle_duration(), ease_in_out);
                }
            }
            Err(error) => warn!(section = %self.section.id, %error, "section top unavailable"),
        }
    }

    /// Route a pan on one of this section's items.
    pub(crate) fn item_pan(
        &mut self,
        item: &EntityId,
        event: PanEvent,
        ctx: &ListContext<I>,
    ) -> Result<(), ListError> {
        let handle = &self.handle;
        let controller = self
            .items
            .iter_mut()
            .find(|c| c.id() == item)
            .ok_or_else(|| ListError::UnknownItem {
                section: handle.id.clone(),
                item: item.clone(),
            })?;
        controller.handle(event, handle, ctx);
        Ok(())
    }

    /// Route a pan on this section's header.
    pub(crate) fn header_pan(&mut self, event: PanEvent, ctx: &ListContext<I>) {
        match event {
            PanEvent::Begin { absolute_y } => self.begin(absolute_y, ctx),
            PanEvent::Update { absolute_y } => self.update(absolute_y, ctx),
            PanEvent::End => self.end(ctx),
            PanEvent::Cancel => self.cancel(ctx),
        }
    }

    fn begin(&mut self, absolute_y: f64, ctx: &ListContext<I>) {
        if self.handle.dragging.get() {
            debug!(section = %self.section.id, "section pan begin while dragging; ignored");
            return;
        }
        if let Some(moving) = ctx.moving_item().get() {
            debug!(section = %self.section.id, moving = %moving.id, "an item is moving; ignored");
            return;
        }

        self.span = debug_span!("section_drag", section = %self.section.id);
        let span = self.span.clone();
        let _guard = span.enter();

        self.drag_origin = Some(ctx.section_positions().get());
        self.handle.dragging.set(true);
        self.handle.shadow.spring_to(shadow_target(true));
        debug!(absolute_y, "section drag began");
    }

    fn update(&mut self, absolute_y: f64, ctx: &ListContext<I>) {
        if !self.handle.dragging.get() {
            debug!(section = %self.section.id, "section pan update without begin; ignored");
            return;
        }
        let span = self.span.clone();
        let _guard = span.enter();

        let config = ctx.config();
        let position_y = absolute_y + ctx.scroll_y().get();
        let height = self.handle.height.get();

        autoscroll::drive(ctx, absolute_y, height * config.section_scroll_lead_in);
        self.handle.top.timing_to(
            position_y - config.section_header_height,
            config.drag_follow_duration(),
            linear,
        );

        let positions = ctx.section_positions().get();
        let current = positions.ordinal_or_zero(&self.section.id);
        let next = ordinal_at(position_y, height, positions.len());
        if next != current {
            trace!(from = current, to = next, "section ordinal swap");
            ctx.section_positions().set(positions.swapped(current, next));
        }
    }

    fn end(&mut self, ctx: &ListContext<I>) {
        if !self.handle.dragging.get() {
            debug!(section = %self.section.id, "section pan end without begin; ignored");
            return;
        }
        let span = std::mem::replace(&mut self.span, tracing::Span::none());
        let _guard = span.enter();

        if ctx.has_on_reorder() {
            let sections = ctx.sections().load();
            let next = reorder_sections(sections.as_slice(), &ctx.section_positions().get());
            info!(
                order = ?next.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
                "section reorder committed"
            );
            ctx.emit_reorder(next);
        }

        self.settle(ctx);
        debug!("section drag ended");
    }

    fn cancel(&mut self, ctx: &ListContext<I>) {
        if !self.handle.dragging.get() {
            debug!(section = %self.section.id, "section pan cancel without begin; ignored");
            return;
        }
        let span = std::mem::replace(&mut self.span, tracing::Span::none());
        let _guard = span.enter();

        if let Some(origin) = self.drag_origin.take() {
            ctx.section_positions().set(origin);
        }
        self.settle(ctx);
        debug!("section drag canceled");
    }

    fn settle(&mut self, ctx: &ListContext<I>) {
        match current_top(&self.section.id, ctx) {
            Ok(target) => {
                self.handle
                    .top
                    .timing_to(target, ctx.config().settle_duration(), ease_in_out);
            }
            Err(error) => warn!(section = %self.section.id, %error, "section top unavailable"),
        }
        autoscroll::cancel(ctx);
        self.handle.dragging.set(false);
        self.handle.shadow.spring_to(shadow_target(false));
        self.drag_origin = None;
    }
}

/// Top offset of `id` under the context's current mapping and sections.
pub(crate) fn current_top<I: Clone + Send + Sync + 'static>(
    id: &EntityId,
    ctx: &ListContext<I>,
) -> Result<f64, ListError> {
    let sections = ctx.sections().load();
    let positions = ctx.section_positions().load();
    Ok(section_top(
        &positions,
        sections.as_slice(),
        id,
        ctx.config().metrics(),
    )?)
}
