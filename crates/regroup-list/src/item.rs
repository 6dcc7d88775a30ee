#![forbid(unsafe_code)]

//! Item drag controller.
//!
//! One controller per mounted item. Idle items follow their ordinal in the
//! section's item mapping with a spring. A dragged item follows the pointer,
//! swaps ordinals live as it crosses row boundaries, and publishes the
//! moving-item descriptor that sections use for drop targeting.
//!
//! # State machine
//!
//! ```text
//!          Begin                 End / Cancel
//!   Idle ─────────▶ Dragging ─────────────────▶ Idle
//!                     │  ▲
//!                     └──┘ Update
//! ```
//!
//! # Invariants
//!
//! 1. While dragging, mapping changes never move this item; its own pointer
//!    updates take precedence.
//! 2. End clears the descriptor and cancels auto-scroll unconditionally.
//! 3. Cancel never commits and restores the mapping captured at Begin.

use std::time::Duration;

use regroup_core::animation::{collapse, ease_in_out, linear};
use regroup_core::{AnimatedValue, PanEvent, SharedValue, Subscription};
use regroup_layout::{EntityId, Keyed, PositionMap, item_top, ordinal_at, reorder_after_item_drop};
use tracing::{debug, debug_span, info, trace, warn};

use crate::autoscroll;
use crate::context::ListContext;
use crate::moving::MovingItem;
use crate::section::SectionHandle;
use crate::visual::{ItemVisual, shadow_target, z_index};

/// Drag controller for one item.
#[derive(Debug)]
pub struct ItemController {
    id: EntityId,
    section_id: EntityId,
    top: AnimatedValue,
    width_percent: AnimatedValue,
    shadow: AnimatedValue,
    dragging: SharedValue<bool>,
    drag_origin: Option<PositionMap>,
    span: tracing::Span,
    _subscriptions: Vec<Subscription>,
}

impl ItemController {
    pub(crate) fn new<I: Keyed + Clone + Send + Sync + 'static>(
        id: EntityId,
        section: &SectionHandle,
        ctx: &ListContext<I>,
    ) -> Self {
        let config = ctx.config();
        let metrics = config.metrics();
        let initial = section
            .item_positions
            .with(|positions| item_top(&id, positions, metrics));

        let top = AnimatedValue::new(initial);
        let width_percent = AnimatedValue::new(100.0);
        let dragging = SharedValue::new(false);

        let mut subscriptions = Vec::with_capacity(2);

        // Idle items spring to their new slot when the mapping changes.
        subscriptions.push({
            let id = id.clone();
            let top = top.clone();
            let dragging = dragging.clone();
            let section_dragging = section.dragging.clone();
            let collapsible = config.amazing_effect;
            section.item_positions.subscribe(move |positions| {
                if dragging.get() || (collapsible && section_dragging.get()) {
                    return;
                }
                let target = item_top(&id, positions, metrics);
                if top.target() != target {
                    top.spring_to(target);
                }
            })
        });

        if config.amazing_effect {
            let id = id.clone();
            let top = top.clone();
            let width = width_percent.clone();
            let positions = section.item_positions.clone();
            let duration = config.collapse_duration();
            subscriptions.push(section.dragging.subscribe(move |&collapsed| {
                let target = if collapsed {
                    metrics.header_height
                } else {
                    positions.with(|p| item_top(&id, p, metrics))
                };
                collapse_to(&top, &width, collapsed, target, duration);
            }));
        }

        Self {
            id,
            section_id: section.id.clone(),
            top,
            width_percent,
            shadow: AnimatedValue::new(0.0),
            dragging,
            drag_origin: None,
            span: tracing::Span::none(),
            _subscriptions: subscriptions,
        }
    }

    #[inline]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    #[inline]
    pub fn section_id(&self) -> &EntityId {
        &self.section_id
    }

    /// Displayed top offset, relative to the section's top.
    pub fn top(&self) -> &AnimatedValue {
        &self.top
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    pub fn visual(&self) -> ItemVisual {
        let dragging = self.dragging.get();
        ItemVisual {
            top: self.top.get(),
            width_percent: self.width_percent.get(),
            z_index: z_index(dragging),
            shadow_opacity: self.shadow.get(),
        }
    }

    /// Advance this item's animations. Returns `true` while any is running.
    pub fn tick(&self, dt: Duration) -> bool {
        self.top.tick(dt) | self.width_percent.tick(dt) | self.shadow.tick(dt)
    }

    pub(crate) fn handle<I: Keyed + Clone + Send + Sync + 'static>(
        &mut self,
        event: PanEvent,
        section: &SectionHandle,
        ctx: &ListContext<I>,
    ) {
        match event {
            PanEvent::Begin { absolute_y } => self.begin(absolute_y, section, ctx),
            PanEvent::Update { absolute_y } => self.update(absolute_y, section, ctx),
            PanEvent::End => self.end(section, ctx),
            PanEvent::Cancel => self.cancel(section, ctx),
        }
    }

    fn begin<I: Keyed + Clone + Send + Sync + 'static>(
        &mut self,
        absolute_y: f64,
        section: &SectionHandle,
        ctx: &ListContext<I>,
    ) {
        if self.dragging.get() {
            debug!(item = %self.id, "item pan begin while dragging; ignored");
            return;
        }
        if let Some(other) = ctx.moving_item().get() {
            debug!(item = %self.id, moving = %other.id, "another item is moving; ignored");
            return;
        }
        if section.dragging.get() {
            debug!(item = %self.id, "section is being dragged; ignored");
            return;
        }

        self.span = debug_span!("item_drag", item = %self.id, section = %self.section_id);
        let span = self.span.clone();
        let _guard = span.enter();

        let positions = section.item_positions.get();
        let index = positions.ordinal_or_zero(&self.id);
        self.drag_origin = Some(positions);
        self.dragging.set(true);
        self.shadow.spring_to(shadow_target(true));

        let position_y = absolute_y - ctx.config().section_header_height + ctx.scroll_y().get();
        debug!(index, position_y, "item drag began");
        ctx.moving_item().set(Some(MovingItem::begin(
            self.id.clone(),
            self.section_id.clone(),
            index,
            position_y,
        )));
    }

    fn update<I: Keyed + Clone + Send + Sync + 'static>(
        &mut self,
        absolute_y: f64,
        section: &SectionHandle,
        ctx: &ListContext<I>,
    ) {
        if !self.dragging.get() {
            debug!(item = %self.id, "item pan update without begin; ignored");
            return;
        }
        let span = self.span.clone();
        let _guard = span.enter();

        let config = ctx.config();
        let section_top = section.top.get();
        let offset = absolute_y - section_top - config.section_header_height + ctx.scroll_y().get();

        autoscroll::drive(ctx, absolute_y, 0.0);
        self.top
            .timing_to(offset, config.drag_follow_duration(), linear);

        let positions = section.item_positions.get();
        let current = positions.ordinal_or_zero(&self.id);
        let next = ordinal_at(offset, config.row_height, positions.len());

        ctx.moving_item().update(|slot| {
            if let Some(moving) = slot.as_mut() {
                moving.position_y = offset + section_top;
                moving.to_index = next;
            }
        });

        if next != current {
            trace!(from = current, to = next, "item ordinal swap");
            section.item_positions.set(positions.swapped(current, next));
        }
    }

    fn end<I: Keyed + Clone + Send + Sync + 'static>(
        &mut self,
        section: &SectionHandle,
        ctx: &ListContext<I>,
    ) {
        if !self.dragging.get() {
            debug!(item = %self.id, "item pan end without begin; ignored");
            return;
        }
        let span = std::mem::replace(&mut self.span, tracing::Span::none());
        let _guard = span.enter();

        let moving = ctx.moving_item().get().filter(|m| m.id == self.id);
        if let Some(moving) = moving.as_ref()
            && ctx.has_on_reorder()
        {
            let sections = ctx.sections().load();
            let positions = section.item_positions.get();
            match reorder_after_item_drop(sections.as_slice(), &moving.to_move(), &positions) {
                Ok(next) => {
                    info!(
                        from_section = %moving.section_id,
                        to_section = %moving.to_section_id,
                        from_index = moving.from_index,
                        to_index = moving.to_index,
                        "item reorder committed"
                    );
                    ctx.emit_reorder(next);
                }
                Err(error) => warn!(%error, "item reorder skipped"),
            }
        }

        self.settle(section, ctx);
        debug!("item drag ended");
    }

    fn cancel<I: Keyed + Clone + Send + Sync + 'static>(
        &mut self,
        section: &SectionHandle,
        ctx: &ListContext<I>,
    ) {
        if !self.dragging.get() {
            debug!(item = %self.id, "item pan cancel without begin; ignored");
            return;
        }
        let span = std::mem::replace(&mut self.span, tracing::Span::none());
        let _guard = span.enter();

        if let Some(origin) = self.drag_origin.take() {
            section.item_positions.set(origin);
        }
        self.settle(section, ctx);
        debug!("item drag canceled");
    }

    /// Shared tail of End and Cancel.
    fn settle<I: Keyed + Clone + Send + Sync + 'static>(
        &mut self,
        section: &SectionHandle,
        ctx: &ListContext<I>,
    ) {
        let config = ctx.config();
        let target = section
            .item_positions
            .with(|positions| item_top(&self.id, positions, config.metrics()));
        self.top
            .timing_to(target, config.settle_duration(), ease_in_out);

        ctx.moving_item().set(None);
        autoscroll::cancel(ctx);
        self.dragging.set(false);
        self.shadow.spring_to(shadow_target(false));
        self.drag_origin = None;
    }
}

/// Shrink an item under its header, or grow it back to its slot at `top_target`.
fn collapse_to(
    top: &AnimatedValue,
    width: &AnimatedValue,
    collapsed: bool,
    top_target: f64,
    duration: Duration,
) {
    let width_target = if collapsed { 0.0 } else { 100.0 };
    width.timing_to(width_target, duration, collapse);
    top.timing_to(top_target, duration, collapse);
}
