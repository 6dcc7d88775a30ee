#![forbid(unsafe_code)]

//! Edge auto-scroll.
//!
//! While a drag is near the top or bottom of the viewport the list scrolls
//! toward that end over a fixed, long duration. The request lives in the
//! context's pending-scroll value and is canceled as soon as the pointer
//! leaves the edge zone or the drag finishes.
//!
//! # Invariants
//!
//! 1. The top zone is inclusive: a pointer exactly at `insets.top + threshold`
//!    scrolls up.
//! 2. The bottom zone tests `pointer + lead_in` against
//!    `viewport.height - threshold`, also inclusive.
//! 3. Repeating a request toward the target already in flight does not
//!    restart it; a fresh request starts from the current scroll offset.

use regroup_core::Viewport;
use regroup_core::animation::ease_in_out;
use tracing::debug;

use crate::context::ListContext;

/// Which edge a pointer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeZone {
    Top,
    Bottom,
}

/// Classify an absolute pointer position.
///
/// `lead_in` is added to the pointer before the bottom test; item drags pass 0,
/// section drags a fraction of the section's height.
pub fn edge_zone(absolute_y: f64, lead_in: f64, viewport: &Viewport, threshold: f64) -> Option<EdgeZone> {
    if absolute_y <= viewport.insets.top + threshold {
        Some(EdgeZone::Top)
    } else if absolute_y + lead_in >= viewport.height - threshold {
        Some(EdgeZone::Bottom)
    } else {
        None
    }
}

/// Request, keep, or cancel auto-scroll for a pointer update.
pub(crate) fn drive<I: Clone + Send + Sync + 'static>(
    ctx: &ListContext<I>,
    absolute_y: f64,
    lead_in: f64,
) -> Option<EdgeZone> {
    let viewport = ctx.viewport().get();
    let zone = edge_zone(absolute_y, lead_in, &viewport, ctx.config().edge_threshold());
    match zone {
        Some(EdgeZone::Top) => request(ctx, 0.0),
        Some(EdgeZone::Bottom) => request(ctx, ctx.content_height().get()),
        None => cancel(ctx),
    }
    zone
}

/// Animate the pending scroll toward `target`.
pub(crate) fn request<I: Clone + Send + Sync + 'static>(ctx: &ListContext<I>, target: f64) {
    let pending = ctx.pending_scroll();
    if pending.is_animating() {
        if pending.target() == target {
            return;
        }
    } else {
        pending.set(ctx.scroll_y().get());
    }
    debug!(from = pending.get(), target, "auto-scroll requested");
    pending.timing_to(target, ctx.config().auto_scroll_duration(), ease_in_out);
}

/// Stop any auto-scroll in flight.
pub(crate) fn cancel<I: Clone + Send + Sync + 'static>(ctx: &ListContext<I>) {
    if ctx.pending_scroll().cancel() {
        debug!("auto-scroll canceled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regroup_core::Insets;

    fn viewport() -> Viewport {
        Viewport::new(800.0, Insets::new(44.0, 34.0))
    }

    #[test]
    fn top_zone_is_inclusive() {
        let vp = viewport();
        assert_eq!(edge_zone(94.0, 0.0, &vp, 50.0), Some(EdgeZone::Top));
        assert_eq!(edge_zone(95.0, 0.0, &vp, 50.0), None);
    }

    #[test]
    fn bottom_zone_is_inclusive() {
        let vp = viewport();
        assert_eq!(edge_zone(750.0, 0.0, &vp, 50.0), Some(EdgeZone::Bottom));
        assert_eq!(edge_zone(749.0, 0.0, &vp, 50.0), None);
    }

    #[test]
    fn lead_in_pulls_bottom_zone_up() {
        let vp = viewport();
        assert_eq!(edge_zone(600.0, 0.0, &vp, 50.0), None);
        assert_eq!(edge_zone(600.0, 150.0, &vp, 50.0), Some(EdgeZone::Bottom));
    }

    #[test]
    fn top_wins_when_zones_overlap() {
        let tiny = Viewport::new(60.0, Insets::default());
        assert_eq!(edge_zone(30.0, 0.0, &tiny, 50.0), Some(EdgeZone::Top));
    }
}
