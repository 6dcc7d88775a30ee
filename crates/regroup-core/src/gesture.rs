#![forbid(unsafe_code)]

//! Pan gestures: the begin/update/end stream drag controllers consume.
//!
//! Hosts that already own a gesture system feed [`PanEvent`]s straight into
//! the controllers. Hosts that only see raw pointer samples run them through a
//! [`PanRecognizer`] first.
//!
//! # Invariants
//!
//! 1. A pan is well-formed: exactly one `Begin`, zero or more `Update`s, then
//!    exactly one `End` or `Cancel`.
//! 2. With a zero activation distance (the default) `Begin` fires on
//!    pointer-down. Otherwise it fires on the first move that travels at
//!    least the activation distance, immediately followed by an `Update` for
//!    that same sample.
//! 3. A pointer-up before activation produces nothing (it was a tap).
//! 4. After `reset()` the recognizer is idle and emits nothing for the
//!    abandoned pointer.

/// Raw pointer samples, in absolute (window) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { y: f64 },
    Move { y: f64 },
    Up,
    /// The platform took the pointer away (focus loss, system gesture).
    Cancel,
}

/// Semantic pan events delivered to a draggable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanEvent {
    Begin { absolute_y: f64 },
    Update { absolute_y: f64 },
    End,
    /// The gesture was abandoned. Consumers must not commit anything.
    Cancel,
}

/// Thresholds for pan recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct PanConfig {
    /// Vertical travel (pixels) required before a pan begins (default: 0).
    pub activation_distance: f64,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            activation_distance: 0.0,
        }
    }
}

impl PanConfig {
    #[must_use]
    pub fn with_activation_distance(mut self, distance: f64) -> Self {
        self.activation_distance = distance.max(0.0);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct PanTracker {
    start_y: f64,
    active: bool,
}

/// Turns pointer samples into a well-formed pan stream.
#[derive(Debug, Clone, Default)]
pub struct PanRecognizer {
    config: PanConfig,
    tracker: Option<PanTracker>,
}

impl PanRecognizer {
    #[must_use]
    pub fn new(config: PanConfig) -> Self {
        Self {
            config,
            tracker: None,
        }
    }

    /// Whether a pan is in progress (begun and not yet ended).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tracker.is_some_and(|t| t.active)
    }

    /// Feed one pointer sample, returning the pan events it produces.
    pub fn process(&mut self, event: PointerEvent) -> Vec<PanEvent> {
        let mut out = Vec::with_capacity(2);
        match event {
            PointerEvent::Down { y } => {
                if let Some(t) = self.tracker.take()
                    && t.active
                {
                    // A second down without an up: the old pan is lost.
                    tracing::debug!(start_y = t.start_y, "pointer down during active pan");
                    out.push(PanEvent::Cancel);
                }
                let active = self.config.activation_distance <= 0.0;
                self.tracker = Some(PanTracker { start_y: y, active });
                if active {
                    out.push(PanEvent::Begin { absolute_y: y });
                }
            }
            PointerEvent::Move { y } => {
                let Some(tracker) = self.tracker.as_mut() else {
                    return out;
                };
                if !tracker.active {
                    if (y - tracker.start_y).abs() < self.config.activation_distance {
                        return out;
                    }
                    tracker.active = true;
                    out.push(PanEvent::Begin {
                        absolute_y: tracker.start_y,
                    });
                }
                out.push(PanEvent::Update { absolute_y: y });
            }
            PointerEvent::Up => {
                if let Some(t) = self.tracker.take()
                    && t.active
                {
                    out.push(PanEvent::End);
                }
            }
            PointerEvent::Cancel => {
                if let Some(t) = self.tracker.take()
                    && t.active
                {
                    out.push(PanEvent::Cancel);
                }
            }
        }
        out
    }

    /// Forget any pointer in progress without emitting events.
    pub fn reset(&mut self) {
        self.tracker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(r: &mut PanRecognizer, events: &[PointerEvent]) -> Vec<PanEvent> {
        events.iter().flat_map(|e| r.process(*e)).collect()
    }

    #[test]
    fn immediate_pan_begins_on_down() {
        let mut r = PanRecognizer::default();
        let out = feed(
            &mut r,
            &[
                PointerEvent::Down { y: 10.0 },
                PointerEvent::Move { y: 12.0 },
                PointerEvent::Up,
            ],
        );
        assert_eq!(
            out,
            vec![
                PanEvent::Begin { absolute_y: 10.0 },
                PanEvent::Update { absolute_y: 12.0 },
                PanEvent::End,
            ]
        );
        assert!(!r.is_active());
    }

    #[test]
    fn activation_distance_delays_begin() {
        let mut r = PanRecognizer::new(PanConfig::default().with_activation_distance(8.0));
        assert!(r.process(PointerEvent::Down { y: 100.0 }).is_empty());
        assert!(r.process(PointerEvent::Move { y: 104.0 }).is_empty());
        assert_eq!(
            r.process(PointerEvent::Move { y: 92.0 }),
            vec![
                PanEvent::Begin { absolute_y: 100.0 },
                PanEvent::Update { absolute_y: 92.0 },
            ]
        );
        assert!(r.is_active());
    }

    #[test]
    fn tap_produces_nothing() {
        let mut r = PanRecognizer::new(PanConfig::default().with_activation_distance(5.0));
        let out = feed(
            &mut r,
            &[
                PointerEvent::Down { y: 0.0 },
                PointerEvent::Move { y: 1.0 },
                PointerEvent::Up,
            ],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn cancel_only_after_begin() {
        let mut r = PanRecognizer::default();
        r.process(PointerEvent::Down { y: 0.0 });
        assert_eq!(r.process(PointerEvent::Cancel), vec![PanEvent::Cancel]);
        assert!(r.process(PointerEvent::Cancel).is_empty());
    }

    #[test]
    fn second_down_cancels_active_pan() {
        let mut r = PanRecognizer::default();
        r.process(PointerEvent::Down { y: 0.0 });
        assert_eq!(
            r.process(PointerEvent::Down { y: 50.0 }),
            vec![PanEvent::Cancel, PanEvent::Begin { absolute_y: 50.0 }]
        );
    }

    #[test]
    fn moves_without_down_are_ignored() {
        let mut r = PanRecognizer::default();
        assert!(r.process(PointerEvent::Move { y: 3.0 }).is_empty());
        assert!(r.process(PointerEvent::Up).is_empty());
    }

    #[test]
    fn reset_abandons_silently() {
        let mut r = PanRecognizer::default();
        r.process(PointerEvent::Down { y: 0.0 });
        r.reset();
        assert!(r.process(PointerEvent::Up).is_empty());
    }
}
