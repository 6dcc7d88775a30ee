#![forbid(unsafe_code)]

//! Fixed-duration eased tween.

use std::time::Duration;

use super::Transition;
use super::easing::{EasingFn, ease_in_out};

/// Default duration of a timed transition.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Interpolates from `from` to `to` over `duration`, shaped by an easing curve.
///
/// A zero duration completes on the first `advance` (or immediately, as far
/// as [`Transition::is_complete`] is concerned).
#[derive(Debug, Clone)]
pub struct Timing {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl Timing {
    /// Tween from `from` to `to` with the default duration and curve.
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            duration: DEFAULT_DURATION,
            elapsed: Duration::ZERO,
            easing: ease_in_out,
        }
    }

    /// Set the duration (builder pattern).
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress in `[0, 1]` before easing.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

impl Transition for Timing {
    fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn position(&self) -> f64 {
        let p = self.progress();
        if p >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.easing)(p)
    }

    fn target(&self) -> f64 {
        self.to
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}
