#![forbid(unsafe_code)]

//! Transitions that drive an [`AnimatedValue`](crate::animated::AnimatedValue).
//!
//! Every transition moves a single `f64` (a pixel offset, a width percentage,
//! an opacity) from where it is toward where it should be. Time only moves when
//! the host calls [`Transition::advance`], so the same transition produces the
//! same trajectory for the same sequence of frame deltas.
//!
//! | Transition | Shape | Completes when |
//! |------------|-------|----------------|
//! | [`Timing`] | eased tween over a fixed duration | elapsed ≥ duration |
//! | [`Spring`] | damped harmonic oscillator | displacement and speed below thresholds |
//! | [`Decay`] | exponentially slowing glide | speed below threshold or a clamp bound is hit |

pub mod decay;
pub mod easing;
pub mod spring;
pub mod timing;

use std::fmt;
use std::time::Duration;

pub use decay::Decay;
pub use easing::{
    CubicBezier, EasingFn, collapse, ease_in, ease_in_out, ease_in_out_cubic, ease_out, linear,
};
pub use spring::Spring;
pub use timing::Timing;

/// A time-driven trajectory for one scalar.
pub trait Transition: Send + Sync + fmt::Debug {
    /// Advance the trajectory by `dt`.
    fn advance(&mut self, dt: Duration);

    /// Current position.
    fn position(&self) -> f64;

    /// Where the trajectory is heading. For [`Decay`] this is a projection.
    fn target(&self) -> f64;

    /// Current velocity in units per second. Transitions without momentum
    /// report zero.
    fn velocity(&self) -> f64 {
        0.0
    }

    /// Whether the trajectory has settled. A complete transition reports its
    /// final position and ignores further `advance` calls.
    fn is_complete(&self) -> bool;
}
