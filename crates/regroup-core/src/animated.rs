#![forbid(unsafe_code)]

//! Animated shared values.
//!
//! An [`AnimatedValue`] is a [`SharedValue<f64>`] with at most one in-flight
//! [`Transition`]. Starting a new transition replaces the old one mid-flight,
//! [`cancel`](AnimatedValue::cancel) freezes the value where it is, and
//! [`tick`](AnimatedValue::tick) advances the transition and publishes the new
//! position to subscribers.
//!
//! The driver lock is never held while subscribers run, so a subscriber may
//! start or cancel animations on the value that notified it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::animation::{Decay, EasingFn, Spring, Timing, Transition, ease_in_out};
use crate::shared::{SharedValue, Subscription};

type Driver = Option<Box<dyn Transition>>;

/// A shared scalar that can be animated toward new targets.
///
/// Clones share the value, the subscribers, and the in-flight transition.
#[derive(Clone)]
pub struct AnimatedValue {
    value: SharedValue<f64>,
    driver: Arc<Mutex<Driver>>,
}

impl fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("value", &self.get())
            .field("animating", &self.is_animating())
            .finish()
    }
}

impl Default for AnimatedValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AnimatedValue {
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            value: SharedValue::new(initial),
            driver: Arc::new(Mutex::new(None)),
        }
    }

    /// Current (possibly mid-flight) value.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    /// The underlying shared value, for subscribing or sharing read access.
    #[must_use]
    pub fn shared(&self) -> &SharedValue<f64> {
        &self.value
    }

    pub fn subscribe(&self, callback: impl Fn(&f64) + Send + Sync + 'static) -> Subscription {
        self.value.subscribe(callback)
    }

    /// Cancel any transition and jump to `value`.
    pub fn set(&self, value: f64) {
        self.lock_driver().take();
        self.value.set(value);
    }

    /// Replace the in-flight transition.
    ///
    /// A transition that is already complete (for example a zero-length
    /// tween) is applied immediately.
    pub fn animate(&self, transition: impl Transition + 'static) {
        if transition.is_complete() {
            let end = transition.position();
            self.set(end);
            return;
        }
        *self.lock_driver() = Some(Box::new(transition));
    }

    /// Tween from the current value to `target`.
    pub fn timing_to(&self, target: f64, duration: Duration, easing: EasingFn) {
        self.animate(Timing::new(self.get(), target).duration(duration).easing(easing));
    }

    /// Tween to `target` with the default duration and curve.
    pub fn timing(&self, target: f64) {
        self.animate(Timing::new(self.get(), target).easing(ease_in_out));
    }

    /// Spring toward `target`, keeping the velocity of an in-flight spring.
    pub fn spring_to(&self, target: f64) {
        let velocity = self.in_flight_velocity();
        self.animate(Spring::new(self.get(), target).with_velocity(velocity));
    }

    /// Glide from the current value at `velocity` pixels per second.
    pub fn decay(&self, velocity: f64) {
        self.animate(Decay::new(self.get(), velocity));
    }

    /// Stop the in-flight transition, leaving the value where it is.
    ///
    /// Returns `true` if something was running.
    pub fn cancel(&self) -> bool {
        self.lock_driver().take().is_some()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.lock_driver().is_some()
    }

    /// Where the value is heading: the transition target, or the current
    /// value when idle.
    #[must_use]
    pub fn target(&self) -> f64 {
        match self.lock_driver().as_ref() {
            Some(transition) => transition.target(),
            None => self.get(),
        }
    }

    /// Advance the in-flight transition by `dt` and publish its position.
    ///
    /// Returns `true` while the value is still animating.
    pub fn tick(&self, dt: Duration) -> bool {
        let (position, running) = {
            let mut driver = self.lock_driver();
            let Some(transition) = driver.as_mut() else {
                return false;
            };
            transition.advance(dt);
            let position = transition.position();
            let running = !transition.is_complete();
            if !running {
                driver.take();
            }
            (position, running)
        };
        self.value.set(position);
        running
    }

    fn in_flight_velocity(&self) -> f64 {
        self.lock_driver().as_ref().map_or(0.0, |t| t.velocity())
    }

    fn lock_driver(&self) -> MutexGuard<'_, Driver> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
