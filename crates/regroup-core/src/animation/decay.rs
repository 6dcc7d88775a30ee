#![forbid(unsafe_code)]

//! Momentum glide: velocity decays exponentially until the value stops.

use std::time::Duration;

use super::Transition;

/// Default per-millisecond velocity retention.
pub const DEFAULT_DECELERATION: f64 = 0.998;

const REST_SPEED: f64 = 0.5;

/// Glides from an initial velocity, slowing by `deceleration` every
/// millisecond. Optional bounds stop the glide on contact.
#[derive(Debug, Clone)]
pub struct Decay {
    position: f64,
    velocity: f64,
    deceleration: f64,
    bounds: Option<(f64, f64)>,
    done: bool,
}

impl Decay {
    /// Start at `position` moving at `velocity` pixels per second.
    #[must_use]
    pub fn new(position: f64, velocity: f64) -> Self {
        Self {
            position,
            velocity,
            deceleration: DEFAULT_DECELERATION,
            bounds: None,
            done: velocity.abs() < REST_SPEED,
        }
    }

    /// Set the per-millisecond retention factor, clamped into `[0.5, 0.9999]`.
    #[must_use]
    pub fn deceleration(mut self, d: f64) -> Self {
        self.deceleration = d.clamp(0.5, 0.9999);
        self
    }

    /// Stop the glide when it reaches either bound.
    #[must_use]
    pub fn clamp(mut self, lo: f64, hi: f64) -> Self {
        self.bounds = Some((lo.min(hi), lo.max(hi)));
        self
    }

    /// Instantaneous velocity in pixels per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl Transition for Decay {
    fn advance(&mut self, dt: Duration) {
        if self.done {
            return;
        }
        let ms = dt.as_secs_f64() * 1000.0;
        let retained = self.deceleration.powf(ms);
        // Closed-form distance for continuous exponential decay over `ms`.
        let k = -self.deceleration.ln() * 1000.0;
        self.position += self.velocity * (1.0 - retained) / k;
        self.velocity *= retained;

        if let Some((lo, hi)) = self.bounds
            && !(lo..=hi).contains(&self.position)
        {
            self.position = self.position.clamp(lo, hi);
            self.velocity = 0.0;
            self.done = true;
            return;
        }
        if self.velocity.abs() < REST_SPEED {
            self.velocity = 0.0;
            self.done = true;
        }
    }

    fn position(&self) -> f64 {
        self.position
    }

    /// Where the glide would come to rest if nothing interrupted it.
    fn target(&self) -> f64 {
        let k = -self.deceleration.ln() * 1000.0;
        let rest = self.position + self.velocity / k;
        match self.bounds {
            Some((lo, hi)) => rest.clamp(lo, hi),
            None => rest,
        }
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }

    fn is_complete(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glides_toward_projection() {
        let mut decay = Decay::new(0.0, 1000.0);
        let projected = decay.target();
        for _ in 0..600 {
            decay.advance(Duration::from_millis(16));
        }
        assert!(decay.is_complete());
        assert!((decay.position() - projected).abs() < 1.0);
        assert!(decay.position() > 0.0);
    }

    #[test]
    fn clamp_stops_at_bound() {
        let mut decay = Decay::new(0.0, -5000.0).clamp(-50.0, 50.0);
        for _ in 0..100 {
            decay.advance(Duration::from_millis(16));
        }
        assert!(decay.is_complete());
        assert_eq!(decay.position(), -50.0);
    }

    #[test]
    fn slow_start_is_already_done() {
        let decay = Decay::new(3.0, 0.1);
        assert!(decay.is_complete());
        assert_eq!(decay.target(), 3.0 + 0.1 / (-DEFAULT_DECELERATION.ln() * 1000.0));
    }
}
