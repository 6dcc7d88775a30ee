#![forbid(unsafe_code)]

//! Damped harmonic oscillator.
//!
//! Models the classical spring equation
//!
//!   m·a = -stiffness × (position - target) - damping × velocity
//!
//! integrated with semi-implicit Euler. Positions are in pixels and velocities
//! in pixels per second, so the defaults (stiffness 100, damping 10, mass 1)
//! give the slightly bouncy settle rows perform when a sibling swaps past them.
//!
//! # Invariants
//!
//! 1. Stiffness and mass are always positive (clamped on construction).
//! 2. Once at rest the spring holds `target` exactly and ignores `advance`
//!    until `set_target` moves the target.
//! 3. Large frame deltas are subdivided into ≤4 ms steps, so a 1 s hitch
//!    settles the same way sixty 16 ms frames would.

use std::time::Duration;

use super::Transition;

const MAX_STEP_SECS: f64 = 0.004;
const DEFAULT_REST_DISPLACEMENT: f64 = 0.01;
const DEFAULT_REST_SPEED: f64 = 2.0;
const MIN_STIFFNESS: f64 = 0.1;
const MIN_MASS: f64 = 0.01;

/// A spring pulling a scalar toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    rest_displacement: f64,
    rest_speed: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring starting at `from`, at rest velocity, heading to `to`.
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        let at_rest = (from - to).abs() < DEFAULT_REST_DISPLACEMENT;
        Self {
            position: if at_rest { to } else { from },
            velocity: 0.0,
            target: to,
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_speed: DEFAULT_REST_SPEED,
            at_rest,
        }
    }

    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    #[must_use]
    pub fn with_mass(mut self, m: f64) -> Self {
        self.mass = m.max(MIN_MASS);
        self
    }

    /// Carry over velocity from whatever was moving the value before.
    #[must_use]
    pub fn with_velocity(mut self, v: f64) -> Self {
        self.velocity = v;
        if v != 0.0 {
            self.at_rest = false;
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Damping at which the spring converges fastest without overshoot.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Move the target. Wakes the spring if the move is noticeable.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_displacement {
            self.target = target;
            self.at_rest = false;
        }
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let force = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += force / self.mass * dt;
        self.position += self.velocity * dt;
    }
}

impl Transition for Spring {
    fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            self.step(step);
            remaining -= step;
        }

        if (self.position - self.target).abs() < self.rest_displacement
            && self.velocity.abs() < self.rest_speed
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn target(&self) -> f64 {
        self.target
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }
}
