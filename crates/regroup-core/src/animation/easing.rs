#![forbid(unsafe_code)]

//! Easing curves mapping normalized time `t ∈ [0, 1]` to progress.
//!
//! All curves satisfy `f(0) = 0` and `f(1) = 1`. Inputs outside `[0, 1]` are
//! clamped first.

/// An easing curve.
pub type EasingFn = fn(f64) -> f64;

/// Constant speed.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic acceleration from rest.
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic deceleration to rest.
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic in, quadratic out. The default curve for timed transitions.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic in, cubic out.
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Curve used when a dragged section collapses its rows.
#[must_use]
pub fn collapse(t: f64) -> f64 {
    CubicBezier::new(0.79, 0.33, 0.14, 0.53).solve(t)
}

/// A CSS-style cubic Bézier easing with fixed endpoints `(0,0)` and `(1,1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_EPSILON: f64 = 1e-7;
const BISECTION_ITERATIONS: usize = 32;

impl CubicBezier {
    /// Control points `(x1, y1)` and `(x2, y2)`. X coordinates are clamped to
    /// `[0, 1]` so the curve stays a function of time.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn sample(a1: f64, a2: f64, s: f64) -> f64 {
        // B(s) = 3(1-s)^2 s a1 + 3(1-s) s^2 a2 + s^3
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
    }

    fn slope(a1: f64, a2: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
    }

    /// Progress at normalized time `t`.
    #[must_use]
    pub fn solve(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = self.param_for_x(t);
        Self::sample(self.y1, self.y2, s)
    }

    fn param_for_x(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::sample(self.x1, self.x2, s) - x;
            if err.abs() < NEWTON_EPSILON && (0.0..=1.0).contains(&s) {
                return s;
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < NEWTON_EPSILON {
                break;
            }
            s -= err / d;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let v = Self::sample(self.x1, self.x2, s);
            if (v - x).abs() < NEWTON_EPSILON {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}
