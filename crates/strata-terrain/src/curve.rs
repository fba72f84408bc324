//! Monotonic remap curves applied to raw noise during compositing.

use serde::{Deserialize, Serialize};

/// A float-to-float remap evaluated per cell by the height compositor.
///
/// Implemented for any `Fn(f64) -> f64`, so a caller can pass a closure
/// sampled from its own curve representation.
pub trait RemapCurve {
    /// Evaluate the curve at `t`.
    fn evaluate(&self, t: f64) -> f64;
}

impl<F: Fn(f64) -> f64> RemapCurve for F {
    fn evaluate(&self, t: f64) -> f64 {
        self(t)
    }
}

/// A serializable height curve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum HeightCurve {
    /// Always evaluates to `1.0`, so `noise * curve(noise) == noise`.
    #[default]
    Passthrough,
    /// Piecewise-linear keyframes `(time, value)`, sorted by time.
    /// Inputs before the first key or after the last are clamped to the end values.
    Linear(Vec<(f64, f64)>),
}

impl RemapCurve for HeightCurve {
    fn evaluate(&self, t: f64) -> f64 {
        match self {
            HeightCurve::Passthrough => 1.0,
            HeightCurve::Linear(keys) => evaluate_keys(keys, t),
        }
    }
}

fn evaluate_keys(keys: &[(f64, f64)], t: f64) -> f64 {
    let (Some(&(t0, v0)), Some(&(tn, vn))) = (keys.first(), keys.last()) else {
        return 1.0;
    };
    if t <= t0 {
        return v0;
    }
    if t >= tn {
        return vn;
    }
    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.0 {
            let span = b.0 - a.0;
            if span <= 0.0 {
                return b.1;
            }
            let s = (t - a.0) / span;
            return a.1 + (b.1 - a.1) * s;
        }
    }
    vn
}
