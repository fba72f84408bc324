//! Square edge-falloff mask used to push terrain down toward the borders.

use crate::grid::Grid;
use crate::params::FalloffParams;

/// Generate a `size x size` falloff mask.
///
/// Cell `(i, j)` maps to `x = i / size * multiplier - 1` (same for `y`), takes
/// the Chebyshev distance `v = max(|x|, |y|)` and stores the easing
/// `v^a / (v^a + (b - b*v)^a)`. No randomness is involved.
pub fn generate_falloff(size: usize, params: &FalloffParams) -> Grid<f64> {
    let n = size as f64;
    Grid::from_fn(size, size, |i, j| {
        let x = i as f64 / n * params.multiplier - 1.0;
        let y = j as f64 / n * params.multiplier - 1.0;
        let v = x.abs().max(y.abs());
        evaluate(v, params.modifier_a, params.modifier_b)
    })
}

/// The falloff easing curve `v^a / (v^a + (b - b*v)^a)`.
///
/// Uses `libm` so that masks match bit-for-bit across platforms. A zero
/// denominator evaluates to `0.0`.
pub fn evaluate(v: f64, a: f64, b: f64) -> f64 {
    let num = libm::pow(v, a);
    let den = num + libm::pow(b - b * v, a);
    if den == 0.0 || den.is_nan() {
        return 0.0;
    }
    num / den
}
