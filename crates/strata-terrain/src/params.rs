//! Generation parameters: the only inputs besides the level tables.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::curve::HeightCurve;

/// Smallest scale accepted by the noise field; anything at or below zero is raised to it.
pub const MIN_SCALE: f64 = 1e-4;

/// How the noise field maps accumulated octave sums into `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Divide by the octave amplitude sum, then clamp each cell independently.
    /// Used by the flattened preview export.
    Clamp,
    /// Inverse-lerp every cell against the observed grid minimum and maximum.
    #[default]
    MinMax,
}

/// Shape of the edge falloff mask.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FalloffParams {
    /// Stretches normalized coordinates before centering: `i / size * multiplier - 1`.
    pub multiplier: f64,
    /// Exponent `a` of `v^a / (v^a + (b - b*v)^a)`.
    pub modifier_a: f64,
    /// Scale `b` of `v^a / (v^a + (b - b*v)^a)`.
    pub modifier_b: f64,
}

impl Default for FalloffParams {
    fn default() -> Self {
        Self {
            multiplier: 2.0,
            modifier_a: 3.0,
            modifier_b: 2.2,
        }
    }
}

/// Every numeric knob and flag that drives a generation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Side length of the square grid.
    pub dimension: usize,
    /// Seed for octave jitter and per-cell jagged draws.
    pub seed: i64,
    /// Noise zoom. Values `<= 0` are clamped to [`MIN_SCALE`].
    pub scale: f64,
    /// Number of noise octaves. Zero is raised to one.
    pub octaves: u32,
    /// Per-octave amplitude decay.
    pub persistence: f64,
    /// Per-octave frequency growth.
    pub lacunarity: f64,
    /// Spatial offset added to every octave's jitter.
    pub offset: DVec2,
    /// Multiplies the discretized elevation index into a z value.
    pub height_multiplier: i32,
    /// Normalization used by the main height field.
    pub normalization: Normalization,
    /// Remap applied to raw noise during compositing.
    pub height_curve: HeightCurve,
    /// Subtract the falloff mask from the noise.
    pub use_falloff: bool,
    /// With `use_falloff`, output the mask alone and ignore noise.
    pub falloff_only: bool,
    /// Mask shape.
    pub falloff: FalloffParams,
    /// Replace heights with `1 - height`.
    pub invert: bool,
    /// Force every column's z to zero.
    pub flatten: bool,
    /// Emit pillar fill entries under raised columns.
    pub fill_gaps: bool,
    /// Enable the random downward perturbation.
    pub jagged: bool,
    /// Fraction of cells perturbed when `jagged` is on, in `[0, 1]`.
    pub jagged_percent: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            dimension: 64,
            seed: 0,
            scale: 50.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: DVec2::ZERO,
            height_multiplier: 3,
            normalization: Normalization::MinMax,
            height_curve: HeightCurve::Passthrough,
            use_falloff: false,
            falloff_only: false,
            falloff: FalloffParams::default(),
            invert: false,
            flatten: false,
            fill_gaps: false,
            jagged: false,
            jagged_percent: 0.0,
        }
    }
}

impl GenerationParameters {
    /// Return a copy with out-of-domain numbers pulled back into range.
    ///
    /// Persistence and lacunarity are creative inputs and pass through untouched,
    /// even when negative.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.dimension = out.dimension.max(1);
        out.octaves = out.octaves.max(1);
        if out.scale.is_nan() || out.scale <= 0.0 {
            out.scale = MIN_SCALE;
        }
        out.jagged_percent = if out.jagged_percent.is_nan() {
            0.0
        } else {
            out.jagged_percent.clamp(0.0, 1.0)
        };
        out
    }

    /// Octave count after clamping to at least one.
    pub fn effective_octaves(&self) -> u32 {
        self.octaves.max(1)
    }

    /// Scale after clamping to [`MIN_SCALE`].
    pub fn effective_scale(&self) -> f64 {
        if self.scale.is_nan() || self.scale <= 0.0 {
            MIN_SCALE
        } else {
            self.scale
        }
    }
}
