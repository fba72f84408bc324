//! Multi-octave Perlin noise field over a rectangular grid.
//!
//! Each octave is shifted by a seeded jitter vector so that overlapping
//! octaves do not line up, then summed with persistence/lacunarity decay.

use glam::DVec2;
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::grid::Grid;
use crate::params::{GenerationParameters, Normalization};
use crate::seed::{octave_rng, perlin_seed};

/// Octave jitter is drawn uniformly from `[-JITTER_RANGE, JITTER_RANGE)`.
pub const JITTER_RANGE: i32 = 100_000;

/// A configured noise field ready to be sampled or rasterized.
pub struct NoiseField {
    noise: Perlin,
    width: usize,
    height: usize,
    scale: f64,
    persistence: f64,
    lacunarity: f64,
    amplitude_sum: f64,
    octave_offsets: Vec<DVec2>,
}

impl NoiseField {
    /// Build a field for a `width x height` grid, drawing jitter from the
    /// parameters' seed.
    pub fn new(params: &GenerationParameters, width: usize, height: usize) -> Self {
        let mut rng = octave_rng(params.seed);
        Self::with_rng(params, width, height, &mut rng)
    }

    /// Build a field drawing octave jitter from a caller-supplied stream.
    ///
    /// Exactly two draws are consumed per octave.
    pub fn with_rng<R: Rng>(
        params: &GenerationParameters,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let octaves = params.effective_octaves();

        let octave_offsets = (0..octaves)
            .map(|_| {
                let jx = rng.random_range(-JITTER_RANGE..JITTER_RANGE) as f64 + params.offset.x;
                let jy = rng.random_range(-JITTER_RANGE..JITTER_RANGE) as f64 + params.offset.y;
                DVec2::new(jx / width as f64, jy / height as f64)
            })
            .collect();

        Self {
            noise: Perlin::new(perlin_seed(params.seed)),
            width,
            height,
            scale: params.effective_scale(),
            persistence: params.persistence,
            lacunarity: params.lacunarity,
            amplitude_sum: amplitude_sum(params.persistence, octaves),
            octave_offsets,
        }
    }

    /// Per-octave jitter vectors, already divided by the grid dimensions.
    pub fn octave_offsets(&self) -> &[DVec2] {
        &self.octave_offsets
    }

    /// Raw accumulated octave sum at cell `(x, y)` before normalization.
    ///
    /// Each octave contributes a Perlin sample mapped to `[0, 1]`, weighted by
    /// its amplitude.
    pub fn sample(&self, x: usize, y: usize) -> f64 {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;

        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;

        for jitter in &self.octave_offsets {
            let sx = (x as f64 - half_w) / self.scale * frequency + jitter.x * frequency;
            let sy = (y as f64 - half_h) / self.scale * frequency + jitter.y * frequency;
            let value = self.noise.get([sx, sy]) * 0.5 + 0.5;
            total += value * amplitude;

            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        total
    }

    /// Sum of the absolute octave amplitudes, the largest value [`sample`](Self::sample)
    /// can reach.
    pub fn amplitude_sum(&self) -> f64 {
        self.amplitude_sum
    }

    /// Rasterize the field, normalizing with the given mode.
    ///
    /// `Clamp` divides each sum by [`amplitude_sum`](Self::amplitude_sum) before
    /// clamping, so stacked octaves do not saturate at 1.
    pub fn generate(&self, normalization: Normalization) -> Grid<f64> {
        let raw = Grid::from_fn(self.width, self.height, |x, y| self.sample(x, y));
        match normalization {
            Normalization::Clamp => raw.map(|v| (v / self.amplitude_sum).clamp(0.0, 1.0)),
            Normalization::MinMax => normalize_min_max(&raw),
        }
    }

    /// Grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    pub fn height(&self) -> usize {
        self.height
    }
}

fn amplitude_sum(persistence: f64, octaves: u32) -> f64 {
    let mut amplitude = 1.0_f64;
    let mut sum = 0.0;
    for _ in 0..octaves {
        sum += amplitude.abs();
        amplitude *= persistence;
    }
    if sum.is_finite() && sum > 0.0 { sum } else { 1.0 }
}

/// Remap every cell through `inverse_lerp(min, max, v)` using the grid's own extremes.
///
/// A flat grid (min == max) maps to all zeros.
pub fn normalize_min_max(raw: &Grid<f64>) -> Grid<f64> {
    let (min, max) = raw
        .as_slice()
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    raw.map(|&v| {
        if range > 0.0 {
            ((v - min) / range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> GenerationParameters {
        GenerationParameters {
            dimension: 4,
            seed: 0,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
            scale: 50.0,
            offset: DVec2::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_parameters_bit_identical() {
        let params = scenario();
        let a = NoiseField::new(&params, 4, 4).generate(Normalization::Clamp);
        let b = NoiseField::new(&params, 4, 4).generate(Normalization::Clamp);
        assert_eq!(a.as_slice().len(), 16);
        let bits_a: Vec<u64> = a.as_slice().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.as_slice().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b, "repeated generation must be bit-identical");
    }

    /// Clamp output of the 4x4, seed 0, single-octave field, row-major.
    const SCENARIO_BITS: [u64; 16] = [
        0x3fde_8d55_e671_823e,
        0x3fdf_ed9e_d34d_b7d2,
        0x3fe0_a945_7567_90c8,
        0x3fe1_5c37_d0c7_c9ab,
        0x3fdd_9cb8_0207_8ec5,
        0x3fde_f4a5_12a2_7876,
        0x3fe0_28fa_0b54_36b6,
        0x3fe0_d880_7eb1_fe19,
        0x3fdc_9fd1_83dd_85d2,
        0x3fdd_efc1_753a_15fd,
        0x3fdf_45c9_b072_006f,
        0x3fe0_4f26_2b08_8b4d,
        0x3fdb_9977_8ecb_63d2,
        0x3fdc_e1e4_3346_4513,
        0x3fde_3114_9b8e_8b90,
        0x3fdf_8370_bb03_8386,
    ];

    #[test]
    fn test_scenario_matches_stored_values() {
        let grid = NoiseField::new(&scenario(), 4, 4).generate(Normalization::Clamp);
        for (i, (&value, &expected)) in grid.as_slice().iter().zip(&SCENARIO_BITS).enumerate() {
            assert_eq!(
                value.to_bits(),
                expected,
                "cell {i}: got {value}, stored {}",
                f64::from_bits(expected)
            );
        }
        assert_eq!(f64::from_bits(SCENARIO_BITS[0]), 0.47737643722760825);
    }

    #[test]
    fn test_amplitude_sum_follows_persistence() {
        let field = NoiseField::new(
            &GenerationParameters {
                octaves: 4,
                persistence: 0.5,
                ..scenario()
            },
            4,
            4,
        );
        assert_eq!(field.amplitude_sum(), 1.875);
        assert_eq!(amplitude_sum(-0.5, 3), 1.75, "negative persistence counts by magnitude");
        assert_eq!(amplitude_sum(0.0, 5), 1.0);
    }

    #[test]
    fn test_clamp_mode_does_not_saturate_with_many_octaves() {
        let params = GenerationParameters {
            dimension: 64,
            octaves: 5,
            persistence: 0.5,
            scale: 20.0,
            ..scenario()
        };
        let grid = NoiseField::new(&params, 64, 64).generate(Normalization::Clamp);
        let saturated = grid.as_slice().iter().filter(|&&v| v >= 1.0).count();
        assert!(
            saturated * 100 < grid.as_slice().len(),
            "{saturated} of {} cells pinned to 1.0",
            grid.as_slice().len()
        );
    }

    #[test]
    fn test_different_seeds_produce_different_fields() {
        let a = NoiseField::new(&scenario(), 16, 16).generate(Normalization::Clamp);
        let b = NoiseField::new(
            &GenerationParameters {
                seed: 999,
                ..scenario()
            },
            16,
            16,
        )
        .generate(Normalization::Clamp);
        assert_ne!(a, b, "different seeds should produce different fields");
    }

    #[test]
    fn test_two_draws_per_octave() {
        let params = GenerationParameters {
            octaves: 5,
            ..scenario()
        };
        let field = NoiseField::new(&params, 8, 8);
        assert_eq!(field.octave_offsets().len(), 5);
    }

    #[test]
    fn test_zero_octaves_behaves_like_one() {
        let zero = GenerationParameters {
            octaves: 0,
            ..scenario()
        };
        let a = NoiseField::new(&zero, 8, 8).generate(Normalization::Clamp);
        let b = NoiseField::new(&scenario(), 8, 8).generate(Normalization::Clamp);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonpositive_scale_does_not_produce_nan() {
        let params = GenerationParameters {
            scale: -5.0,
            ..scenario()
        };
        let grid = NoiseField::new(&params, 8, 8).generate(Normalization::MinMax);
        assert!(grid.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_clamp_mode_stays_in_unit_range() {
        let params = GenerationParameters {
            octaves: 6,
            persistence: 0.9,
            lacunarity: 2.0,
            ..scenario()
        };
        let grid = NoiseField::new(&params, 32, 32).generate(Normalization::Clamp);
        for (x, y, &v) in grid.iter_cells() {
            assert!((0.0..=1.0).contains(&v), "cell ({x}, {y}) = {v} outside [0, 1]");
        }
    }

    #[test]
    fn test_min_max_spans_unit_range() {
        let params = GenerationParameters {
            octaves: 4,
            scale: 8.0,
            ..scenario()
        };
        let grid = NoiseField::new(&params, 32, 32).generate(Normalization::MinMax);
        let min = grid.as_slice().iter().cloned().fold(f64::MAX, f64::min);
        let max = grid.as_slice().iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(min, 0.0, "min/max normalization must hit 0");
        assert_eq!(max, 1.0, "min/max normalization must hit 1");
    }

    #[test]
    fn test_flat_grid_normalizes_to_zero() {
        let flat = Grid::filled(3, 3, 0.42);
        assert!(normalize_min_max(&flat).as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_offset_shifts_the_field() {
        let shifted = GenerationParameters {
            offset: DVec2::new(37.0, -11.0),
            scale: 4.0,
            ..scenario()
        };
        let base = GenerationParameters {
            scale: 4.0,
            ..scenario()
        };
        let a = NoiseField::new(&base, 16, 16).generate(Normalization::Clamp);
        let b = NoiseField::new(&shifted, 16, 16).generate(Normalization::Clamp);
        assert_ne!(a, b, "a non-zero offset should move the sampled window");
    }
}
