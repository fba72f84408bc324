//! Combines noise, the optional falloff mask, a remap curve and the invert
//! flag into the final height field.

use crate::curve::RemapCurve;
use crate::error::TerrainError;
use crate::grid::Grid;

/// Flags that select the compositing rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeFlags {
    /// Output only the falloff mask (requires a mask).
    pub falloff_only: bool,
    /// Replace each result with `1 - result`.
    pub invert: bool,
}

/// Composite a single cell.
///
/// With no falloff: `noise * curve(noise)`. With falloff and `falloff_only`:
/// the mask value. Otherwise `clamp01((noise - falloff) * curve(noise))`.
/// Invert is applied last and the result is always clamped to `[0, 1]`.
///
/// The curve multiplies the noise rather than replacing it, so a literal
/// identity closure `|t| t` yields `noise²`. Use [`HeightCurve::Passthrough`],
/// which evaluates to `1.0` everywhere, to keep the noise unchanged.
///
/// [`HeightCurve::Passthrough`]: crate::curve::HeightCurve::Passthrough
pub fn composite_cell(
    noise: f64,
    falloff: Option<f64>,
    curve: &impl RemapCurve,
    flags: CompositeFlags,
) -> f64 {
    let value = match falloff {
        None => noise * curve.evaluate(noise),
        Some(mask) if flags.falloff_only => mask,
        Some(mask) => ((noise - mask) * curve.evaluate(noise)).clamp(0.0, 1.0),
    };
    let value = if flags.invert { 1.0 - value } else { value };
    clamp01(value)
}

/// Composite whole grids into a new height field.
///
/// # Errors
///
/// Returns [`TerrainError::DimensionMismatch`] when a falloff mask is supplied
/// whose shape differs from the noise grid.
pub fn composite(
    noise: &Grid<f64>,
    falloff: Option<&Grid<f64>>,
    curve: &impl RemapCurve,
    flags: CompositeFlags,
) -> Result<Grid<f64>, TerrainError> {
    if let Some(mask) = falloff
        && mask.dimensions() != noise.dimensions()
    {
        return Err(TerrainError::DimensionMismatch {
            noise: noise.dimensions(),
            falloff: mask.dimensions(),
        });
    }

    Ok(Grid::from_fn(noise.width(), noise.height(), |x, y| {
        let mask = falloff.map(|m| m[(x, y)]);
        composite_cell(noise[(x, y)], mask, curve, flags)
    }))
}

fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::HeightCurve;

    fn noise_grid() -> Grid<f64> {
        Grid::from_fn(4, 4, |x, y| (x + y * 4) as f64 / 15.0)
    }

    #[test]
    fn test_passthrough_composition_equals_noise() {
        let noise = noise_grid();
        let out = composite(&noise, None, &HeightCurve::Passthrough, CompositeFlags::default())
            .unwrap();
        assert_eq!(out, noise);
    }

    #[test]
    fn test_identity_closure_squares_noise() {
        for noise in [0.0, 0.3, 0.5, 0.8, 1.0] {
            let out = composite_cell(noise, None, &|t: f64| t, CompositeFlags::default());
            assert!((out - noise * noise).abs() < 1e-12, "{noise} -> {out}");
        }
        let kept = composite_cell(0.5, None, &HeightCurve::Passthrough, CompositeFlags::default());
        assert_eq!(kept, 0.5);
    }

    #[test]
    fn test_falloff_only_ignores_noise() {
        let flags = CompositeFlags {
            falloff_only: true,
            ..Default::default()
        };
        assert_eq!(composite_cell(0.9, Some(0.3), &HeightCurve::Passthrough, flags), 0.3);
    }

    #[test]
    fn test_falloff_subtracts_and_clamps() {
        let flags = CompositeFlags::default();
        let v = composite_cell(0.7, Some(0.2), &HeightCurve::Passthrough, flags);
        assert!((v - 0.5).abs() < 1e-12);
        assert_eq!(composite_cell(0.1, Some(0.6), &HeightCurve::Passthrough, flags), 0.0);
    }

    #[test]
    fn test_invert_flips_result() {
        let flags = CompositeFlags {
            invert: true,
            ..Default::default()
        };
        let v = composite_cell(0.25, None, &HeightCurve::Passthrough, flags);
        assert!((v - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_curve_is_clamped() {
        let v = composite_cell(0.9, None, &|_t: f64| 4.0, CompositeFlags::default());
        assert_eq!(v, 1.0);
        let v = composite_cell(0.9, None, &|_t: f64| -4.0, CompositeFlags::default());
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_mismatched_falloff_is_rejected() {
        let noise = noise_grid();
        let mask = Grid::filled(8, 8, 0.0);
        let err = composite(&noise, Some(&mask), &HeightCurve::Passthrough, CompositeFlags::default())
            .unwrap_err();
        assert_eq!(
            err,
            TerrainError::DimensionMismatch {
                noise: (4, 4),
                falloff: (8, 8)
            }
        );
    }

    #[test]
    fn test_output_is_a_new_grid() {
        let noise = noise_grid();
        let mask = Grid::filled(4, 4, 0.1);
        let before = noise.clone();
        let _ = composite(&noise, Some(&mask), &HeightCurve::Passthrough, CompositeFlags::default())
            .unwrap();
        assert_eq!(noise, before, "input grid must not be mutated");
    }
}
