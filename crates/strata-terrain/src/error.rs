//! Error types for the terrain generation core.

/// Caller contract violations detected by the generation pipeline.
///
/// Malformed numeric parameters are never reported here; those are clamped by
/// [`GenerationParameters::sanitized`](crate::GenerationParameters::sanitized).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A level table was built with no entries.
    #[error("terrain level table must contain at least one level")]
    EmptyLevelTable,

    /// A threshold is lower than the one before it.
    #[error("threshold {threshold} at index {index} is below the previous threshold {previous}")]
    UnorderedThresholds {
        /// Index of the offending level.
        index: usize,
        /// Threshold of the preceding level.
        previous: f64,
        /// Threshold of the offending level.
        threshold: f64,
    },

    /// A threshold lies outside `[0, 100]`.
    #[error("threshold {threshold} at index {index} is outside [0, 100]")]
    ThresholdOutOfRange {
        /// Index of the offending level.
        index: usize,
        /// The rejected threshold.
        threshold: f64,
    },

    /// Noise and falloff grids disagree in shape.
    #[error("noise grid is {}x{} but falloff grid is {}x{}", noise.0, noise.1, falloff.0, falloff.1)]
    DimensionMismatch {
        /// `(width, height)` of the noise grid.
        noise: (usize, usize),
        /// `(width, height)` of the falloff grid.
        falloff: (usize, usize),
    },

    /// A level index does not exist in the table it was used with.
    #[error("level index {index} out of range for table of {len} levels")]
    LevelOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of levels in the table.
        len: usize,
    },
}
