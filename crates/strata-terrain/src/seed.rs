//! Explicitly seeded random streams.
//!
//! Nothing in the pipeline reads ambient random state. The noise field draws
//! octave jitter from [`octave_rng`], and the column builder draws each
//! cell's jagged roll from [`cell_rng`], so results do not depend on the
//! order cells are visited in.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Domain separator so cell streams never coincide with the octave stream.
const CELL_STREAM_TAG: u64 = 0x6A61_6767_6564;

/// The stream used to draw per-octave jitter for a world seed.
pub fn octave_rng(seed: i64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}

/// Derive a u64 seed for a single cell from the world seed and its coordinates.
///
/// Uses SipHash (via std's `DefaultHasher`) to spread neighbouring cells apart.
pub fn derive_cell_seed(seed: i64, x: usize, y: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    CELL_STREAM_TAG.hash(&mut hasher);
    seed.hash(&mut hasher);
    (x as u64).hash(&mut hasher);
    (y as u64).hash(&mut hasher);
    hasher.finish()
}

/// Deterministic stream for one cell.
pub fn cell_rng(seed: i64, x: usize, y: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_cell_seed(seed, x, y))
}

/// Fold a world seed into the 32-bit Perlin lattice seed.
///
/// Seeds in `0..=u32::MAX` map to themselves. The high half is mixed in with a
/// multiplicative constant so seeds `2^32` apart get different lattices.
pub fn perlin_seed(seed: i64) -> u32 {
    let bits = seed as u64;
    let low = bits as u32;
    let high = (bits >> 32) as u32;
    low.wrapping_add(high.wrapping_mul(0x9E37_79B9))
}
