// Seed derivation. Every consumer of randomness gets its own generator whose
// seed is a pure function of the global seed and a stream index, so the order
// in which recipes are expanded never perturbs unrelated recipes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Bump when `mix_seed` changes; outputs are only comparable within a version.
pub const SEED_MIX_VERSION: u32 = 1;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

// splitmix64 finalizer
#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// Combine two 64-bit values into a well-distributed seed.
// Not commutative: `mix_seed(a, b) != mix_seed(b, a)` in general.
#[inline]
pub fn mix_seed(a: u64, b: u64) -> u64 {
    let h = splitmix64(a.wrapping_add(GOLDEN_GAMMA));
    splitmix64(h ^ b.wrapping_mul(GOLDEN_GAMMA).rotate_left(17))
}

// Generator for recipe `index` of a pool seeded with `seed`.
pub fn recipe_rng(seed: u64, index: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix_seed(seed, index as u64))
}

// Deterministic signed value in [-1, 1] for an integer lattice point.
#[inline]
pub fn hash_signed(seed: u64, x: u32, y: u32) -> f64 {
    let h = mix_seed(seed, ((x as u64) << 32) | y as u64);
    // Top 53 bits → [0, 1)
    let unit = (h >> 11) as f64 / (1u64 << 53) as f64;
    unit * 2.0 - 1.0
}
