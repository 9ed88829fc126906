//! Per-call random generators.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Build a generator from an explicit seed, or draw and log a fresh one.
pub(crate) fn get_rng(seed: Option<u64>, operation: &'static str) -> ChaCha8Rng {
    let seed = match seed {
        Some(s) => s,
        None => {
            let drawn: u64 = rand::random();
            tracing::debug!(seed = drawn, operation, "drew fresh seed");
            drawn
        }
    };
    ChaCha8Rng::seed_from_u64(seed)
}
