//! Random number generator construction.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a reproducible generator from `seed`.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from a random seed when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}


/// Deterministic generators for strategy tests.
#[cfg(test)]
pub(crate) mod testing {
    use rand::RngCore;

    /// Yields the same word forever. `ConstRng(0)` makes every `random::<f64>()`
    /// draw `0.0`; `ConstRng(u64::MAX)` draws the largest value below `1.0`.
    pub(crate) struct ConstRng(pub u64);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 8];
            }
        }
    }
}
