//! Core domain: shared resources.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random source for spark sampling and other cosmetic randomness.
#[derive(Resource, Debug)]
pub struct SimRng {
    pub seed: u64,
    pub rng: ChaCha8Rng,
}

impl SimRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for SimRng {
    fn default() -> Self {
        let seed = rand::rng().random();
        info!("Simulation rng seed: {}", seed);
        Self::from_seed(seed)
    }
}
