//! Seed management for terrain generation
//!
//! Each generator draws from its own seed, derived from a master seed, so
//! re-tuning one algorithm never changes the output of another.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for all generators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Diamond-square corner seeds and displacements
    pub diamond_square: u64,
    /// fBm noise tables
    pub fbm: u64,
    /// Plate seeding, types and growth order
    pub plates: u64,
    /// Random lattice hash seed
    pub lattice: u64,
}

impl GeneratorSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            diamond_square: derive_seed(master, "diamond_square"),
            fbm: derive_seed(master, "fbm"),
            plates: derive_seed(master, "plates"),
            lattice: derive_seed(master, "lattice"),
        }
    }

    /// Fresh RNG for one generator seed.
    pub fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }
}

impl Default for GeneratorSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Derive a sub-seed from a master seed and a generator name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for GeneratorSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "master: {}, diamond_square: {}, fbm: {}, plates: {}, lattice: {}",
            self.master, self.diamond_square, self.fbm, self.plates, self.lattice,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        assert_eq!(GeneratorSeeds::from_master(12345), GeneratorSeeds::from_master(12345));
    }

    #[test]
    fn test_different_generators_get_different_seeds() {
        let seeds = GeneratorSeeds::from_master(12345);

        assert_ne!(seeds.diamond_square, seeds.fbm);
        assert_ne!(seeds.fbm, seeds.plates);
        assert_ne!(seeds.plates, seeds.lattice);
    }
}
