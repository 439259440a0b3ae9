//! Value noise over a wrapping integer lattice.
//!
//! Each lattice point holds a pseudo-random value in `[0, 1)` derived from a
//! hash of its (wrapped) coordinates and the lattice seed. Queries between
//! lattice points blend smoothed neighbours with cubic interpolation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, WorldgenError};
use crate::gradient_noise::{lerp, smooth_step};
use crate::noise_source::NoiseSource;

const HASH_SEED: u32 = 80_238_287;
const HASH_PRIME: i64 = 5449;
const HASH_MODULUS: i64 = 130_651;
const HASH_RANGE: u32 = 75_327_403;

#[derive(Clone, Debug)]
pub struct RandomLattice {
    width: usize,
    height: usize,
    seed: u32,
}

impl RandomLattice {
    pub fn new(width: usize, height: usize, seed: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(WorldgenError::InvalidConfig(format!(
                "lattice dimensions must be positive, got {width}x{height}"
            )));
        }

        Ok(Self { width, height, seed })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Raw value at an integer lattice point, in `[0, 1)`.
    pub fn value_at_int(&self, x: i64, y: i64) -> f64 {
        let wx = x.rem_euclid(self.width as i64);
        let wy = y.rem_euclid(self.height as i64);
        let hash = rotating_hash(&[wx, wy, self.seed as i64]);

        ChaCha8Rng::seed_from_u64(hash as u64).gen::<f64>()
    }

    /// Lattice value blurred with its eight neighbours.
    fn smooth(&self, x: i64, y: i64) -> f64 {
        let corners = (self.value_at_int(x - 1, y - 1)
            + self.value_at_int(x - 1, y + 1)
            + self.value_at_int(x + 1, y - 1)
            + self.value_at_int(x + 1, y + 1))
            / 16.0;
        let sides = (self.value_at_int(x - 1, y)
            + self.value_at_int(x + 1, y)
            + self.value_at_int(x, y - 1)
            + self.value_at_int(x, y + 1))
            / 8.0;
        let centre = self.value_at_int(x, y) / 4.0;

        corners + sides + centre
    }

    /// Sample a rectangular region on a regular step, yielding `(x, y, value)`.
    pub fn sample_region(
        &self,
        min: (f64, f64),
        max: (f64, f64),
        step: (f64, f64),
    ) -> Result<Vec<(f64, f64, f64)>> {
        if step.0 <= 0.0 || step.1 <= 0.0 {
            return Err(WorldgenError::InvalidConfig(format!(
                "sample step must be positive, got ({}, {})",
                step.0, step.1
            )));
        }

        let columns = ((max.0 - min.0) / step.0).ceil().max(0.0) as usize;
        let rows = ((max.1 - min.1) / step.1).ceil().max(0.0) as usize;

        let mut samples = Vec::with_capacity(columns * rows);
        for i in 0..columns {
            let x = min.0 + i as f64 * step.0;
            for j in 0..rows {
                let y = min.1 + j as f64 * step.1;
                samples.push((x, y, self.value_at(x, y)));
            }
        }

        Ok(samples)
    }
}

impl NoiseSource for RandomLattice {
    fn value_at(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = smooth_step(x - x0);
        let fy = smooth_step(y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let tl = self.smooth(x0, y0);
        let tr = self.smooth(x0 + 1, y0);
        let bl = self.smooth(x0, y0 + 1);
        let br = self.smooth(x0 + 1, y0 + 1);

        let left = lerp(tl, bl, fy);
        let right = lerp(tr, br, fy);
        lerp(left, right, fx)
    }
}

fn rotating_hash(values: &[i64]) -> u32 {
    values.iter().fold(HASH_SEED, |hash, &v| {
        let mixed = (v * HASH_PRIME).rem_euclid(HASH_MODULUS) as u32;
        (hash << 4) ^ (hash >> 28) ^ mixed
    }) % HASH_RANGE
}
