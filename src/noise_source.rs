//! Point-query contract shared by every noise generator.

use noise::{NoiseFn, Perlin};

/// A continuous 2D noise field that can be sampled at any point.
pub trait NoiseSource {
    /// Noise value at `(x, y)`. Repeated queries at the same point return
    /// the same value.
    fn value_at(&self, x: f64, y: f64) -> f64;
}

impl NoiseSource for Perlin {
    fn value_at(&self, x: f64, y: f64) -> f64 {
        self.get([x, y])
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    fn value_at(&self, x: f64, y: f64) -> f64 {
        (**self).value_at(x, y)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn value_at(&self, x: f64, y: f64) -> f64 {
        (**self).value_at(x, y)
    }
}
