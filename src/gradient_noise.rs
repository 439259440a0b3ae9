//! Classic 2D gradient (Perlin) noise built from a shuffled permutation table.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, WorldgenError};
use crate::grid::Grid;
use crate::noise_source::NoiseSource;

const NUM_PERMUTATIONS: usize = 0x100;
const PERMUTE_MASK: i64 = 0xFF;
/// Shift applied to query coordinates so that moderately negative inputs
/// still land on positive lattice cells.
const OFFSET: f64 = 4096.0;
/// Spatial frequency used by [`GradientNoise::to_height_field`].
pub const HEIGHT_FIELD_SCALE: f64 = 0.33;
/// Range a height field produced by [`GradientNoise::to_height_field`] spans.
pub const HEIGHT_FIELD_RANGE: (f64, f64) = (0.3, 1.0);

/// A 2D vector used for lattice gradients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        Self {
            x: self.x / len,
            y: self.y / len,
        }
    }
}

/// Gradient noise with a frozen permutation and gradient table.
///
/// Both tables are drawn once from the supplied RNG and never change, so a
/// single instance can be sampled from anywhere without coordination.
#[derive(Clone, Debug)]
pub struct GradientNoise {
    permutations: Vec<usize>,
    gradients: Vec<Vec2>,
}

impl GradientNoise {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut base: Vec<usize> = (0..NUM_PERMUTATIONS).collect();
        base.shuffle(rng);

        let base_gradients: Vec<Vec2> = (0..NUM_PERMUTATIONS).map(|_| random_unit(rng)).collect();

        // Doubled plus a short prefix so `perm[i + j]` never needs wrapping.
        Self {
            permutations: extend_table(&base),
            gradients: extend_table(&base_gradients),
        }
    }

    /// Fill a square grid with noise sampled at [`HEIGHT_FIELD_SCALE`] and
    /// rescaled into [`HEIGHT_FIELD_RANGE`].
    pub fn to_height_field(&self, width: usize, height: usize) -> Result<Grid<f64>> {
        if width != height {
            return Err(WorldgenError::NonSquare { width, height });
        }

        let mut grid = Grid::new_with(width, 0.0);
        for (x, y, value) in grid.iter_mut() {
            *value = self.value_at(x as f64 * HEIGHT_FIELD_SCALE, y as f64 * HEIGHT_FIELD_SCALE);
        }

        let (min, max) = HEIGHT_FIELD_RANGE;
        grid.normalize(min, max);
        Ok(grid)
    }
}

impl NoiseSource for GradientNoise {
    fn value_at(&self, x: f64, y: f64) -> f64 {
        let x = x + OFFSET;
        let y = y + OFFSET;

        let (fx, fy) = (x.floor(), y.floor());
        let bx0 = (fx as i64 & PERMUTE_MASK) as usize;
        let by0 = (fy as i64 & PERMUTE_MASK) as usize;
        let bx1 = (bx0 + 1) & PERMUTE_MASK as usize;
        let by1 = (by0 + 1) & PERMUTE_MASK as usize;

        let rx0 = x - fx;
        let ry0 = y - fy;
        let rx1 = rx0 - 1.0;
        let ry1 = ry0 - 1.0;

        let sx = smooth_step(rx0);
        let sy = smooth_step(ry0);

        let i = self.permutations[bx0];
        let j = self.permutations[bx1];

        let g00 = &self.gradients[self.permutations[i + by0]];
        let g01 = &self.gradients[self.permutations[i + by1]];
        let g10 = &self.gradients[self.permutations[j + by0]];
        let g11 = &self.gradients[self.permutations[j + by1]];

        let a = lerp(
            Vec2::new(rx0, ry0).dot(g00),
            Vec2::new(rx1, ry0).dot(g10),
            sx,
        );
        let b = lerp(
            Vec2::new(rx0, ry1).dot(g01),
            Vec2::new(rx1, ry1).dot(g11),
            sx,
        );

        lerp(a, b, sy)
    }
}

fn extend_table<T: Clone>(base: &[T]) -> Vec<T> {
    let mut table = Vec::with_capacity(base.len() * 2 + 2);
    table.extend_from_slice(base);
    table.extend_from_slice(base);
    table.extend_from_slice(&base[..2]);
    table
}

/// Uniformly oriented unit vector. Rejects the (vanishingly rare) draws too
/// close to the origin to normalize.
fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    loop {
        let v = Vec2::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5);
        if v.length() > 1e-9 {
            return v.normalize();
        }
    }
}

/// Cubic smoothstep `3t^2 - 2t^3`.
pub(crate) fn smooth_step(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn noise(seed: u64) -> GradientNoise {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        GradientNoise::new(&mut rng)
    }

    #[test]
    fn test_tables_are_extended() {
        let n = noise(1);
        assert_eq!(n.permutations.len(), NUM_PERMUTATIONS * 2 + 2);
        assert_eq!(n.gradients.len(), NUM_PERMUTATIONS * 2 + 2);
        assert_eq!(n.permutations[NUM_PERMUTATIONS], n.permutations[0]);
        assert_eq!(n.permutations[NUM_PERMUTATIONS * 2 + 1], n.permutations[1]);

        let mut sorted = n.permutations[..NUM_PERMUTATIONS].to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..NUM_PERMUTATIONS).collect::<Vec<_>>());
    }

    #[test]
    fn test_gradients_are_unit_length() {
        let n = noise(2);
        for g in &n.gradients {
            assert!((g.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_on_lattice_points() {
        let n = noise(3);
        for &(x, y) in &[(0.0, 0.0), (3.0, 7.0), (-2.0, 5.0), (300.0, 12.0)] {
            assert!(n.value_at(x, y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_continuous_across_lattice_boundaries() {
        let n = noise(4);
        let eps = 1e-7;

        for i in 0..50 {
            let y = i as f64 * 0.173 + 0.05;
            let x = (i % 9) as f64;
            let left = n.value_at(x - eps, y);
            let right = n.value_at(x + eps, y);
            assert!((left - right).abs() < 1e-5, "jump at x={x}, y={y}");

            let below = n.value_at(y, x - eps);
            let above = n.value_at(y, x + eps);
            assert!((below - above).abs() < 1e-5, "jump at y={x}, x={y}");
        }
    }

    #[test]
    fn test_output_is_bounded() {
        let n = noise(5);
        for i in 0..2000 {
            let x = i as f64 * 0.0713 - 40.0;
            let y = i as f64 * 0.0391 - 20.0;
            assert!(n.value_at(x, y).abs() <= 1.0);
        }
    }

    #[test]
    fn test_same_tables_same_values() {
        let a = noise(6);
        let b = a.clone();
        assert_eq!(a.value_at(12.34, 56.78), b.value_at(12.34, 56.78));
    }

    #[test]
    fn test_height_field_range() {
        let n = noise(7);
        let grid = n.to_height_field(33, 33).unwrap();
        let (lo, hi) = grid.min_max().unwrap();

        assert_eq!(grid.size(), 33);
        assert_eq!(lo, HEIGHT_FIELD_RANGE.0);
        assert_eq!(hi, HEIGHT_FIELD_RANGE.1);
    }

    #[test]
    fn test_height_field_rejects_non_square() {
        let n = noise(8);
        assert!(matches!(
            n.to_height_field(10, 12),
            Err(WorldgenError::NonSquare { width: 10, height: 12 })
        ));
    }
}
