use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WorldgenError};
use crate::grid::Grid;

/// Parameters for diamond-square terrain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiamondSquareParams {
    /// Amplitude of the corner seeds and of the first displacement pass.
    pub roughness: f64,
    /// Multiplier applied to the displacement amplitude after each pass.
    /// 0.5 halves it every pass, giving classic fractal self-similarity.
    pub decay: f64,
}

impl Default for DiamondSquareParams {
    fn default() -> Self {
        Self {
            roughness: 1.0,
            decay: 0.5,
        }
    }
}

impl DiamondSquareParams {
    pub fn validate(&self) -> Result<()> {
        if !self.roughness.is_finite() || self.roughness < 0.0 {
            return Err(WorldgenError::InvalidConfig(format!(
                "roughness must be a non-negative number, got {}",
                self.roughness
            )));
        }
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(WorldgenError::InvalidConfig(format!(
                "decay must be between 0 and 1, got {}",
                self.decay
            )));
        }
        Ok(())
    }
}

/// Check that `size` is `2^n + 1` for some `n >= 1`.
pub fn validate_size(size: usize) -> Result<()> {
    if size >= 3 && (size - 1).is_power_of_two() {
        Ok(())
    } else {
        Err(WorldgenError::InvalidSize { size })
    }
}

/// Seed the four corners with random values, then fill the rest of the grid
/// by midpoint displacement. The output range is not normalized.
pub fn diamond_square<R: Rng + ?Sized>(
    grid: &mut Grid<f64>,
    params: &DiamondSquareParams,
    rng: &mut R,
) -> Result<()> {
    validate_size(grid.size())?;
    params.validate()?;

    let edge = grid.size() - 1;
    for (x, y) in [(0, 0), (edge, 0), (0, edge), (edge, edge)] {
        grid.set(x, y, displacement(rng, params.roughness));
    }

    subdivide(grid, params, rng)
}

/// Fill every non-corner cell from the four corner values already present
/// in `grid`. Corners are read but never written.
pub fn subdivide<R: Rng + ?Sized>(
    grid: &mut Grid<f64>,
    params: &DiamondSquareParams,
    rng: &mut R,
) -> Result<()> {
    let size = grid.size();
    validate_size(size)?;
    params.validate()?;

    let edge = size - 1;
    let mut side = edge;
    let mut amplitude = params.roughness;
    let mut passes = 0;

    while side >= 2 {
        let half = side / 2;

        // Square step: centre of each side x side square
        for y in (0..edge).step_by(side) {
            for x in (0..edge).step_by(side) {
                let avg = (*grid.get(x, y)
                    + *grid.get(x + side, y)
                    + *grid.get(x, y + side)
                    + *grid.get(x + side, y + side))
                    / 4.0;
                grid.set(x + half, y + half, avg + displacement(rng, amplitude));
            }
        }

        // Diamond step: midpoints of the square edges. Lookups that fall
        // off the low side wrap to the far side of the map; the first
        // row/column is mirrored onto the last so the seam stays consistent.
        for x in (0..edge).step_by(half) {
            for y in ((x + half) % side..edge).step_by(side) {
                let avg = (*grid.get((x + edge - half) % edge, y)
                    + *grid.get(x + half, y)
                    + *grid.get(x, (y + edge - half) % edge)
                    + *grid.get(x, y + half))
                    / 4.0;
                let value = avg + displacement(rng, amplitude);

                grid.set(x, y, value);
                if x == 0 {
                    grid.set(edge, y, value);
                }
                if y == 0 {
                    grid.set(x, edge, value);
                }
            }
        }

        side /= 2;
        amplitude *= params.decay;
        passes += 1;
    }

    debug!("Diamond-square filled {size}x{size} grid in {passes} passes");
    Ok(())
}

/// Uniform offset in `[-amplitude, amplitude]`.
fn displacement<R: Rng + ?Sized>(rng: &mut R, amplitude: f64) -> f64 {
    rng.gen_range(-1.0..=1.0) * amplitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    #[case(3)]
    #[case(5)]
    #[case(9)]
    #[case(17)]
    #[case(257)]
    fn test_valid_sizes(#[case] size: usize) {
        assert!(validate_size(size).is_ok());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    #[case(6)]
    #[case(10)]
    #[case(256)]
    fn test_invalid_sizes_fail_before_mutation(#[case] size: usize) {
        let mut grid = Grid::new_with(size, 7.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = diamond_square(&mut grid, &DiamondSquareParams::default(), &mut rng);
        assert!(matches!(result, Err(WorldgenError::InvalidSize { size: s }) if s == size));
        assert!(grid.iter().all(|(_, _, &v)| v == 7.0));
    }

    #[test]
    fn test_corners_keep_seeded_values() {
        let params = DiamondSquareParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut probe = rng.clone();
        let expected: Vec<f64> = (0..4).map(|_| displacement(&mut probe, params.roughness)).collect();

        let mut grid = Grid::new(5);
        diamond_square(&mut grid, &params, &mut rng).unwrap();

        assert_eq!(*grid.get(0, 0), expected[0]);
        assert_eq!(*grid.get(4, 0), expected[1]);
        assert_eq!(*grid.get(0, 4), expected[2]);
        assert_eq!(*grid.get(4, 4), expected[3]);
    }

    #[test]
    fn test_subdivide_never_touches_corners() {
        let mut grid = Grid::new_with(9, f64::NAN);
        grid.set(0, 0, 1.0);
        grid.set(8, 0, 2.0);
        grid.set(0, 8, 3.0);
        grid.set(8, 8, 4.0);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        subdivide(&mut grid, &DiamondSquareParams::default(), &mut rng).unwrap();

        assert_eq!(*grid.get(0, 0), 1.0);
        assert_eq!(*grid.get(8, 0), 2.0);
        assert_eq!(*grid.get(0, 8), 3.0);
        assert_eq!(*grid.get(8, 8), 4.0);
        assert!(grid.iter().all(|(_, _, v)| v.is_finite()));
    }

    #[test]
    fn test_zero_roughness_averages_corners() {
        let params = DiamondSquareParams { roughness: 0.0, decay: 0.5 };
        let mut grid = Grid::new_with(5, 0.0);
        for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
            grid.set(x, y, 2.0);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        subdivide(&mut grid, &params, &mut rng).unwrap();
        assert!(grid.iter().all(|(_, _, &v)| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_edges_are_mirrored() {
        let mut grid = Grid::new(17);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        diamond_square(&mut grid, &DiamondSquareParams::default(), &mut rng).unwrap();

        for i in 1..16 {
            assert_eq!(grid.get(0, i), grid.get(16, i));
            assert_eq!(grid.get(i, 0), grid.get(i, 16));
        }
    }

    #[test]
    fn test_rejects_bad_params() {
        let mut grid = Grid::new(5);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let negative = DiamondSquareParams { roughness: -1.0, decay: 0.5 };
        assert!(diamond_square(&mut grid, &negative, &mut rng).is_err());

        let growing = DiamondSquareParams { roughness: 1.0, decay: 1.5 };
        assert!(diamond_square(&mut grid, &growing, &mut rng).is_err());
    }
}
