use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WorldgenError};
use crate::grid::Grid;
use crate::noise_source::NoiseSource;

/// Parameters for fractal Brownian motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbmParams {
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Frequency of the first octave, in noise units per cell
    pub frequency: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            frequency: 0.05,
        }
    }
}

impl FbmParams {
    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 {
            return Err(WorldgenError::InvalidConfig("fbm needs at least one octave".into()));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(WorldgenError::InvalidConfig(format!(
                "lacunarity must be positive, got {}",
                self.lacunarity
            )));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(WorldgenError::InvalidConfig(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !self.persistence.is_finite() {
            return Err(WorldgenError::InvalidConfig(format!(
                "persistence must be finite, got {}",
                self.persistence
            )));
        }
        Ok(())
    }
}

/// Sum of `octaves` noise samples at `(x, y)`, each octave at `lacunarity`
/// times the previous frequency and `persistence` times the previous amplitude.
pub fn fbm_sample<N: NoiseSource + ?Sized>(noise: &N, x: f64, y: f64, params: &FbmParams) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = params.frequency;

    for _ in 0..params.octaves {
        total += amplitude * noise.value_at(x * frequency, y * frequency);
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    total
}

/// Fill `grid` with fBm over `noise`, then normalize it into `[0, 1]`.
pub fn fbm<N: NoiseSource + ?Sized>(grid: &mut Grid<f64>, noise: &N, params: &FbmParams) -> Result<()> {
    params.validate()?;

    for (x, y, value) in grid.iter_mut() {
        *value = fbm_sample(noise, x as f64, y as f64, params);
    }

    grid.normalize(0.0, 1.0);
    debug!(
        "fBm filled {0}x{0} grid with {1} octaves",
        grid.size(),
        params.octaves
    );
    Ok(())
}
