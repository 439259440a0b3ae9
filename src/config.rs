//! Generator configuration, loadable from JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use noise::Perlin;
use serde::{Deserialize, Serialize};

use crate::algorithms::{DiamondSquareParams, FbmParams};
use crate::error::{Result, WorldgenError};
use crate::gradient_noise::GradientNoise;
use crate::noise_source::NoiseSource;
use crate::random_lattice::RandomLattice;
use crate::seeds::GeneratorSeeds;

/// Largest supported size exponent (side 16385).
pub const MAX_SIZE_EXPONENT: u32 = 14;

/// Which noise generator feeds fBm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    /// Permutation-table gradient noise
    #[default]
    Gradient,
    /// Hashed value noise on a wrapping lattice
    Lattice,
    /// The `noise` crate's Perlin implementation
    Perlin,
}

impl NoiseKind {
    /// Build the noise source for a map of side `size`.
    pub fn build(&self, size: usize, seed: u64) -> Result<Box<dyn NoiseSource>> {
        let source: Box<dyn NoiseSource> = match self {
            Self::Gradient => Box::new(GradientNoise::new(&mut GeneratorSeeds::rng(seed))),
            Self::Lattice => {
                let extent = (size / 2).max(1);
                Box::new(RandomLattice::new(extent, extent, seed as u32)?)
            }
            Self::Perlin => Box::new(Perlin::new(seed as u32)),
        };
        Ok(source)
    }
}

impl std::fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gradient => write!(f, "gradient"),
            Self::Lattice => write!(f, "lattice"),
            Self::Perlin => write!(f, "perlin"),
        }
    }
}

/// Every tunable of a generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Map side is `2^size_exponent + 1`.
    pub size_exponent: Option<u32>,
    /// Master seed (random if not set).
    pub seed: Option<u64>,
    /// Number of plates for plate outputs.
    pub num_plates: Option<usize>,
    /// Height difference between continental and oceanic plates.
    pub sea_gap: f64,
    pub noise: NoiseKind,
    pub diamond_square: DiamondSquareParams,
    pub fbm: FbmParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size_exponent: None,
            seed: None,
            num_plates: None,
            sea_gap: 0.5,
            noise: NoiseKind::default(),
            diamond_square: DiamondSquareParams::default(),
            fbm: FbmParams::default(),
        }
    }
}

impl GeneratorConfig {
    /// Read a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Map side, `2^n + 1`.
    pub fn size(&self) -> Result<usize> {
        let n = self
            .size_exponent
            .ok_or_else(|| WorldgenError::InvalidConfig("no size specified".into()))?;
        if !(1..=MAX_SIZE_EXPONENT).contains(&n) {
            return Err(WorldgenError::InvalidConfig(format!(
                "size exponent must be between 1 and {MAX_SIZE_EXPONENT}, got {n}"
            )));
        }
        Ok((1usize << n) + 1)
    }

    pub fn validate(&self) -> Result<()> {
        self.size()?;
        if self.num_plates == Some(0) {
            return Err(WorldgenError::NoPlates);
        }
        if !(0.0..=1.0).contains(&self.sea_gap) {
            return Err(WorldgenError::SeaGapOutOfRange(self.sea_gap));
        }
        self.diamond_square.validate()?;
        self.fbm.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "size_exponent": 3, "noise": "lattice", "fbm": { "octaves": 6 } }"#)
                .unwrap();

        assert_eq!(config.size().unwrap(), 9);
        assert_eq!(config.noise, NoiseKind::Lattice);
        assert_eq!(config.fbm.octaves, 6);
        assert_eq!(config.fbm.persistence, 0.5);
        assert_eq!(config.sea_gap, 0.5);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(0))]
    #[case(Some(MAX_SIZE_EXPONENT + 1))]
    fn test_rejects_bad_size(#[case] exponent: Option<u32>) {
        let config = GeneratorConfig {
            size_exponent: exponent,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_sea_gap_and_plates() {
        let base = GeneratorConfig {
            size_exponent: Some(4),
            ..Default::default()
        };

        let gap = GeneratorConfig { sea_gap: 1.5, ..base.clone() };
        assert!(matches!(gap.validate(), Err(WorldgenError::SeaGapOutOfRange(_))));

        let plates = GeneratorConfig { num_plates: Some(0), ..base };
        assert!(matches!(plates.validate(), Err(WorldgenError::NoPlates)));
    }

    #[test]
    fn test_every_noise_kind_builds() {
        for kind in [NoiseKind::Gradient, NoiseKind::Lattice, NoiseKind::Perlin] {
            let source = kind.build(17, 3).unwrap();
            assert!(source.value_at(1.5, 2.5).is_finite());
        }
    }
}
