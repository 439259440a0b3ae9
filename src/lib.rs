//! Procedural terrain generation library
//!
//! Square height fields from diamond-square or fBm, and plate maps grown
//! from random seeds on a wrapping grid. Re-exports modules for use by the
//! `worldgen` binary and other tools.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod gradient_noise;
pub mod grid;
pub mod noise_source;
pub mod plates;
pub mod random_lattice;
pub mod render;
pub mod seeds;

pub use error::{Result, WorldgenError};
pub use gradient_noise::GradientNoise;
pub use grid::Grid;
pub use noise_source::NoiseSource;
pub use plates::{PlateSimulation, PlateType};
pub use random_lattice::RandomLattice;
