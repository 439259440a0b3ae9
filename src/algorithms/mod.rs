//! Height field synthesis algorithms
//!
//! - **Diamond-square**: recursive midpoint displacement on a `2^n + 1` grid
//! - **fBm**: octave-summed noise from any [`NoiseSource`](crate::noise_source::NoiseSource)

pub mod diamond_square;
pub mod fbm;

pub use diamond_square::{diamond_square, subdivide, validate_size, DiamondSquareParams};
pub use fbm::{fbm, fbm_sample, FbmParams};
