//! Image output for height maps, plate maps and noise lattices.
//!
//! The image format is inferred from the file extension.

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::info;

use crate::error::Result;
use crate::grid::Grid;
use crate::noise_source::NoiseSource;
use crate::plates::PlateSimulation;
use crate::random_lattice::RandomLattice;

/// Plate colours, indexed by plate id. Ids past the end render black.
const PLATE_COLOURS: [[u8; 3]; 16] = [
    [0xFF, 0x00, 0x00],
    [0x00, 0x00, 0xFF],
    [0xFF, 0xFF, 0x00],
    [0x00, 0xFF, 0x00],
    [0xFF, 0x66, 0x00],
    [0xFF, 0x00, 0xFF],
    [0x00, 0xFF, 0xFF],
    [0xCC, 0xCC, 0xCC],
    [0x00, 0x66, 0x00],
    [0x00, 0x00, 0x66],
    [0x66, 0x00, 0x66],
    [0x66, 0x66, 0x00],
    [0xCC, 0xCC, 0xCC],
    [0xFF, 0xFF, 0xFF],
    [0x00, 0x00, 0x00],
    [0xCC, 0xCC, 0xFF],
];

/// Grey level for a height in `[0, 1]`; values outside are clamped.
pub fn grey_level(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colour of a plate id in the plate map palette.
pub fn plate_colour(index: usize) -> [u8; 3] {
    PLATE_COLOURS.get(index).copied().unwrap_or([0, 0, 0])
}

/// Render a height map to a greyscale image.
pub fn heightmap_image(map: &Grid<f64>) -> GrayImage {
    let size = map.size() as u32;
    GrayImage::from_fn(size, size, |x, y| Luma([grey_level(*map.get(x as usize, y as usize))]))
}

/// Render a plate map with one colour per plate.
pub fn platemap_image(sim: &PlateSimulation) -> RgbImage {
    let size = sim.size() as u32;
    RgbImage::from_fn(size, size, |x, y| {
        let id = sim.label(x as usize, y as usize);
        if id.is_none() {
            Rgb([0, 0, 0])
        } else {
            Rgb(plate_colour(id.index()))
        }
    })
}

/// Sample a noise source over `extent` (noise units) into a greyscale image.
pub fn noise_image<N: NoiseSource + ?Sized>(noise: &N, width: u32, height: u32, extent: (f64, f64)) -> GrayImage {
    let step_x = extent.0 / width.max(1) as f64;
    let step_y = extent.1 / height.max(1) as f64;
    GrayImage::from_fn(width, height, |x, y| {
        Luma([grey_level(noise.value_at(x as f64 * step_x, y as f64 * step_y))])
    })
}

pub fn heightmap(map: &Grid<f64>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    heightmap_image(map).save(path)?;
    info!("Wrote height map to {}", path.display());
    Ok(())
}

pub fn platemap(sim: &PlateSimulation, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    platemap_image(sim).save(path)?;
    info!("Wrote plate map to {}", path.display());
    Ok(())
}

/// Render one full period of a lattice at `width x height` pixels.
pub fn lattice(lattice: &RandomLattice, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
    let path = path.as_ref();
    let extent = (lattice.width() as f64, lattice.height() as f64);
    noise_image(lattice, width, height, extent).save(path)?;
    info!("Wrote lattice to {}", path.display());
    Ok(())
}
