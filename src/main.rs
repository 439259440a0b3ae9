use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use worldgen::algorithms::{diamond_square, fbm};
use worldgen::config::{GeneratorConfig, NoiseKind};
use worldgen::plates::PlateSimulation;
use worldgen::random_lattice::RandomLattice;
use worldgen::render;
use worldgen::seeds::GeneratorSeeds;
use worldgen::Grid;

#[derive(Parser, Debug)]
#[command(name = "worldgen")]
#[command(about = "Generate square terrain maps with diamond-square, fBm or growing plates")]
struct Args {
    /// Generate a map of size 2^N + 1
    #[arg(long, value_name = "N")]
    size: Option<u32>,

    /// Output a diamond-square height map to FILE
    #[arg(long, value_name = "FILE")]
    diamondsquare: Option<PathBuf>,

    /// Output an fBm height map to FILE
    #[arg(long, value_name = "FILE")]
    fbm: Option<PathBuf>,

    /// Output a plate map to FILE
    #[arg(long, value_name = "FILE")]
    platemap: Option<PathBuf>,

    /// Output the plate map converted to heights to FILE
    #[arg(long, value_name = "FILE")]
    plate_heights: Option<PathBuf>,

    /// Output a random lattice to FILE
    #[arg(long, value_name = "FILE")]
    lattice: Option<PathBuf>,

    /// Pixel width and height of the lattice image
    #[arg(long, default_value = "256")]
    lattice_resolution: u32,

    /// Generate N plates
    #[arg(long, value_name = "N")]
    num_plates: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of fBm octaves
    #[arg(long)]
    octaves: Option<u32>,

    /// Diamond-square displacement amplitude
    #[arg(long)]
    roughness: Option<f64>,

    /// Height gap between continental and oceanic plates (0-1)
    #[arg(long)]
    sea_gap: Option<f64>,

    /// Noise source used by fBm
    #[arg(long, value_enum)]
    noise: Option<NoiseKind>,

    /// Load settings from a JSON file; other flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable verbose logging
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(n) = self.size {
            config.size_exponent = Some(n);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(num_plates) = self.num_plates {
            config.num_plates = Some(num_plates);
        }
        if let Some(octaves) = self.octaves {
            config.fbm.octaves = octaves;
        }
        if let Some(roughness) = self.roughness {
            config.diamond_square.roughness = roughness;
        }
        if let Some(sea_gap) = self.sea_gap {
            config.sea_gap = sea_gap;
        }
        if let Some(noise) = self.noise {
            config.noise = noise;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = args.resolve_config()?;
    let size = config.size()?;
    let seeds = GeneratorSeeds::from_master(config.seed.unwrap_or_else(rand::random));

    info!("Generating with seed: {}", seeds.master);
    info!("Map size: {}x{}", size, size);

    if let Some(ref path) = args.diamondsquare {
        info!("Generating heightmap with diamond square...");
        let mut heightmap = Grid::new(size);
        let mut rng = GeneratorSeeds::rng(seeds.diamond_square);
        diamond_square(&mut heightmap, &config.diamond_square, &mut rng)?;
        heightmap.normalize(0.0, 1.0);
        render::heightmap(&heightmap, path)?;
    }

    if args.platemap.is_some() || args.plate_heights.is_some() {
        info!("Generating plate map...");
        let Some(num_plates) = config.num_plates else {
            bail!("num_plates not specified");
        };

        let mut platemap = PlateSimulation::new(size);
        let mut rng = GeneratorSeeds::rng(seeds.plates);
        platemap.generate_plates(num_plates, &mut rng)?;
        info!(
            "Continental coverage: {:.1}%",
            platemap.continental_fraction() * 100.0
        );

        if let Some(ref path) = args.platemap {
            render::platemap(&platemap, path)?;
        }
        if let Some(ref path) = args.plate_heights {
            info!("Converting to height map...");
            let heightmap = platemap.to_height_map(config.sea_gap)?;
            render::heightmap(&heightmap, path)?;
        }
    }

    if let Some(ref path) = args.lattice {
        let lattice = RandomLattice::new(size, size, seeds.lattice as u32)?;
        render::lattice(&lattice, path, args.lattice_resolution, args.lattice_resolution)?;
    }

    if let Some(ref path) = args.fbm {
        info!("Generating heightmap with FBM ({} noise)...", config.noise);
        let noise = config.noise.build(size, seeds.fbm)?;
        let mut heightmap = Grid::new(size);
        fbm(&mut heightmap, &noise, &config.fbm)?;
        render::heightmap(&heightmap, path)?;
    }

    info!("Done.");
    Ok(())
}
