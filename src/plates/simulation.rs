use rand::Rng;
use tracing::{debug, info};

use crate::error::{Result, WorldgenError};
use crate::grid::Grid;

use super::types::{Plate, PlateId, PlateType};

/// Random draws tried per plate before seeding falls back to picking among
/// the remaining free cells directly.
const MAX_SEED_ATTEMPTS: usize = 64;

/// Partitions a square, wrapping map into plates grown from random seeds.
#[derive(Clone, Debug)]
pub struct PlateSimulation {
    labels: Grid<PlateId>,
    plates: Vec<Plate>,
}

impl PlateSimulation {
    pub fn new(size: usize) -> Self {
        Self {
            labels: Grid::new_with(size, PlateId::NONE),
            plates: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.labels.size()
    }

    pub fn num_points(&self) -> usize {
        self.labels.num_points()
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    /// Plate owning `(x, y)`, or [`PlateId::NONE`] before generation.
    pub fn label(&self, x: usize, y: usize) -> PlateId {
        *self.labels.get(x, y)
    }

    /// Every cell as `(x, y, plate_id)`, row by row.
    pub fn labels(&self) -> impl Iterator<Item = (usize, usize, PlateId)> + '_ {
        self.labels.iter().map(|(x, y, &id)| (x, y, id))
    }

    /// Seed `num_plates` plates and grow them until the map is covered.
    ///
    /// Any previous result is discarded. Returns the number of cells
    /// absorbed by growth, which excludes the seed cells.
    pub fn generate_plates<R: Rng + ?Sized>(&mut self, num_plates: usize, rng: &mut R) -> Result<usize> {
        let cells = self.num_points();
        if num_plates == 0 {
            return Err(WorldgenError::NoPlates);
        }
        if num_plates > cells || num_plates > PlateId::NONE.0 as usize {
            return Err(WorldgenError::TooManyPlates { plates: num_plates, cells });
        }

        self.labels.fill(PlateId::NONE);
        self.plates.clear();
        self.seed_plates(num_plates, rng);

        let absorbed = self.grow(rng);

        info!(
            "Grew {} plates over {} cells ({} continental)",
            self.plates.len(),
            cells,
            self.plates.iter().filter(|p| p.plate_type == PlateType::Continental).count()
        );
        Ok(absorbed)
    }

    fn seed_plates<R: Rng + ?Sized>(&mut self, num_plates: usize, rng: &mut R) {
        let size = self.size();

        for plate_num in 0..num_plates {
            let id = PlateId(plate_num as u32);
            let seed = self.find_free_cell(size, rng);
            self.labels.set(seed.0, seed.1, id);

            let plate_type = PlateType::random(rng);
            self.plates.push(Plate::new(id, plate_type, seed, &self.labels));
        }
    }

    /// Uniformly random unclaimed cell. Callers guarantee one exists.
    fn find_free_cell<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> (usize, usize) {
        for _ in 0..MAX_SEED_ATTEMPTS {
            let (x, y) = (rng.gen_range(0..size), rng.gen_range(0..size));
            if self.labels.get(x, y).is_none() {
                return (x, y);
            }
        }

        // Crowded map: choose among the cells that are actually free.
        let free: Vec<(usize, usize)> = self
            .labels
            .iter()
            .filter(|(_, _, id)| id.is_none())
            .map(|(x, y, _)| (x, y))
            .collect();
        free[rng.gen_range(0..free.len())]
    }

    fn grow<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let total = self.num_points() - self.plates.len();
        let report_every = (total / 100).max(1);

        let mut active: Vec<usize> = (0..self.plates.len())
            .filter(|&i| self.plates[i].has_frontier())
            .collect();
        let mut weights: Vec<usize> = Vec::with_capacity(active.len());
        let mut absorbed = 0;

        while !active.is_empty() {
            weights.clear();
            weights.extend(active.iter().map(|&i| self.plates[i].frontier_len()));
            let slot = pick_weighted(&weights, rng);

            let plate = &mut self.plates[active[slot]];
            match plate.absorb_frontier(&mut self.labels, rng) {
                Some(_) => {
                    if !plate.has_frontier() {
                        active.swap_remove(slot);
                    }
                    absorbed += 1;
                    if absorbed % report_every == 0 {
                        debug!(
                            "{}/{} {}%",
                            absorbed,
                            total,
                            (absorbed as f64 / total as f64 * 100.0).round()
                        );
                    }
                }
                None => {
                    active.swap_remove(slot);
                }
            }
        }

        absorbed
    }

    /// Height of each plate, indexed by plate id.
    pub fn elevation_table(&self, sea_gap: f64) -> Result<Vec<f64>> {
        if !(0.0..=1.0).contains(&sea_gap) {
            return Err(WorldgenError::SeaGapOutOfRange(sea_gap));
        }

        Ok(self.plates.iter().map(|p| p.plate_type.height(sea_gap)).collect())
    }

    /// Convert the label map to a two-level height map: continental plates at
    /// `0.5 + sea_gap / 2`, oceanic plates at `0.5 - sea_gap / 2`.
    pub fn to_height_map(&self, sea_gap: f64) -> Result<Grid<f64>> {
        let heights = self.elevation_table(sea_gap)?;
        if self.plates.is_empty() || self.labels().any(|(_, _, id)| id.is_none()) {
            return Err(WorldgenError::PlatesNotGenerated);
        }

        let mut map = Grid::new_with(self.size(), 0.0);
        for (x, y, id) in self.labels() {
            map.set(x, y, heights[id.index()]);
        }

        Ok(map)
    }

    /// Share of the map covered by continental plates.
    pub fn continental_fraction(&self) -> f64 {
        let continental: usize = self
            .plates
            .iter()
            .filter(|p| p.plate_type == PlateType::Continental)
            .map(Plate::area)
            .sum();

        if self.num_points() == 0 {
            0.0
        } else {
            continental as f64 / self.num_points() as f64
        }
    }
}

/// Index drawn with probability proportional to its weight.
///
/// Walks the weights subtracting each from a uniform draw in
/// `[0, sum)`; the draw is always smaller than the sum, so the walk ends
/// inside the slice. At least one weight must be non-zero.
pub fn pick_weighted<R: Rng + ?Sized>(weights: &[usize], rng: &mut R) -> usize {
    let total: usize = weights.iter().sum();
    let mut point = rng.gen_range(0..total);

    for (idx, &weight) in weights.iter().enumerate() {
        if point < weight {
            return idx;
        }
        point -= weight;
    }

    unreachable!("weighted draw {point} outside total weight {total}")
}
