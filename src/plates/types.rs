use rand::Rng;

use crate::grid::Grid;

/// Unique identifier for a plate, doubling as its index in the plate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PlateId(pub u32);

impl PlateId {
    /// Label of a cell no plate has claimed yet.
    pub const NONE: PlateId = PlateId(u32::MAX);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Type of plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlateType {
    /// Continental plates sit above the sea gap midpoint.
    Continental,
    /// Oceanic plates sit below it.
    Oceanic,
}

impl PlateType {
    /// Fair coin flip between the two types.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Continental
        } else {
            Self::Oceanic
        }
    }

    /// Elevation of this plate type for a given sea gap.
    pub fn height(&self, sea_gap: f64) -> f64 {
        match self {
            Self::Continental => 0.5 + sea_gap / 2.0,
            Self::Oceanic => 0.5 - sea_gap / 2.0,
        }
    }
}

/// A growing region of the label grid.
///
/// The frontier lists unclaimed cells next to the plate. Entries may go
/// stale when a neighbouring plate claims them first; they are dropped when
/// drawn instead of being purged from every frontier eagerly.
#[derive(Clone, Debug)]
pub struct Plate {
    pub id: PlateId,
    pub plate_type: PlateType,
    pub seed: (usize, usize),
    area: usize,
    frontier: Vec<(usize, usize)>,
}

impl Plate {
    /// Create a plate on an already-labelled seed cell. The frontier starts
    /// as the seed's unclaimed neighbours.
    pub fn new(id: PlateId, plate_type: PlateType, seed: (usize, usize), labels: &Grid<PlateId>) -> Self {
        Self {
            id,
            plate_type,
            seed,
            area: 1,
            frontier: empty_neighbors(labels, seed).collect(),
        }
    }

    pub fn has_frontier(&self) -> bool {
        !self.frontier.is_empty()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Number of cells owned, seed included.
    pub fn area(&self) -> usize {
        self.area
    }

    /// Claim one random unclaimed frontier cell.
    ///
    /// Stale entries drawn along the way are discarded. Returns the claimed
    /// cell, or `None` once the frontier holds nothing claimable.
    pub fn absorb_frontier<R: Rng + ?Sized>(
        &mut self,
        labels: &mut Grid<PlateId>,
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        while !self.frontier.is_empty() {
            let pick = rng.gen_range(0..self.frontier.len());
            let (x, y) = self.frontier.swap_remove(pick);

            if labels.get(x, y).is_none() {
                labels.set(x, y, self.id);
                self.area += 1;
                self.frontier.extend(empty_neighbors(labels, (x, y)));
                return Some((x, y));
            }
        }

        None
    }
}

/// Unclaimed 4-connected neighbours of `point` on the wrapping grid.
fn empty_neighbors(labels: &Grid<PlateId>, point: (usize, usize)) -> impl Iterator<Item = (usize, usize)> + '_ {
    labels
        .neighbors_wrapped(point.0, point.1)
        .into_iter()
        .filter(move |&(x, y)| labels.get(x, y).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_heights_by_type() {
        assert_eq!(PlateType::Continental.height(0.0), 0.5);
        assert_eq!(PlateType::Oceanic.height(0.0), 0.5);
        assert_eq!(PlateType::Continental.height(1.0), 1.0);
        assert_eq!(PlateType::Oceanic.height(1.0), 0.0);
    }

    #[test]
    fn test_initial_frontier_skips_claimed_neighbors() {
        let mut labels = Grid::new_with(5, PlateId::NONE);
        labels.set(2, 2, PlateId(0));
        labels.set(1, 2, PlateId(1));

        let plate = Plate::new(PlateId(0), PlateType::Oceanic, (2, 2), &labels);
        assert_eq!(plate.frontier_len(), 3);
        assert_eq!(plate.area(), 1);
    }

    #[test]
    fn test_absorb_discards_stale_entries() {
        let mut labels = Grid::new_with(3, PlateId::NONE);
        labels.set(1, 1, PlateId(0));
        let mut plate = Plate::new(PlateId(0), PlateType::Continental, (1, 1), &labels);

        // Another plate claims every frontier cell before this one moves.
        for &(x, y) in &plate.frontier.clone() {
            labels.set(x, y, PlateId(1));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(plate.absorb_frontier(&mut labels, &mut rng), None);
        assert!(!plate.has_frontier());
        assert_eq!(plate.area(), 1);
    }

    #[test]
    fn test_absorb_claims_and_extends() {
        let mut labels = Grid::new_with(5, PlateId::NONE);
        labels.set(0, 0, PlateId(2));
        let mut plate = Plate::new(PlateId(2), PlateType::Oceanic, (0, 0), &labels);

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let (x, y) = plate.absorb_frontier(&mut labels, &mut rng).unwrap();

        assert_eq!(*labels.get(x, y), PlateId(2));
        assert_eq!(plate.area(), 2);
        // Three original entries left, plus three fresh neighbours of the new cell.
        assert_eq!(plate.frontier_len(), 6);
    }
}
