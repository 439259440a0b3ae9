/// A square 2D grid of cells, stored row by row.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    size: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![T::default(); size * size],
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(size: usize, value: T) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    /// Width and height of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn num_points(&self) -> usize {
        self.data.len()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size, "({x}, {y}) outside {0}x{0} grid", self.size);
        y * self.size + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Fill the entire grid with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// The four direct neighbours of a cell (left, right, down, up).
    /// Both axes wrap, so the grid behaves as a torus and every cell has
    /// exactly four neighbours.
    pub fn neighbors_wrapped(&self, x: usize, y: usize) -> [(usize, usize); 4] {
        let n = self.size;
        [
            ((x + n - 1) % n, y),
            ((x + 1) % n, y),
            (x, (y + 1) % n),
            (x, (y + n - 1) % n),
        ]
    }

    /// Iterate over all cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let size = self.size;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % size;
            let y = idx / size;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let size = self.size;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % size;
            let y = idx / size;
            (x, y, val)
        })
    }

    /// Visit every cell in iteration order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, &T),
    {
        for (x, y, value) in self.iter() {
            f(x, y, value);
        }
    }
}

impl Grid<f64> {
    /// Smallest and largest cell values, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut values = self.data.iter().copied();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Linearly rescale every cell so the current minimum maps to `min` and
    /// the current maximum maps to `max`. A constant grid is left unchanged.
    pub fn normalize(&mut self, min: f64, max: f64) {
        let Some((lo, hi)) = self.min_max() else {
            return;
        };

        let range = hi - lo;
        if range == 0.0 {
            return;
        }

        let scale = (max - min) / range;
        for value in self.data.iter_mut() {
            *value = if *value == hi {
                max
            } else {
                min + (*value - lo) * scale
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let mut grid = Grid::new_with(4, 0.0f64);
        grid.set(3, 1, 2.5);

        assert_eq!(*grid.get(3, 1), 2.5);
        assert_eq!(*grid.get(1, 3), 0.0);
        assert_eq!(grid.num_points(), 16);
    }

    #[test]
    fn test_iter_is_row_major_and_complete() {
        let grid: Grid<i32> = Grid::new(3);
        let coords: Vec<(usize, usize)> = grid.iter().map(|(x, y, _)| (x, y)).collect();

        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (1, 0));
        assert_eq!(coords[3], (0, 1));
        assert_eq!(coords[8], (2, 2));
    }

    #[test]
    fn test_neighbors_wrap_on_both_axes() {
        let grid: Grid<u8> = Grid::new(5);
        let corner = grid.neighbors_wrapped(0, 0);

        assert!(corner.contains(&(4, 0)));
        assert!(corner.contains(&(1, 0)));
        assert!(corner.contains(&(0, 1)));
        assert!(corner.contains(&(0, 4)));

        let far = grid.neighbors_wrapped(4, 4);
        assert!(far.contains(&(0, 4)));
        assert!(far.contains(&(4, 0)));
    }

    #[test]
    fn test_normalize_hits_bounds() {
        let mut grid = Grid::new_with(3, 0.0f64);
        for (i, (_, _, v)) in grid.iter_mut().enumerate() {
            *v = i as f64 * 3.7 - 10.0;
        }

        grid.normalize(0.0, 1.0);
        let (lo, hi) = grid.min_max().unwrap();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 1.0);
    }

    #[test]
    fn test_normalize_sub_range() {
        let mut grid = Grid::new_with(2, 5.0f64);
        grid.set(0, 0, -5.0);

        grid.normalize(0.3, 1.0);
        assert_eq!(*grid.get(0, 0), 0.3);
        assert_eq!(*grid.get(1, 1), 1.0);
    }

    #[test]
    fn test_normalize_constant_grid_is_unchanged() {
        let mut grid = Grid::new_with(4, 0.42f64);
        grid.normalize(0.0, 1.0);

        assert!(grid.iter().all(|(_, _, &v)| v == 0.42));
    }
}
