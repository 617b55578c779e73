/// Neighbour offsets for 8-connectivity, row by row from the top-left.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A bounded 2D grid stored row-major. Edges do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    /// Build from rows that all have length `width`.
    pub fn from_rows(width: usize, rows: Vec<Vec<T>>) -> Self {
        let height = rows.len();
        let data: Vec<T> = rows.into_iter().flatten().collect();
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// Convert signed coordinates to an index, `None` when off the grid.
    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
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

    pub fn try_get(&self, x: i32, y: i32) -> Option<&T> {
        self.checked_index(x, y).map(|idx| &self.data[idx])
    }

    pub fn try_get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        match self.checked_index(x, y) {
            Some(idx) => Some(&mut self.data[idx]),
            None => None,
        }
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on zero, an empty map simply has no rows
        self.data.chunks(self.width.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let map: Tilemap<u8> = Tilemap::new(4, 3);
        assert!(map.try_get(0, 0).is_some());
        assert!(map.try_get(3, 2).is_some());
        assert!(map.try_get(4, 0).is_none());
        assert!(map.try_get(0, 3).is_none());
        assert!(map.try_get(-1, 1).is_none());
        assert!(map.try_get(-1, -1).is_none());
    }

    #[test]
    fn test_iter_coordinates_row_major() {
        let mut map: Tilemap<usize> = Tilemap::new(3, 2);
        for (x, y, v) in map.iter_mut() {
            *v = y * 10 + x;
        }
        assert_eq!(*map.get(2, 1), 12);
        let rows: Vec<&[usize]> = map.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[10, 11, 12]);
    }

    #[test]
    fn test_empty_map_has_no_rows() {
        let map: Tilemap<u8> = Tilemap::new(0, 0);
        assert_eq!(map.rows().count(), 0);
        assert_eq!(map.iter().count(), 0);
    }
}
