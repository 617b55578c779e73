//! Intermediate generation raster.
//!
//! Each cell carries a signed level: negative values are the four water/land
//! sentinels, non-negative values are positions on the biome scale.

use crate::color::Color;
use crate::tilemap::Tilemap;

pub type Level = i32;

pub const WATER_PRIMARY: Level = -1;
/// Second water layer, used to plump rivers without being detected as water by the walk.
pub const WATER_SECONDARY: Level = -2;
pub const LAND_PRIMARY: Level = -3;
pub const LAND_SECONDARY: Level = -4;

// Biome scale, polar to jungle
pub const POLAR: Level = 0;
pub const TUNDRA: Level = 100;
pub const FOREST: Level = 200;
pub const DESERT: Level = 300;
pub const SAVANNA: Level = 400;
pub const JUNGLE: Level = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorTile {
    pub level: Level,
    pub color: Color,
}

impl Default for GeneratorTile {
    fn default() -> Self {
        Self {
            level: WATER_PRIMARY,
            color: Color::default(),
        }
    }
}

/// Level raster the pipeline stages paint on.
///
/// Coordinates are signed; reads off the grid see primary water and writes
/// off the grid are dropped.
#[derive(Clone, Debug)]
pub struct Raster {
    cells: Tilemap<GeneratorTile>,
}

impl Raster {
    /// A raster filled with primary water.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Tilemap::new(width, height),
        }
    }

    pub fn width(&self) -> i32 {
        self.cells.width as i32
    }

    pub fn height(&self) -> i32 {
        self.cells.height as i32
    }

    pub fn level(&self, x: i32, y: i32) -> Level {
        self.cells.try_get(x, y).map_or(WATER_PRIMARY, |cell| cell.level)
    }

    pub fn is(&self, x: i32, y: i32, level: Level) -> bool {
        self.level(x, y) == level
    }

    pub fn set_level(&mut self, x: i32, y: i32, level: Level) {
        if let Some(cell) = self.cells.try_get_mut(x, y) {
            cell.level = level;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &GeneratorTile)> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut GeneratorTile)> {
        self.cells.iter_mut()
    }

    /// Number of cells currently at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.iter().filter(|(_, _, cell)| cell.level == level).count()
    }

    /// Number of cells on the biome scale or holding a land sentinel.
    pub fn land_count(&self) -> usize {
        self.iter().filter(|(_, _, cell)| is_land(cell.level)).count()
    }
}

pub fn is_water(level: Level) -> bool {
    level == WATER_PRIMARY || level == WATER_SECONDARY
}

pub fn is_land(level: Level) -> bool {
    !is_water(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_raster_is_primary_water() {
        let raster = Raster::new(6, 4);
        assert_eq!(raster.count(WATER_PRIMARY), 24);
        assert_eq!(raster.land_count(), 0);
    }

    #[test]
    fn test_off_grid_reads_water_and_drops_writes() {
        let mut raster = Raster::new(3, 3);
        raster.set_level(-1, 0, LAND_PRIMARY);
        raster.set_level(3, 3, LAND_PRIMARY);
        assert_eq!(raster.level(-1, 0), WATER_PRIMARY);
        assert_eq!(raster.land_count(), 0);
        assert_eq!(raster.level(5, 5), WATER_PRIMARY);

        raster.set_level(1, 1, LAND_PRIMARY);
        assert!(raster.is(1, 1, LAND_PRIMARY));
        assert_eq!(raster.land_count(), 1);
    }

    #[test]
    fn test_level_classes() {
        assert!(is_water(WATER_PRIMARY));
        assert!(is_water(WATER_SECONDARY));
        assert!(is_land(LAND_PRIMARY));
        assert!(is_land(LAND_SECONDARY));
        assert!(is_land(POLAR));
        assert!(is_land(JUNGLE));
    }
}
