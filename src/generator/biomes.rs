//! Latitude biomes and colour blending.

use rand::Rng;
use tracing::trace;

use super::params::GeneratorParams;
use super::random::{one_in, random_step};
use super::raster::{
    Level, Raster, DESERT, FOREST, JUNGLE, LAND_PRIMARY, LAND_SECONDARY, POLAR, SAVANNA, TUNDRA,
    WATER_PRIMARY, WATER_SECONDARY,
};
use crate::color::Color;

/// Reference colour of each biome band, ordered by level.
pub const BIOME_BANDS: [(Level, Color); 6] = [
    (POLAR, Color::new(255, 255, 255)),
    (TUNDRA, Color::new(90, 150, 90)),
    (FOREST, Color::new(40, 120, 40)),
    (DESERT, Color::new(192, 166, 86)),
    (SAVANNA, Color::new(70, 100, 70)),
    (JUNGLE, Color::new(0, 60, 0)),
];

fn is_interior(raster: &Raster, x: i32, y: i32) -> bool {
    [(0, -1), (1, 0), (0, 1), (-1, 0)].iter().all(|&(dx, dy)| {
        let level = raster.level(x + dx, y + dy);
        level == LAND_PRIMARY || level == POLAR
    })
}

/// Mark interior land as polar, then assign each polar cell a level from a
/// latitude accumulator walked down every column.
///
/// The accumulator rises above a wandering equator row and falls below it,
/// so the middle of the map ends up jungle and the poles stay cold. Returns
/// the number of cells that entered the biome scale.
pub fn classify_biomes<R: Rng + ?Sized>(
    raster: &mut Raster,
    params: &GeneratorParams,
    rng: &mut R,
) -> usize {
    let (width, height) = (raster.width(), raster.height());

    let mut classified = 0;
    for y in 0..height {
        for x in 0..width {
            if raster.is(x, y, LAND_PRIMARY) && is_interior(raster, x, y) {
                raster.set_level(x, y, POLAR);
                classified += 1;
            }
        }
    }

    let mut equator = height / 2;
    let (mut north_cap, mut south_cap) = (0, 0);
    for x in 1..width {
        if one_in(rng, params.latitude_walk_chance) {
            south_cap += random_step(rng);
        }
        if one_in(rng, params.latitude_walk_chance) {
            north_cap += random_step(rng);
        }
        if one_in(rng, params.latitude_walk_chance) {
            equator += random_step(rng);
        }

        let mut level = POLAR;
        let start = (params.polar_margin + north_cap).max(0);
        let end = (height - (params.polar_margin + south_cap)).min(height);
        for y in start..end {
            // two rows out of three move the accumulator
            if y % 3 != 2 {
                if y < equator && level < params.biome_cap {
                    level += params.biome_step;
                } else if y > equator && level > POLAR {
                    level = (level - params.biome_step).max(POLAR);
                }
            }
            if raster.is(x, y, POLAR) {
                raster.set_level(x, y, level);
            }
        }
    }

    trace!(classified, equator, "biomes classified");
    classified
}

/// Colour for a biome level: the band colour on a boundary, otherwise a blend
/// toward the next band. `None` for sentinel levels.
pub fn band_color(level: Level) -> Option<Color> {
    if level < POLAR {
        return None;
    }
    for pair in BIOME_BANDS.windows(2) {
        let ((lower, from), (upper, to)) = (pair[0], pair[1]);
        if level == lower {
            return Some(from);
        }
        if level < upper {
            let factor = f64::from(level - lower) / f64::from(upper - lower);
            return Some(Color::interpolate(from, to, factor));
        }
    }
    Some(BIOME_BANDS[BIOME_BANDS.len() - 1].1)
}

/// Store the display colour of every cell that does not get one at lowering.
pub fn blend_colors(raster: &mut Raster) {
    for (_, _, cell) in raster.iter_mut() {
        let color = match cell.level {
            WATER_PRIMARY => continue,
            WATER_SECONDARY => Color::WATER2,
            LAND_PRIMARY => Color::LAND1,
            LAND_SECONDARY => Color::LAND2,
            level => match band_color(level) {
                Some(color) => color,
                None => continue,
            },
        };
        cell.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_band_boundaries_take_reference_color() {
        for (level, color) in BIOME_BANDS {
            assert_eq!(band_color(level), Some(color));
        }
        assert_eq!(band_color(WATER_PRIMARY), None);
        assert_eq!(band_color(LAND_SECONDARY), None);
        assert_eq!(band_color(900), Some(BIOME_BANDS[5].1));
    }

    #[test]
    fn test_band_blend_midpoint() {
        // halfway from white to tundra
        assert_eq!(band_color(50), Some(Color::new(173, 203, 173)));
        let desert_side = band_color(399).unwrap();
        assert_eq!(desert_side, Color::new(72, 101, 71));
    }

    #[test]
    fn test_interior_land_becomes_polar() {
        let mut raster = Raster::new(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                raster.set_level(x, y, LAND_PRIMARY);
            }
        }
        let params = GeneratorParams {
            polar_margin: 100,
            ..GeneratorParams::compact()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let classified = classify_biomes(&mut raster, &params, &mut rng);

        assert_eq!(classified, 1);
        assert!(raster.is(2, 2, POLAR));
        assert!(raster.is(1, 1, LAND_PRIMARY));
        assert!(raster.is(2, 1, LAND_PRIMARY));
    }

    #[test]
    fn test_latitude_levels_stay_on_scale() {
        let mut raster = Raster::new(64, 96);
        for (_, _, cell) in raster.iter_mut() {
            cell.level = LAND_PRIMARY;
        }
        let params = GeneratorParams::compact();
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        classify_biomes(&mut raster, &params, &mut rng);

        let mut warm = 0;
        for (_, _, cell) in raster.iter() {
            assert!(cell.level == LAND_PRIMARY || (POLAR..=params.biome_cap).contains(&cell.level));
            if cell.level > POLAR {
                warm += 1;
            }
        }
        assert!(warm > 0);
        // rows above the polar margin keep level zero
        assert!(raster.is(3, 1, POLAR));
        // the outer ring never counts as interior
        assert!(raster.is(0, 50, LAND_PRIMARY));
    }

    #[test]
    fn test_blend_colors_sentinels() {
        let mut raster = Raster::new(4, 1);
        raster.set_level(0, 0, WATER_SECONDARY);
        raster.set_level(1, 0, LAND_PRIMARY);
        raster.set_level(2, 0, LAND_SECONDARY);
        raster.set_level(3, 0, FOREST);
        blend_colors(&mut raster);

        let colors: Vec<Color> = raster.iter().map(|(_, _, c)| c.color).collect();
        assert_eq!(colors, vec![Color::WATER2, Color::LAND1, Color::LAND2, BIOME_BANDS[2].1]);
    }
}
