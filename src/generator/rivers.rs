//! River carving.
//!
//! A river starts on a coast cell and walks inland as a chain of primary
//! water cells, each one padded by a neighbouring secondary water cell. The
//! walk stops when it reaches water, so rivers end in lakes, the sea or each
//! other.

use rand::Rng;
use tracing::trace;

use super::params::GeneratorParams;
use super::random::{one_in, random_step, skewed_sign};
use super::raster::{Raster, LAND_PRIMARY, WATER_PRIMARY, WATER_SECONDARY};

/// Spawn rivers on coast cells, sweeping left to right (water to the west)
/// then right to left (water to the east). Returns the number of rivers.
pub fn carve_rivers<R: Rng + ?Sized>(
    raster: &mut Raster,
    params: &GeneratorParams,
    rng: &mut R,
) -> usize {
    let x_end = raster.width() - params.border_x - params.scan_margin;
    let y_end = raster.height() - params.border_y - params.scan_margin;
    let mut rivers = 0;

    for y in 1..y_end {
        for x in 1..x_end {
            if raster.is(x, y, LAND_PRIMARY)
                && raster.is(x - 1, y, WATER_PRIMARY)
                && one_in(rng, params.river_chance)
            {
                walk(raster, params, rng, x, y);
                rivers += 1;
            }
        }
    }
    for y in 1..y_end {
        for x in (1..=x_end).rev() {
            if raster.is(x, y, LAND_PRIMARY)
                && raster.is(x + 1, y, WATER_PRIMARY)
                && one_in(rng, params.river_chance)
            {
                walk(raster, params, rng, x, y);
                rivers += 1;
            }
        }
    }

    trace!(rivers, "river sweep");
    rivers
}

/// Walk one river from `(x, y)`. Returns the number of cells carved.
pub fn walk<R: Rng + ?Sized>(
    raster: &mut Raster,
    params: &GeneratorParams,
    rng: &mut R,
    x: i32,
    y: i32,
) -> usize {
    let length = rng.gen_range(params.river_min_length..=params.river_max_length);
    let skew_x = rng.gen_range(1..=params.river_max_skew);
    let skew_y = rng.gen_range(1..=params.river_max_skew);
    let (mut rx, mut ry) = (x, y);
    let mut carved = 0;

    for _ in 0..length {
        // off the grid reads as primary water, so the walk also ends there
        if raster.is(rx, ry, WATER_PRIMARY) {
            break;
        }
        raster.set_level(rx, ry, WATER_PRIMARY);
        raster.set_level(rx + random_step(rng), ry + random_step(rng), WATER_SECONDARY);
        carved += 1;

        let (px, py) = (rx, ry);
        while (rx, ry) == (px, py) {
            if rng.gen_range(0..3) != 1 {
                rx += skewed_sign(rng, skew_x);
            }
            if rng.gen_range(0..3) != 1 {
                ry += skewed_sign(rng, skew_y);
            }
        }
    }

    carved
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn land_raster(width: usize, height: usize) -> Raster {
        let mut raster = Raster::new(width, height);
        for (_, _, cell) in raster.iter_mut() {
            cell.level = LAND_PRIMARY;
        }
        raster
    }

    #[test]
    fn test_walk_length_bounded() {
        let params = GeneratorParams::compact();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..20 {
            let mut raster = land_raster(200, 200);
            let carved = walk(&mut raster, &params, &mut rng, 100, 100);
            assert!(carved >= 1);
            assert!(carved <= params.river_max_length as usize);
            assert!(raster.count(WATER_PRIMARY) <= carved);
        }
    }

    #[test]
    fn test_walk_stops_on_water() {
        let params = GeneratorParams::compact();
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let mut raster = Raster::new(16, 16);
        assert_eq!(walk(&mut raster, &params, &mut rng, 8, 8), 0);
        assert_eq!(raster.count(WATER_SECONDARY), 0);
    }

    #[test]
    fn test_walk_terminates_off_grid() {
        let params = GeneratorParams {
            river_min_length: 500,
            river_max_length: 500,
            ..GeneratorParams::compact()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mut raster = land_raster(8, 8);
        let carved = walk(&mut raster, &params, &mut rng, 4, 4);
        assert!(carved < 500);
    }

    #[test]
    fn test_rivers_spawn_on_coast() {
        let params = GeneratorParams {
            river_chance: 2,
            ..GeneratorParams::compact()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let mut raster = land_raster(64, 64);
        for y in 0..64 {
            raster.set_level(0, y, WATER_PRIMARY);
            raster.set_level(1, y, WATER_PRIMARY);
        }
        let rivers = carve_rivers(&mut raster, &params, &mut rng);
        assert!(rivers > 0);
        // secondary water only ever replaces cells, never removes water
        assert!(raster.count(WATER_PRIMARY) + raster.count(WATER_SECONDARY) > 128);
    }
}
