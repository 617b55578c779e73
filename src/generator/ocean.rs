//! Ocean split and coastal erosion.

use rand::Rng;
use tracing::trace;

use super::params::GeneratorParams;
use super::random::{one_in, random_step};
use super::raster::{Raster, LAND_PRIMARY, WATER_PRIMARY};
use super::shapes::{Disk, ScanOrder, Stroke};

/// Carve a drifting band of primary water from the top border to the bottom
/// border. Returns the band's starting (left, right) columns.
pub fn ocean_split<R: Rng + ?Sized>(
    raster: &mut Raster,
    params: &GeneratorParams,
    rng: &mut R,
) -> (i32, i32) {
    let (width, height) = (raster.width(), raster.height());
    let (bx, by) = (params.border_x, params.border_y);
    let max_angle = params.ocean_max_angle;
    let margins = params.ocean_margin_left + params.ocean_margin_right;

    let mut angle = rng.gen_range(-max_angle..=max_angle);
    let mut left = rng.gen_range(0..width - 2 * bx - margins) + bx + params.ocean_margin_left;
    let mut right = left + rng.gen_range(params.ocean_min_width..params.ocean_max_width);
    let start = (left, right);

    for y in by..=(height - by).min(height - 1) {
        for x in 0..width {
            if x < left || x > right {
                continue;
            }
            raster.set_level(x, y, WATER_PRIMARY);
            if one_in(rng, params.ocean_jitter_chance) {
                left += random_step(rng);
                right += random_step(rng);
            }
            // bounce off the side borders
            if right > width - bx {
                left -= 1;
                right -= 1;
                angle = -angle;
            }
            if left < bx {
                left += 1;
                right += 1;
                angle = -angle;
            }
        }
        left += angle;
        right += angle;
        if one_in(rng, params.ocean_angle_chance) {
            angle = rng.gen_range(-max_angle..=max_angle);
        }
    }

    start
}

fn is_coast(raster: &Raster, x: i32, y: i32) -> bool {
    raster.is(x, y, LAND_PRIMARY) && raster.is(x - 1, y, WATER_PRIMARY)
}

/// Bite small water disks into coastlines whose water lies to the west.
///
/// Sweeps the raster left to right, then right to left. Returns the number of
/// disks carved.
pub fn coastal_erosion<R: Rng + ?Sized>(
    raster: &mut Raster,
    params: &GeneratorParams,
    rng: &mut R,
) -> usize {
    let x_end = raster.width() - params.border_x - params.scan_margin;
    let y_end = raster.height() - params.border_y - params.scan_margin;
    let mut carved = 0;

    for y in 1..y_end {
        for x in 1..x_end {
            if is_coast(raster, x, y) && one_in(rng, params.erosion_chance) {
                erode_at(raster, params, rng, x, y, (x_end, y_end));
                carved += 1;
            }
        }
    }
    for y in 1..y_end {
        for x in (1..x_end).rev() {
            if is_coast(raster, x, y) && one_in(rng, params.erosion_chance) {
                erode_at(raster, params, rng, x, y, (x_end, y_end));
                carved += 1;
            }
        }
    }

    trace!(carved, "coastal erosion sweep");
    carved
}

fn erode_at<R: Rng + ?Sized>(
    raster: &mut Raster,
    params: &GeneratorParams,
    rng: &mut R,
    x: i32,
    y: i32,
    (x_end, y_end): (i32, i32),
) {
    let size = rng.gen_range(params.erosion_min_size..params.erosion_max_size);
    let (corner_x, corner_y) = (x - size / 2, y - size / 2);

    let passes = [
        (ScanOrder::Rows, (x_end, raster.height())),
        (ScanOrder::Columns, (raster.width(), y_end)),
    ];
    for (order, limit) in passes {
        let stroke = Stroke {
            level: WATER_PRIMARY,
            distortion: params.erosion_distortion,
            order,
            limit,
            fill_box: false,
        };
        Disk::new(corner_x, corner_y, size).stamp(raster, params, &stroke, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn land_raster(width: usize, height: usize) -> Raster {
        let mut raster = Raster::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                raster.set_level(x, y, LAND_PRIMARY);
            }
        }
        raster
    }

    #[test]
    fn test_split_crosses_every_interior_row() {
        let params = GeneratorParams::compact();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut raster = land_raster(64, 64);
        let (left, right) = ocean_split(&mut raster, &params, &mut rng);

        assert!(left >= params.border_x + params.ocean_margin_left);
        assert!(right - left >= params.ocean_min_width);
        assert!(right - left < params.ocean_max_width);
        assert!(raster.is(left, params.border_y, WATER_PRIMARY));
        assert!(raster.count(WATER_PRIMARY) as i32 >= right - left);
        // border rows untouched
        assert!((0..64).all(|x| raster.is(x, 0, LAND_PRIMARY)));
    }

    #[test]
    fn test_erosion_needs_western_water() {
        let params = GeneratorParams {
            erosion_chance: 2,
            ..GeneratorParams::compact()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut raster = land_raster(64, 64);
        assert_eq!(coastal_erosion(&mut raster, &params, &mut rng), 0);
        assert_eq!(raster.count(WATER_PRIMARY), 0);
    }

    #[test]
    fn test_erosion_bites_into_coast() {
        let params = GeneratorParams {
            erosion_chance: 2,
            ..GeneratorParams::compact()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut raster = land_raster(64, 64);
        for y in 0..64 {
            for x in 0..20 {
                raster.set_level(x, y, WATER_PRIMARY);
            }
        }
        let before = raster.count(WATER_PRIMARY);
        let carved = coastal_erosion(&mut raster, &params, &mut rng);
        assert!(carved > 0);
        assert!(raster.count(WATER_PRIMARY) > before);
        // only water was painted
        assert_eq!(raster.count(WATER_PRIMARY) + raster.count(LAND_PRIMARY), 64 * 64);
    }
}
