//! Continent shapes: the stretched hexagon and the distorted disk.
//!
//! Both shapes paint one level into the raster while their edges drift by
//! small random steps, which is where the ragged coastlines come from.

use rand::Rng;

use super::params::GeneratorParams;
use super::random::{one_in, random_sign, random_step, skewed_sign};
use super::raster::{Level, Raster, LAND_PRIMARY, WATER_PRIMARY};

/// Move `value` by `step`, bouncing back inside `[low, high]` when it escapes.
fn nudge_within(value: i32, step: i32, low: i32, high: i32) -> i32 {
    let moved = value + step;
    if moved < low {
        low + 2
    } else if moved > high {
        high - 2
    } else {
        moved
    }
}

/// Paint one stretched hexagon: a rectangular core with a tapering cap above
/// and a skewed, possibly bumpy cap below.
///
/// Cells outside the shape that do not hold the opposite sentinel are painted
/// too, so stacking hexagons of one level grows that level.
pub fn stretched_hexagon<R: Rng + ?Sized>(
    raster: &mut Raster,
    params: &GeneratorParams,
    rng: &mut R,
    paint: Level,
) {
    let counter = if paint == LAND_PRIMARY { WATER_PRIMARY } else { LAND_PRIMARY };
    let (width, height) = (raster.width(), raster.height());
    let (bx, by) = (params.border_x, params.border_y);
    let jitter = (100 - params.hexagon_distortion).max(1) as u32;
    let skew_left = rng.gen_range(0..=12);
    let skew_right = rng.gen_range(0..=12);
    let nudge = |value: i32, step: i32| nudge_within(value, step, bx, width - bx);

    // Core rectangle
    let y_max = by + rng.gen_range(0..height - 2 * by - params.hexagon_buffer) + 1;
    let y_min = rng.gen_range(by..=y_max.min(height - by - 1));
    let max_line = (y_min - by).min(height - y_max - by);
    let x_max = bx + rng.gen_range(0..width - 2 * bx) + 1;
    let x_low = bx.max(x_max - max_line);
    let x_high = x_max.min(width - bx - 1);
    let x_min = if x_low <= x_high { rng.gen_range(x_low..=x_high) } else { x_max };

    let upper = (y_min, x_min, x_max - x_min);
    let mut lower = upper;
    let (mut left, mut right) = (x_min, x_max);
    let mut line_found = false;

    for y in 0..height {
        for x in 0..width {
            if x >= left && x <= right && y >= y_min && y <= y_max {
                raster.set_level(x, y, paint);
                line_found = true;
                if one_in(rng, jitter) {
                    left += random_step(rng);
                    right += random_step(rng);
                }
            } else if !raster.is(x, y, counter) {
                raster.set_level(x, y, paint);
            }
        }
        if line_found && one_in(rng, jitter) {
            left = nudge(left, random_step(rng));
            right = nudge(right, random_step(rng));
        }
        if y == y_max {
            lower = (y_max, left, (right - left).max(0));
        }
    }

    // Upper cap, narrowing one cell per side and row
    let (cap_y, cap_x, cap_len) = upper;
    let top = cap_y - cap_len;
    let (mut left, mut right) = (cap_x, cap_x + cap_len);
    let mut y = cap_y;
    while y > top && y >= 0 {
        left += 1;
        right -= 1;
        if one_in(rng, jitter) {
            left = nudge(left, random_step(rng));
            right = nudge(right, random_step(rng));
        }
        for x in 0..width {
            if x >= left && x <= right {
                raster.set_level(x, y, paint);
                if one_in(rng, jitter) {
                    left += random_step(rng);
                    right += random_step(rng);
                }
            } else if !raster.is(x, y, counter) {
                raster.set_level(x, y, paint);
            }
        }
        y -= 1;
    }

    // Lower cap, narrowing with a per-side skew
    let (cap_y, cap_x, cap_len) = lower;
    let bottom = cap_y + cap_len;
    let (mut left, mut right) = (cap_x, cap_x + cap_len);
    let mut bump_len = 1;
    for y in cap_y..bottom.min(height) {
        left += 1;
        right -= 1;
        if rng.gen_range(0..=params.hexagon_rigidity) == 0 {
            left = nudge(left, skewed_sign(rng, skew_left));
            right = nudge(right, skewed_sign(rng, skew_right));
        }
        for x in 0..width {
            if x >= left && x <= right {
                raster.set_level(x, y, paint);
                if one_in(rng, jitter) {
                    left += random_step(rng);
                    right += random_step(rng);
                }
            } else if !raster.is(x, y, counter) {
                raster.set_level(x, y, paint);
            }
        }

        if left < bx || right < bx || left > width - bx || right > width - bx {
            break;
        }

        // A cap that would run into the border ends in a row of bumps
        if bottom > height - by {
            for x in cap_x..=cap_x + cap_len {
                bump_len += random_sign(rng);
                if bump_len < 1 {
                    bump_len = 2;
                } else if bump_len + cap_y > height - by - params.hexagon_buffer {
                    bump_len = 1 + random_sign(rng);
                }
                for bump_y in cap_y..cap_y + bump_len {
                    raster.set_level(x, bump_y, paint);
                }
            }
            break;
        }
    }
}

/// Which way a disk pass walks the raster; edges drift across the walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOrder {
    Rows,
    Columns,
}

/// One painting pass of a [`Disk`].
#[derive(Clone, Copy, Debug)]
pub struct Stroke {
    pub level: Level,
    /// Edge drift chance is 1 in `distortion` per painted cell
    pub distortion: i32,
    pub order: ScanOrder,
    /// Exclusive scan limits (x, y)
    pub limit: (i32, i32),
    /// Turn box cells outside the disk that are not primary land into primary water
    pub fill_box: bool,
}

/// A disk inscribed in a square box whose edges drift while painting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Disk {
    size: i32,
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
    center_x: i32,
    center_y: i32,
    radius_sq: i32,
}

impl Disk {
    /// Disk of diameter `size` whose box has its top-left corner at `(x, y)`.
    pub fn new(x: i32, y: i32, size: i32) -> Self {
        let radius = size / 2;
        Self {
            size,
            x_min: x,
            x_max: x + size,
            y_min: y,
            y_max: y + size,
            center_x: x + radius,
            center_y: y + radius,
            radius_sq: radius * radius,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.center_x, self.center_y)
    }

    fn in_box(&self, x: i32, y: i32) -> bool {
        x > self.x_min && x < self.x_max && y > self.y_min && y < self.y_max
    }

    fn in_disk(&self, x: i32, y: i32) -> bool {
        let (dx, dy) = (x - self.center_x, y - self.center_y);
        dx * dx + dy * dy <= self.radius_sq
    }

    fn drift_x<R: Rng + ?Sized>(&mut self, rng: &mut R, border: i32, width: i32) {
        let step = random_step(rng);
        self.center_x += step;
        self.x_min += random_step(rng);
        self.x_max += step;
        if self.x_min < border || self.x_max < border + 1 {
            self.shift(1, 0);
        } else if self.x_min > width - border - self.size || self.x_max > width - border {
            self.shift(-1, 0);
        }
    }

    fn drift_y<R: Rng + ?Sized>(&mut self, rng: &mut R, border: i32, height: i32) {
        let step = random_step(rng);
        self.center_y += step;
        self.y_min += random_step(rng);
        self.y_max += step;
        if self.y_min < border || self.y_max < border + 1 {
            self.shift(0, 1);
        } else if self.y_min > height - border - self.size || self.y_max > height - border {
            self.shift(0, -1);
        }
    }

    fn shift(&mut self, dx: i32, dy: i32) {
        self.center_x += dx;
        self.x_min += dx;
        self.x_max += dx;
        self.center_y += dy;
        self.y_min += dy;
        self.y_max += dy;
    }

    /// Paint the disk into the raster, drifting across the scan direction.
    ///
    /// Only rows (or columns) crossing the box are visited; the box never
    /// moves along the scan direction during a pass.
    pub fn stamp<R: Rng + ?Sized>(
        &mut self,
        raster: &mut Raster,
        params: &GeneratorParams,
        stroke: &Stroke,
        rng: &mut R,
    ) {
        let (width, height) = (raster.width(), raster.height());
        let (limit_x, limit_y) = (stroke.limit.0.min(width), stroke.limit.1.min(height));
        let distortion = stroke.distortion.max(0) as u32;

        let (outer, inner_limit) = match stroke.order {
            ScanOrder::Rows => ((self.y_min + 1).max(0)..self.y_max.min(limit_y), limit_x),
            ScanOrder::Columns => ((self.x_min + 1).max(0)..self.x_max.min(limit_x), limit_y),
        };

        for a in outer {
            for b in 0..inner_limit {
                let (x, y) = match stroke.order {
                    ScanOrder::Rows => (b, a),
                    ScanOrder::Columns => (a, b),
                };
                if !self.in_box(x, y) {
                    continue;
                }
                if self.in_disk(x, y) {
                    raster.set_level(x, y, stroke.level);
                    if one_in(rng, distortion) {
                        match stroke.order {
                            ScanOrder::Rows => self.drift_x(rng, params.border_x, width),
                            ScanOrder::Columns => self.drift_y(rng, params.border_y, height),
                        }
                    }
                } else if stroke.fill_box && !raster.is(x, y, LAND_PRIMARY) {
                    raster.set_level(x, y, WATER_PRIMARY);
                }
            }
        }
    }
}

/// Roll a pass distortion in `[d / 5, d]`.
fn roll_distortion<R: Rng + ?Sized>(rng: &mut R, distortion: i32) -> i32 {
    let fifth = distortion / 5;
    rng.gen_range(0..=fifth * 4) + fifth
}

/// A disk placed at random inside the border and circle margin.
#[derive(Clone, Copy, Debug)]
pub struct Circle {
    pub level: Level,
    /// Exclusive cap on the diameter
    pub max_size: i32,
    pub distortion: i32,
    /// Use `distortion` as is instead of re-rolling it per pass
    pub fixed_distortion: bool,
}

impl Circle {
    /// Place and paint the circle: a row pass, then a column pass from the
    /// same starting box. Returns the box corner and diameter.
    pub fn paint<R: Rng + ?Sized>(
        &self,
        raster: &mut Raster,
        params: &GeneratorParams,
        rng: &mut R,
    ) -> (i32, i32, i32) {
        let (width, height) = (raster.width(), raster.height());
        let margin = params.circle_margin;
        let fit_x = width - 2 * params.border_x - 2 * margin;
        let fit_y = height - 2 * params.border_y - 2 * margin;

        let size = rng
            .gen_range(0..self.max_size)
            .min(fit_x - 1)
            .min(fit_y - 1)
            .max(0);
        let x = rng.gen_range(0..(fit_x - size).max(1)) + params.border_x + margin;
        let y = rng.gen_range(0..(fit_y - size).max(1)) + params.border_y + margin;

        let mut distortion = self.distortion;
        for order in [ScanOrder::Rows, ScanOrder::Columns] {
            if !self.fixed_distortion {
                distortion = roll_distortion(rng, distortion);
            }
            let stroke = Stroke {
                level: self.level,
                distortion,
                order,
                limit: (width, height),
                fill_box: true,
            };
            Disk::new(x, y, size).stamp(raster, params, &stroke, rng);
        }
        (x, y, size)
    }
}
