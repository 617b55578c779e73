//! Terrain generator parameters and validation

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Every tunable constant of the generation pipeline.
///
/// Defaults are tuned for 512x512 grids. Missing keys in a
/// JSON override fall back to these defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    // =========================================================================
    // Borders
    // =========================================================================
    /// Cells excluded on the left and right edge
    pub border_x: i32,
    /// Cells excluded on the top and bottom edge
    pub border_y: i32,

    // =========================================================================
    // Continents
    // =========================================================================
    /// Rows kept free below the hexagon core
    pub hexagon_buffer: i32,
    /// Edge jitter strength (0-99, jitter chance is 1 in `100 - distortion`)
    pub hexagon_distortion: i32,
    /// How square the lower cap stays (skewed nudge chance is 1 in `rigidity + 1`)
    pub hexagon_rigidity: i32,
    /// Exclusive cap on the land circle diameter
    pub land_circle_max_size: i32,
    /// Upper bound of the land circle distortion, re-rolled per pass
    pub land_circle_distortion: i32,
    /// Exclusive cap on the bay circle diameter
    pub water_circle_max_size: i32,
    /// Fixed bay circle distortion
    pub water_circle_distortion: i32,
    /// Margin kept between circles and the border on every side
    pub circle_margin: i32,

    // =========================================================================
    // Ocean split
    // =========================================================================
    pub ocean_margin_left: i32,
    pub ocean_margin_right: i32,
    pub ocean_min_width: i32,
    pub ocean_max_width: i32,
    /// Largest absolute per-row drift
    pub ocean_max_angle: i32,
    /// 1 in N chance per band cell of an edge jitter
    pub ocean_jitter_chance: u32,
    /// 1 in N chance per row of a new drift angle
    pub ocean_angle_chance: u32,

    // =========================================================================
    // Coastal erosion
    // =========================================================================
    pub erosion_chance: u32,
    pub erosion_min_size: i32,
    pub erosion_max_size: i32,
    pub erosion_distortion: i32,
    /// Cells left untouched before the right and bottom border
    pub scan_margin: i32,

    // =========================================================================
    // Rivers
    // =========================================================================
    pub river_chance: u32,
    pub river_min_length: u32,
    pub river_max_length: u32,
    /// Direction skews are drawn from 1..=river_max_skew
    pub river_max_skew: i32,

    // =========================================================================
    // Biomes
    // =========================================================================
    /// Rows from each pole where the latitude pass starts
    pub polar_margin: i32,
    /// Level added or removed per latitude step
    pub biome_step: i32,
    /// Highest level the latitude accumulator reaches
    pub biome_cap: i32,
    /// 1 in N chance per column of moving the equator or a cap boundary
    pub latitude_walk_chance: u32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            border_x: 1,
            border_y: 1,

            hexagon_buffer: 30,
            hexagon_distortion: 80,
            hexagon_rigidity: 2,
            land_circle_max_size: 300,
            land_circle_distortion: 100,
            water_circle_max_size: 150,
            water_circle_distortion: 90,
            circle_margin: 50,

            ocean_margin_left: 100,
            ocean_margin_right: 200,
            ocean_min_width: 50,
            ocean_max_width: 150,
            ocean_max_angle: 3,
            ocean_jitter_chance: 5,
            ocean_angle_chance: 10,

            erosion_chance: 30,
            erosion_min_size: 5,
            erosion_max_size: 20,
            erosion_distortion: 3,
            scan_margin: 10,

            river_chance: 8,
            river_min_length: 65,
            river_max_length: 128,
            river_max_skew: 10,

            polar_margin: 75,
            biome_step: 3,
            biome_cap: 498,
            latitude_walk_chance: 7,
        }
    }
}

impl GeneratorParams {
    /// Scaled-down margins and shapes for small grids (down to about 64x64).
    pub fn compact() -> Self {
        Self {
            hexagon_buffer: 6,
            land_circle_max_size: 40,
            water_circle_max_size: 20,
            circle_margin: 6,
            ocean_margin_left: 12,
            ocean_margin_right: 24,
            ocean_min_width: 4,
            ocean_max_width: 12,
            ocean_max_angle: 1,
            erosion_min_size: 3,
            erosion_max_size: 8,
            scan_margin: 4,
            river_min_length: 10,
            river_max_length: 24,
            polar_margin: 8,
            ..Self::default()
        }
    }

    /// Load parameters from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Smallest (width, height) these parameters can lay shapes out on.
    ///
    /// Sizes that do not fit a `usize` saturate, so oversized margins fail
    /// validation instead of overflowing.
    pub fn minimum_size(&self) -> (usize, usize) {
        let (bx, by) = (i64::from(self.border_x), i64::from(self.border_y));
        let scan = i64::from(self.scan_margin);
        let circle = 2 * i64::from(self.circle_margin) + 1;
        let ocean = i64::from(self.ocean_margin_left) + i64::from(self.ocean_margin_right);

        let width = (2 * bx + ocean.max(circle) + 1).max(2 * bx + scan + 2);
        let height = (2 * by + i64::from(self.hexagon_buffer).max(circle) + 1).max(2 * by + scan + 2);
        let to_size = |n: i64| usize::try_from(n.max(1)).unwrap_or(usize::MAX);
        (to_size(width), to_size(height))
    }

    /// Check the parameters against a grid size and continent range.
    pub fn validate(
        &self,
        width: usize,
        height: usize,
        min_continents: u32,
        max_continents: u32,
    ) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(MapError::Configuration(format!(
                "map dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if min_continents >= max_continents {
            return Err(MapError::Configuration(format!(
                "continent range {}..{} is empty",
                min_continents, max_continents
            )));
        }

        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(MapError::Configuration(format!(
                "map dimensions {}x{} are too large",
                width, height
            )));
        };
        let (short, long) = (w.min(h), w.max(h));

        let checks = [
            (self.border_x >= 0 && self.border_y >= 0, "borders must not be negative"),
            ((0..=100).contains(&self.hexagon_distortion), "hexagon_distortion must lie in 0..=100"),
            (self.hexagon_buffer >= 0, "hexagon_buffer must not be negative"),
            (self.hexagon_rigidity >= 0, "hexagon_rigidity must not be negative"),
            (
                self.land_circle_max_size > 0 && self.land_circle_max_size <= long,
                "land_circle_max_size must lie between 1 and the map size",
            ),
            (
                self.water_circle_max_size > 0 && self.water_circle_max_size <= long,
                "water_circle_max_size must lie between 1 and the map size",
            ),
            (self.land_circle_distortion > 0, "land_circle_distortion must be positive"),
            (self.water_circle_distortion > 0, "water_circle_distortion must be positive"),
            (self.circle_margin >= 0, "circle_margin must not be negative"),
            (self.ocean_margin_left >= 0 && self.ocean_margin_right >= 0, "ocean margins must not be negative"),
            (
                self.ocean_min_width >= 0 && self.ocean_min_width < self.ocean_max_width,
                "ocean width range is empty",
            ),
            (self.ocean_max_width <= w, "ocean_max_width must not exceed the map width"),
            (
                (0..=w).contains(&self.ocean_max_angle),
                "ocean_max_angle must lie between 0 and the map width",
            ),
            (
                self.erosion_min_size > 0 && self.erosion_min_size < self.erosion_max_size,
                "erosion size range is empty",
            ),
            (
                self.erosion_max_size <= short,
                "erosion_max_size must not exceed the shorter map side",
            ),
            (self.erosion_distortion > 0, "erosion_distortion must be positive"),
            (self.scan_margin >= 0, "scan_margin must not be negative"),
            (
                self.river_min_length > 0 && self.river_min_length <= self.river_max_length,
                "river length range is empty",
            ),
            (
                (1..=12).contains(&self.river_max_skew),
                "river_max_skew must lie in 1..=12",
            ),
            ((0..=h).contains(&self.polar_margin), "polar_margin must lie between 0 and the map height"),
            (self.biome_step > 0 && self.biome_cap > 0, "biome_step and biome_cap must be positive"),
            (
                self.biome_cap.checked_add(self.biome_step).is_some(),
                "biome_cap + biome_step overflows",
            ),
        ];
        if let Some((_, message)) = checks.iter().find(|(ok, _)| !ok) {
            return Err(MapError::Configuration(message.to_string()));
        }

        let (min_width, min_height) = self.minimum_size();
        if width < min_width || height < min_height {
            return Err(MapError::Configuration(format!(
                "map {}x{} is smaller than the {}x{} these parameters need",
                width, height, min_width, min_height
            )));
        }

        Ok(())
    }
}
