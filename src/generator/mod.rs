//! Terrain generation pipeline.
//!
//! The generator paints signed levels on an intermediate [`Raster`]:
//! continents (water hexagon, land circle, water bay circle), one ocean
//! split, two rounds of coastal erosion, two rounds of rivers, latitude
//! biomes and colour blending. The finished raster is lowered onto a
//! [`Map`], replacing its tiles.

pub mod biomes;
pub mod ocean;
pub mod params;
pub mod random;
pub mod raster;
pub mod rivers;
pub mod shapes;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::color::Color;
use crate::error::Result;
use crate::map::{Coordinates, Map, Tile, TileType};
use crate::tilemap::Tilemap;

pub use params::GeneratorParams;
pub use raster::{GeneratorTile, Level, Raster};

use raster::{LAND_PRIMARY, WATER_PRIMARY, WATER_SECONDARY};
use shapes::Circle;

/// Terrain generator owning its random source.
pub struct MapGenerator<R = ChaCha8Rng> {
    params: GeneratorParams,
    rng: R,
}

impl MapGenerator<ChaCha8Rng> {
    /// Deterministic generator: the same seed and parameters give the same map.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(GeneratorParams::default(), ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(GeneratorParams::default(), ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> MapGenerator<R> {
    pub fn new(params: GeneratorParams, rng: R) -> Self {
        Self { params, rng }
    }

    pub fn with_params(mut self, params: GeneratorParams) -> Self {
        self.params = params;
        self
    }

    /// Repopulate `map` with fresh terrain, keeping its size.
    ///
    /// The continent count is drawn from `min_continents..max_continents`.
    /// Every tile ends up WATER or LAND and the previous islands are dropped.
    pub fn generate(&mut self, map: &mut Map, min_continents: u32, max_continents: u32) -> Result<()> {
        let raster = self.generate_raster(map.width(), map.height(), min_continents, max_continents)?;
        self.lower(map, &raster);
        Ok(())
    }

    /// Run the pipeline up to colour blending and return the raster.
    pub fn generate_raster(
        &mut self,
        width: usize,
        height: usize,
        min_continents: u32,
        max_continents: u32,
    ) -> Result<Raster> {
        self.params.validate(width, height, min_continents, max_continents)?;

        let params = &self.params;
        let rng = &mut self.rng;
        let mut raster = Raster::new(width, height);

        let continents = rng.gen_range(min_continents..max_continents);
        info!(width, height, continents, "generating terrain");

        let land = Circle {
            level: LAND_PRIMARY,
            max_size: params.land_circle_max_size,
            distortion: params.land_circle_distortion,
            fixed_distortion: false,
        };
        let bay = Circle {
            level: WATER_PRIMARY,
            max_size: params.water_circle_max_size,
            distortion: params.water_circle_distortion,
            fixed_distortion: true,
        };
        for continent in 0..continents {
            shapes::stretched_hexagon(&mut raster, params, rng, WATER_PRIMARY);
            let (x, y, size) = land.paint(&mut raster, params, rng);
            bay.paint(&mut raster, params, rng);
            debug!(continent, x, y, size, "continent placed");
        }
        debug!(land = raster.land_count(), "continents done");

        let (left, right) = ocean::ocean_split(&mut raster, params, rng);
        debug!(left, right, "ocean split");

        let mut carved = 0;
        for _ in 0..2 {
            carved += ocean::coastal_erosion(&mut raster, params, rng);
        }
        debug!(carved, "coastal erosion");

        let mut rivers = 0;
        for _ in 0..2 {
            rivers += rivers::carve_rivers(&mut raster, params, rng);
        }
        debug!(rivers, "rivers carved");

        let classified = biomes::classify_biomes(&mut raster, params, rng);
        biomes::blend_colors(&mut raster);
        debug!(classified, "biomes classified");

        let land = raster.land_count();
        info!(
            land,
            land_percent = 100.0 * land as f64 / (width * height) as f64,
            rivers,
            "terrain generated"
        );

        Ok(raster)
    }

    /// Copy the raster into the map as WATER and LAND tiles.
    fn lower(&mut self, map: &mut Map, raster: &Raster) {
        let mut tiles = Tilemap::new(map.width(), map.height());
        for (x, y, cell) in raster.iter() {
            let (kind, color) = match cell.level {
                WATER_PRIMARY => (
                    TileType::Water,
                    Color::interpolate(Color::WATER1, Color::WATER2, self.rng.gen::<f64>()),
                ),
                WATER_SECONDARY => (TileType::Water, cell.color),
                _ => (TileType::Land, cell.color),
            };
            let at = Coordinates::new(x as i32, y as i32);
            tiles.set(x, y, Tile::with_color(at, kind, color));
        }
        map.replace_tiles(tiles);
    }
}

/// Generate with a freshly entropy-seeded generator and default parameters.
pub fn generate(map: &mut Map, min_continents: u32, max_continents: u32) -> Result<()> {
    MapGenerator::from_entropy().generate(map, min_continents, max_continents)
}
