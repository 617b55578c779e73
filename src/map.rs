//! Public grid model: typed, coloured tiles with an optional island link.
//!
//! The grid owns the island arena produced by the last detection run. Tiles
//! refer to their island by [`IslandId`] rather than by reference, so absorbing
//! an island during detection only rewrites ids.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::color::Color;
use crate::error::{MapError, Result};
use crate::islands::{self, Island, IslandId, Islands};
use crate::tilemap::Tilemap;

/// Signed 2D grid coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Terrain type of a tile. WATER is the empty state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Water,
    Land,
    Tree,
    Mountain,
    Building,
}

impl TileType {
    /// Character used by the grid text format.
    pub fn symbol(self) -> char {
        match self {
            TileType::Water => '.',
            TileType::Land => '+',
            TileType::Tree => '*',
            TileType::Mountain => '^',
            TileType::Building => '@',
        }
    }

    pub fn from_symbol(ch: char) -> Option<TileType> {
        match ch {
            '.' => Some(TileType::Water),
            '+' => Some(TileType::Land),
            '*' => Some(TileType::Tree),
            '^' => Some(TileType::Mountain),
            '@' => Some(TileType::Building),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TileType::Water => "water",
            TileType::Land => "land",
            TileType::Tree => "tree",
            TileType::Mountain => "mountain",
            TileType::Building => "building",
        }
    }

    pub fn default_color(self) -> Color {
        match self {
            TileType::Water => Color::WATER1,
            TileType::Land => Color::LAND1,
            TileType::Tree => Color::TREE,
            TileType::Mountain => Color::MOUNTAIN,
            TileType::Building => Color::BUILDING,
        }
    }

    pub fn is_water(self) -> bool {
        self == TileType::Water
    }
}

/// One grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub coordinates: Coordinates,
    pub kind: TileType,
    pub color: Color,
    pub(crate) island: Option<IslandId>,
}

impl Tile {
    pub fn new(coordinates: Coordinates, kind: TileType) -> Self {
        Self::with_color(coordinates, kind, kind.default_color())
    }

    pub fn with_color(coordinates: Coordinates, kind: TileType, color: Color) -> Self {
        Self {
            coordinates,
            kind,
            color,
            island: None,
        }
    }

    /// The tile reported for any position outside the grid.
    pub fn off_map(coordinates: Coordinates) -> Self {
        Self::new(coordinates, TileType::Water)
    }

    /// Island this tile belonged to at the last detection run.
    pub fn island(&self) -> Option<IslandId> {
        self.island
    }

    pub fn is_water(&self) -> bool {
        self.kind.is_water()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::new(Coordinates::default(), TileType::Water)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile {{ {}, type={} }}", self.coordinates, self.kind.display_name())
    }
}

/// Rectangular grid of tiles plus the islands found by the last detection.
#[derive(Clone, Debug)]
pub struct Map {
    tiles: Tilemap<Tile>,
    islands: Islands,
}

impl Map {
    /// An all-water map.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            tiles: water_tiles(width, height),
            islands: Islands::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub(crate) fn tiles(&self) -> &Tilemap<Tile> {
        &self.tiles
    }

    /// Read a tile. Off-grid positions yield a fresh water tile with no island.
    pub fn get(&self, x: i32, y: i32) -> Tile {
        match self.tiles.try_get(x, y) {
            Some(tile) => *tile,
            None => Tile::off_map(Coordinates::new(x, y)),
        }
    }

    /// Mutable access to an in-bounds tile.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.tiles.try_get_mut(x, y)
    }

    /// Overwrite a tile with `kind` and that type's default colour.
    pub fn set(&mut self, x: usize, y: usize, kind: TileType) -> Result<()> {
        self.set_with_color(x, y, kind, kind.default_color())
    }

    /// Overwrite a tile's type and colour, clearing its island link.
    ///
    /// The tile also leaves its island's member list. Connectivity of the
    /// remaining islands is only refreshed by [`Map::find_islands`].
    pub fn set_with_color(&mut self, x: usize, y: usize, kind: TileType, color: Color) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(MapError::Bounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }

        let coordinates = Coordinates::new(x as i32, y as i32);
        if let Some(id) = self.tiles.get(x, y).island {
            self.islands.release(id, coordinates);
        }
        self.tiles.set(x, y, Tile::with_color(coordinates, kind, color));
        Ok(())
    }

    /// Turn every tile back into default water and drop all islands.
    pub fn reset(&mut self) {
        self.tiles = water_tiles(self.width(), self.height());
        self.islands = Islands::default();
    }

    /// Replace this map with the contents of a grid text file.
    ///
    /// On failure the map is left unchanged.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        *self = Map::from_file(path)?;
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Map> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
        let map = Map::parse(&text)?;
        info!(
            path = %path.display(),
            width = map.width(),
            height = map.height(),
            "loaded map"
        );
        Ok(map)
    }

    /// Parse the grid text format.
    ///
    /// One line per row, one character per column. Rows shorter than the
    /// longest row are padded with water. Text without any tile parses to
    /// an empty 0x0 map.
    pub fn parse(text: &str) -> Result<Map> {
        let mut rows: Vec<Vec<Tile>> = Vec::new();

        for (y, line) in text.lines().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (column, ch) in line.chars().enumerate() {
                if ch == '\r' || ch == '\n' {
                    continue;
                }
                let kind = TileType::from_symbol(ch).ok_or(MapError::Parse {
                    row: y + 1,
                    column: column + 1,
                    found: ch,
                })?;
                let coordinates = Coordinates::new(row.len() as i32, y as i32);
                row.push(Tile::new(coordinates, kind));
            }
            rows.push(row);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        // blank lines alone carry no tiles
        if width == 0 {
            rows.clear();
        }
        for (y, row) in rows.iter_mut().enumerate() {
            while row.len() < width {
                let coordinates = Coordinates::new(row.len() as i32, y as i32);
                row.push(Tile::new(coordinates, TileType::Water));
            }
        }

        Ok(Map {
            tiles: Tilemap::from_rows(width, rows),
            islands: Islands::default(),
        })
    }

    /// Grid text format, one line per row.
    pub fn to_text(&self) -> String {
        let mut result = String::with_capacity((self.width() + 1) * self.height());
        for row in self.tiles.rows() {
            result.extend(row.iter().map(|tile| tile.kind.symbol()));
            result.push('\n');
        }
        result
    }

    /// Write the grid text format. Colours are not part of this format;
    /// see [`crate::export::save_snapshot`] for a lossless dump.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_text()).map_err(|e| MapError::io(path, e))?;
        debug!(path = %path.display(), "saved map");
        Ok(())
    }

    /// Detect islands, replacing the result of any previous run.
    /// Returns the number of islands found.
    pub fn find_islands(&mut self) -> usize {
        for (_, _, tile) in self.tiles.iter_mut() {
            tile.island = None;
        }
        self.islands = islands::detect_islands(&mut self.tiles);
        self.islands.len()
    }

    /// Islands from the last detection run.
    pub fn islands(&self) -> &Islands {
        &self.islands
    }

    /// Island owning the tile at `(x, y)`, if any.
    pub fn island_at(&self, x: i32, y: i32) -> Option<&Island> {
        self.tiles
            .try_get(x, y)
            .and_then(|tile| tile.island)
            .and_then(|id| self.islands.get(id))
    }

    /// Iterate over all tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().map(|(_, _, tile)| tile)
    }

    pub(crate) fn replace_tiles(&mut self, tiles: Tilemap<Tile>) {
        self.tiles = tiles;
        self.islands = Islands::default();
    }
}

impl FromStr for Map {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Map::parse(s)
    }
}

fn water_tiles(width: usize, height: usize) -> Tilemap<Tile> {
    let mut tiles = Tilemap::new(width, height);
    for (x, y, tile) in tiles.iter_mut() {
        *tile = Tile::new(Coordinates::new(x as i32, y as i32), TileType::Water);
    }
    tiles
}
