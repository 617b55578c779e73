//! Image and snapshot export.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::color::Color;
use crate::error::{MapError, Result};
use crate::map::{Map, TileType};

/// Render tile colours, one pixel per tile.
pub fn render_map(map: &Map) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(map.width() as u32, map.height() as u32);

    for y in 0..map.height() {
        for x in 0..map.width() {
            let tile = map.get(x as i32, y as i32);
            img.put_pixel(x as u32, y as u32, Rgb(tile.color.to_array()));
        }
    }

    img
}

/// Export tile colours as a PNG (or any format `image` infers from the extension).
pub fn export_png(map: &Map, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    render_map(map).save(path)?;
    info!(path = %path.display(), "exported map image");
    Ok(())
}

/// Stable, reasonably distinct colour for the n-th island.
pub fn island_color(index: u32) -> Color {
    // Knuth multiplicative hash spreads consecutive indices apart
    let hash = index.wrapping_add(1).wrapping_mul(2_654_435_761);
    let [r, g, b, _] = hash.to_le_bytes();
    // keep islands away from the dark water blues
    Color::new(r | 0x40, g | 0x40, b & 0xbf)
}

/// Render island membership: each island in its palette colour, water and
/// unlinked tiles in WATER1.
pub fn render_islands(map: &Map) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::from_pixel(
        map.width() as u32,
        map.height() as u32,
        Rgb(Color::WATER1.to_array()),
    );

    for (index, island) in map.islands().iter().enumerate() {
        let color = Rgb(island_color(index as u32).to_array());
        for c in island.members() {
            img.put_pixel(c.x as u32, c.y as u32, color);
        }
    }

    img
}

pub fn export_island_png(map: &Map, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    render_islands(map).save(path)?;
    info!(path = %path.display(), islands = map.islands().len(), "exported island image");
    Ok(())
}

/// Write tile colours as a plain-text PNM (P3) image.
pub fn export_pnm(map: &Map, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MapError::io(path, e))?;
    let mut out = BufWriter::new(file);

    let write = |out: &mut BufWriter<File>| -> std::io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", map.width(), map.height())?;
        writeln!(out, "255")?;
        for y in 0..map.height() {
            let row: Vec<String> = (0..map.width())
                .map(|x| {
                    let c = map.get(x as i32, y as i32).color;
                    format!("{} {} {}", c.r, c.g, c.b)
                })
                .collect();
            writeln!(out, "{}", row.join(" "))?;
        }
        out.flush()
    };
    write(&mut out).map_err(|e| MapError::io(path, e))
}

// ============================================================================
// JSON SNAPSHOTS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub kind: TileType,
    pub color: Color,
}

/// Lossless map dump: unlike the text format it keeps every tile colour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major
    pub tiles: Vec<TileSnapshot>,
}

impl MapSnapshot {
    pub fn capture(map: &Map) -> Self {
        Self {
            width: map.width(),
            height: map.height(),
            tiles: map
                .iter()
                .map(|t| TileSnapshot { kind: t.kind, color: t.color })
                .collect(),
        }
    }

    /// Build a map from the snapshot. Islands are not part of a snapshot.
    pub fn restore(&self) -> Result<Map> {
        self.width
            .checked_mul(self.height)
            .filter(|&count| count == self.tiles.len())
            .ok_or_else(|| {
                MapError::Configuration(format!(
                    "snapshot holds {} tiles for a {}x{} map",
                    self.tiles.len(),
                    self.width,
                    self.height
                ))
            })?;

        let mut map = Map::new(self.width, self.height);
        for (index, tile) in self.tiles.iter().enumerate() {
            let (x, y) = (index % self.width, index / self.width);
            map.set_with_color(x, y, tile.kind, tile.color)?;
        }
        Ok(map)
    }
}

pub fn save_snapshot(map: &Map, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MapError::io(path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, &MapSnapshot::capture(map))?;
    out.flush().map_err(|e| MapError::io(path, e))?;
    debug!(path = %path.display(), "saved snapshot");
    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Map> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
    let snapshot: MapSnapshot = serde_json::from_str(&text)?;
    let map = snapshot.restore()?;
    info!(path = %path.display(), width = map.width(), height = map.height(), "loaded snapshot");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Map {
        let mut map = Map::parse("+..\n.^+\n").unwrap();
        map.set_with_color(2, 1, TileType::Land, Color::new(12, 34, 56)).unwrap();
        map
    }

    #[test]
    fn test_render_map_pixels() {
        let img = render_map(&sample());
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, Color::LAND1.to_array());
        assert_eq!(img.get_pixel(1, 0).0, Color::WATER1.to_array());
        assert_eq!(img.get_pixel(2, 1).0, [12, 34, 56]);
    }

    #[test]
    fn test_export_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        export_png(&sample(), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [12, 34, 56]);
    }

    #[test]
    fn test_island_image() {
        let mut map = Map::parse("+.+\n").unwrap();
        map.find_islands();
        let img = render_islands(&map);
        assert_eq!(img.get_pixel(1, 0).0, Color::WATER1.to_array());
        assert_eq!(img.get_pixel(0, 0).0, island_color(0).to_array());
        assert_eq!(img.get_pixel(2, 0).0, island_color(1).to_array());
        assert_ne!(island_color(0), island_color(1));
        assert_ne!(island_color(0), Color::WATER1);
    }

    #[test]
    fn test_island_image_after_edit() {
        let mut map = Map::parse("++\n").unwrap();
        map.find_islands();
        map.set(1, 0, TileType::Water).unwrap();

        let img = render_islands(&map);
        assert_eq!(img.get_pixel(0, 0).0, island_color(0).to_array());
        assert_eq!(img.get_pixel(1, 0).0, Color::WATER1.to_array());
    }

    #[test]
    fn test_pnm_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.pnm");
        export_pnm(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], &["P3", "3 2", "255"]);
        assert_eq!(lines.len(), 5);
        assert!(lines[4].ends_with("12 34 56"));
    }

    #[test]
    fn test_snapshot_keeps_colors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        let map = sample();
        save_snapshot(&map, &path).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.width(), 3);
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.get(2, 1).color, Color::new(12, 34, 56));
        assert_eq!(loaded.get(1, 1).kind, TileType::Mountain);
        assert_eq!(MapSnapshot::capture(&loaded), MapSnapshot::capture(&map));
    }

    #[test]
    fn test_snapshot_size_mismatch() {
        let snapshot = MapSnapshot {
            width: 2,
            height: 2,
            tiles: vec![TileSnapshot { kind: TileType::Land, color: Color::LAND1 }],
        };
        assert!(matches!(snapshot.restore(), Err(MapError::Configuration(_))));
    }

    #[test]
    fn test_snapshot_with_overflowing_size() {
        let snapshot = MapSnapshot {
            width: usize::MAX,
            height: 2,
            tiles: Vec::new(),
        };
        assert!(matches!(snapshot.restore(), Err(MapError::Configuration(_))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();
        assert!(matches!(load_snapshot(&path), Err(MapError::Configuration(_))));
    }

    #[test]
    fn test_snapshot_file_is_complete_on_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        save_snapshot(&sample(), &path).unwrap();

        // the whole document is on disk once the call returns
        let text = fs::read_to_string(&path).unwrap();
        let snapshot: MapSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(snapshot, MapSnapshot::capture(&sample()));
    }

    #[test]
    fn test_snapshot_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("map.json");
        assert!(matches!(save_snapshot(&sample(), &path), Err(MapError::Io { .. })));
    }

    #[test]
    fn test_snapshot_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(load_snapshot(&path), Err(MapError::Json(_))));
        assert!(matches!(
            load_snapshot(dir.path().join("missing.json")),
            Err(MapError::Io { .. })
        ));
    }
}
