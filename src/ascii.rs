//! ASCII rendering and export module for maps
//!
//! Provides functions to render a map as plain or ANSI-coloured text and to
//! export a timestamped report.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::error::{MapError, Result};
use crate::islands::island_stats;
use crate::map::{Map, Tile, TileType};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// One letter per tile type, blank water
    Terrain,
    /// Island labels, blank water
    Islands,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Islands => "Islands",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Terrain, AsciiMode::Islands]
    }
}

/// Get ASCII character for a tile type
pub fn terrain_char(kind: TileType) -> char {
    match kind {
        TileType::Water => ' ',
        TileType::Land => 'L',
        TileType::Tree => 'T',
        TileType::Mountain => 'M',
        TileType::Building => 'B',
    }
}

/// Label of the island owning a tile, blank when it has none.
pub fn island_char(map: &Map, tile: &Tile) -> char {
    tile.island()
        .and_then(|id| map.islands().get(id))
        .map_or(' ', |island| island.label())
}

fn tile_char(map: &Map, tile: &Tile, mode: AsciiMode) -> char {
    match mode {
        AsciiMode::Terrain => terrain_char(tile.kind),
        AsciiMode::Islands => island_char(map, tile),
    }
}

/// Render a map to a string, one line per row
pub fn render_ascii_map(map: &Map, mode: AsciiMode) -> String {
    let mut result = String::with_capacity((map.width() + 1) * map.height());

    for row in map.tiles().rows().take(map.height()) {
        for tile in row {
            result.push(tile_char(map, tile, mode));
        }
        result.push('\n');
    }

    result
}

pub fn render_terrain(map: &Map) -> String {
    render_ascii_map(map, AsciiMode::Terrain)
}

/// Tiles without an island (water, or anything before detection) render blank.
pub fn render_islands(map: &Map) -> String {
    render_ascii_map(map, AsciiMode::Islands)
}

/// Print ASCII map to stdout
pub fn print_ascii_map(map: &Map, mode: AsciiMode) {
    print!("{}", render_ascii_map(map, mode));
}

// ============================================================================
// COLORIZED ASCII RENDERING
// ============================================================================

/// Format a single character with ANSI true color (24-bit) - foreground and background
pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Render a colorized map with each tile's colour as background
pub fn render_colored_ascii_map(map: &Map, mode: AsciiMode) -> String {
    // each cell needs ~40 bytes for ANSI codes
    let mut result = String::with_capacity(map.width() * map.height() * 45);

    for row in map.tiles().rows().take(map.height()) {
        for tile in row {
            let bg = (tile.color.r, tile.color.g, tile.color.b);
            // Brightness picks a readable foreground
            let brightness = (bg.0 as u32 * 299 + bg.1 as u32 * 587 + bg.2 as u32 * 114) / 1000;
            let fg = if brightness > 128 { (0, 0, 0) } else { (255, 255, 255) };
            result.push_str(&ansi_colored_char(tile_char(map, tile, mode), fg, bg));
        }
        result.push_str("\x1b[0m\n");
    }

    result
}

/// Print colorized ASCII map to stdout
pub fn print_colored_ascii_map(map: &Map, mode: AsciiMode) {
    print!("{}", render_colored_ascii_map(map, mode));
}

/// Write a report with a header, both renderings and island statistics.
pub fn export_report(map: &Map, seed: Option<u64>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MapError::io(path, e))?;
    write_report(map, seed, BufWriter::new(file)).map_err(|e| MapError::io(path, e))
}

fn write_report(map: &Map, seed: Option<u64>, mut out: impl Write) -> io::Result<()> {
    let total = map.width() * map.height();
    let land = map.iter().filter(|t| !t.is_water()).count();
    let stats = island_stats(map.islands());

    // Header
    writeln!(out, "=== DONUT WORLD MAP ===")?;
    match seed {
        Some(seed) => writeln!(out, "Seed: {}", seed)?,
        None => writeln!(out, "Seed: none")?,
    }
    writeln!(out, "Size: {}x{}", map.width(), map.height())?;
    writeln!(out, "Islands: {}", map.islands().len())?;
    writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    for &mode in AsciiMode::all() {
        writeln!(out, "=== MAP ({} View) ===", mode.name())?;
        write!(out, "{}", render_ascii_map(map, mode))?;
        writeln!(out)?;
    }

    writeln!(out, "=== STATISTICS ===")?;
    writeln!(out, "Total tiles: {}", total)?;
    if total > 0 {
        writeln!(out, "Land: {} ({:.1}%)", land, 100.0 * land as f64 / total as f64)?;
        writeln!(out, "Water: {} ({:.1}%)", total - land, 100.0 * (total - land) as f64 / total as f64)?;
    }
    if stats.count > 0 {
        writeln!(
            out,
            "Island size: smallest {}, largest {}, mean {:.1}",
            stats.smallest, stats.largest, stats.average_size
        )?;
    }

    out.flush()
}
