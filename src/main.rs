use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use donut_world::ascii::{self, AsciiMode};
use donut_world::{export, island_stats, GeneratorParams, Map, MapGenerator};

#[derive(Parser, Debug)]
#[command(name = "donut_world")]
#[command(about = "Generate continent maps and detect their islands")]
struct Args {
    /// Width of the map in tiles
    #[arg(short = 'W', long, default_value = "512")]
    width: usize,

    /// Height of the map in tiles
    #[arg(short = 'H', long, default_value = "512")]
    height: usize,

    /// Lowest continent count (inclusive)
    #[arg(long, default_value = "600")]
    min_continents: u32,

    /// Highest continent count (exclusive)
    #[arg(long, default_value = "800")]
    max_continents: u32,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generator parameter overrides as JSON
    #[arg(long)]
    params: Option<PathBuf>,

    /// Load a map text file instead of generating one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the map as text
    #[arg(long)]
    save: Option<PathBuf>,

    /// Export tile colours as PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Export tile colours as a plain-text PNM (P3) image
    #[arg(long)]
    pnm: Option<PathBuf>,

    /// Export island membership as PNG
    #[arg(long)]
    islands_png: Option<PathBuf>,

    /// Save a JSON snapshot (keeps tile colours)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write a text report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the terrain to stdout
    #[arg(long)]
    print: bool,

    /// Print island labels to stdout
    #[arg(long)]
    print_islands: bool,

    /// Use ANSI true colour when printing
    #[arg(long)]
    color: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so stdout stays the map output; override via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("donut_world=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (mut map, seed) = match &args.load {
        Some(path) => (Map::from_file(path)?, None),
        None => {
            let params = match &args.params {
                Some(path) => GeneratorParams::from_json_file(path)?,
                None => GeneratorParams::default(),
            };
            let seed = args.seed.unwrap_or_else(|| rand::random());
            info!(seed, width = args.width, height = args.height, "generating map");

            let mut map = Map::new(args.width, args.height);
            MapGenerator::new(params, ChaCha8Rng::seed_from_u64(seed)).generate(
                &mut map,
                args.min_continents,
                args.max_continents,
            )?;
            (map, Some(seed))
        }
    };

    let count = map.find_islands();
    let stats = island_stats(map.islands());
    info!(
        islands = count,
        land_tiles = stats.total_tiles,
        largest = stats.largest,
        "islands detected"
    );

    if args.print {
        print_map(&map, AsciiMode::Terrain, args.color);
    }
    if args.print_islands {
        print_map(&map, AsciiMode::Islands, args.color);
    }

    if let Some(path) = &args.save {
        map.save(path)?;
    }
    if let Some(path) = &args.png {
        export::export_png(&map, path)?;
    }
    if let Some(path) = &args.pnm {
        export::export_pnm(&map, path)?;
    }
    if let Some(path) = &args.islands_png {
        export::export_island_png(&map, path)?;
    }
    if let Some(path) = &args.snapshot {
        export::save_snapshot(&map, path)?;
    }
    if let Some(path) = &args.report {
        ascii::export_report(&map, seed, path)?;
    }

    println!("{} islands", count);
    Ok(())
}

fn print_map(map: &Map, mode: AsciiMode, color: bool) {
    if color {
        ascii::print_colored_ascii_map(map, mode);
    } else {
        ascii::print_ascii_map(map, mode);
    }
}
