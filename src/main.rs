//! # Palisade
//!
//! Command line front end: builds one fort into a fresh zone and prints a
//! summary of what went up.

use clap::Parser;
use log::{info, warn};
use palisade::generation::utils::{create_rng, session_rng};
use palisade::{
    config, unreachable_rooms, FortMaker, FortProfile, PalisadeError, PalisadeResult,
    PopulationTables, Zone,
};
use std::path::PathBuf;

#[cfg(feature = "dev-tools")]
use tracing::Level;

/// Command line arguments for the fort generator.
#[derive(Parser, Debug)]
#[command(name = "palisade")]
#[command(about = "Procedural fort generation for roguelike zones")]
#[command(version)]
struct Args {
    /// Random seed for generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// World seed string, salted into a session seed (ignored with --seed)
    #[arg(long)]
    world_seed: Option<String>,

    /// Built-in fort profile (joppa, robots)
    #[arg(short, long, default_value = "joppa")]
    profile: String,

    /// Fort profile JSON file, overrides --profile
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Population tables JSON file, replaces the built-in tables
    #[arg(short, long)]
    tables: Option<PathBuf>,

    /// Zone width in cells
    #[arg(long, default_value_t = config::DEFAULT_ZONE_WIDTH)]
    width: u32,

    /// Zone height in cells
    #[arg(long, default_value_t = config::DEFAULT_ZONE_HEIGHT)]
    height: u32,

    /// Zone tier used for population tables
    #[arg(long, default_value_t = 1)]
    tier: u32,

    /// Print a glyph map of the finished zone
    #[arg(long)]
    map: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> PalisadeResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Palisade v{}", palisade::VERSION);

    let profile = match &args.config {
        Some(path) => FortProfile::load(path)?,
        None => FortProfile::named(&args.profile).ok_or_else(|| {
            PalisadeError::InvalidConfig(format!("unknown fort profile '{}'", args.profile))
        })?,
    };

    let tables = match &args.tables {
        Some(path) => PopulationTables::load(path)?,
        None => PopulationTables::builtin(),
    };

    let mut rng = match (args.seed, &args.world_seed) {
        (Some(seed), _) => create_rng(seed),
        (None, Some(world_seed)) => session_rng(world_seed),
        (None, None) => create_rng(rand::random()),
    };

    let maker = FortMaker::with_resolver(profile, tables);
    let mut zone = Zone::new(args.width, args.height, args.tier);
    let layout = maker.build(&mut zone, &mut rng)?;

    println!("{} fort", maker.profile().faction);
    println!(
        "  footprint: ({}, {}) to ({}, {}), {}x{}",
        layout.footprint.x1,
        layout.footprint.y1,
        layout.footprint.x2,
        layout.footprint.y2,
        layout.footprint.width(),
        layout.footprint.height()
    );
    println!(
        "  rooms: {} ({} with partitions)",
        layout.rooms.len(),
        layout.rooms.iter().filter(|room| room.structured).count()
    );
    println!("  room doors: {}", layout.room_doors.len());
    println!("  entrances: {}", layout.fort_doors.len());
    println!("  inhabitants and loot: {}", layout.population);
    println!("  campfires: {}", layout.campfires.len());
    println!("  storage: {}", layout.crates.len());
    println!(
        "  defenses: {} turrets, {} power sources",
        layout.turrets, layout.power_sources
    );

    let unreachable = unreachable_rooms(&zone, &layout);
    if !unreachable.is_empty() {
        warn!("rooms unreachable from any entrance: {:?}", unreachable);
    }

    if args.map {
        println!();
        print!("{}", zone.to_glyph_map());
    }

    Ok(())
}

/// Initializes logging based on the specified log level.
fn initialize_logging(log_level: &str) -> PalisadeResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let filter: log::LevelFilter = log_level.parse().map_err(|_| {
            PalisadeError::InvalidConfig(format!("unknown log level '{}'", log_level))
        })?;

        env_logger::Builder::new()
            .filter_level(filter)
            .format_target(false)
            .init();
    }

    Ok(())
}
