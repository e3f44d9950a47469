//! Hallways - Entry Point
//!
//! Debug viewer: generates a run of floors, riding the lift between them,
//! and prints each one to the terminal (or as JSON).

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::{Color, Stylize};

use hallways::data::{export_default_params, load_params, load_params_from};
use hallways::world::{Floor, Position};
use hallways::{Session, SessionConfig};

#[derive(Debug, Parser)]
#[command(name = "hallways", version, about = "Generate and inspect lift-connected floors")]
struct Args {
    /// RNG seed for reproducible floors
    #[arg(long)]
    seed: Option<u64>,
    /// Grid columns
    #[arg(long, default_value_t = 40)]
    cols: i32,
    /// Grid rows
    #[arg(long, default_value_t = 30)]
    rows: i32,
    /// Lowest floor number
    #[arg(long, default_value_t = 1)]
    min_floor: i32,
    /// How many floors to generate, starting at the lowest
    #[arg(long, default_value_t = 3)]
    floors: i32,
    /// Generation params file (RON); defaults to the usual config locations
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the default params to this path and exit
    #[arg(long)]
    export_config: Option<PathBuf>,
    /// Print floors as JSON instead of a map
    #[arg(long)]
    json: bool,
    /// Disable colored output
    #[arg(long)]
    plain: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    log::info!("Starting Hallways v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    if let Some(path) = &args.export_config {
        export_default_params(path)
            .with_context(|| format!("exporting params to {}", path.display()))?;
        log::info!("Wrote default params to {}", path.display());
        return Ok(());
    }

    let params = match &args.config {
        Some(path) => load_params_from(path)
            .with_context(|| format!("loading params from {}", path.display()))?,
        None => load_params(),
    };

    let config = SessionConfig {
        cols: args.cols,
        rows: args.rows,
        min_floor: args.min_floor,
        max_floor: args.min_floor + args.floors.max(1) - 1,
        params,
    };
    let mut session = Session::new(config, args.seed);
    let max_floor = session.config().max_floor;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for number in args.min_floor..=max_floor {
        let floor = if number == args.min_floor {
            session.load_floor(number)?
        } else {
            // Walk onto the lift, then ride it up
            let lift = *session.floor().context("no floor loaded")?.lift();
            session.move_player_to(lift.world_x, lift.world_y);
            session.ride_lift(number)?
        };

        if args.json {
            serde_json::to_writer(&mut out, floor)?;
            writeln!(out)?;
        } else {
            print_floor(&mut out, floor, !args.plain)?;
        }
    }

    log::info!("Hallways shut down cleanly");
    Ok(())
}

/// Draw a floor with its lift, spawn and books
fn print_floor(out: &mut impl Write, floor: &Floor, color: bool) -> io::Result<()> {
    let map = floor.map();
    let lift = floor.lift();
    writeln!(
        out,
        "Floor {} - {} rooms, lift at ({}, {}) in room {}",
        floor.floor_number(),
        floor.rooms().len(),
        lift.tile_x,
        lift.tile_y,
        lift.room_id
    )?;

    let book_tiles: Vec<Position> = floor
        .books()
        .iter()
        .filter_map(|b| map.world_to_tile(b.world_x, b.world_y))
        .collect();

    for y in 0..map.height() {
        for x in 0..map.width() {
            let pos = Position::new(x, y);
            let tile = map.tile(x, y).unwrap_or_default();
            let (glyph, (r, g, b)) = if pos == floor.spawn() {
                ('@', (255, 255, 200))
            } else if book_tiles.contains(&pos) {
                ('b', (220, 180, 60))
            } else {
                (tile.glyph(), tile.fg_color())
            };

            if color {
                write!(out, "{}", glyph.with(Color::Rgb { r, g, b }))?;
            } else {
                write!(out, "{}", glyph)?;
            }
        }
        writeln!(out)?;
    }

    for room in floor.rooms() {
        writeln!(
            out,
            "  #{:<2} {:<11} {}x{} at ({}, {})",
            room.id,
            room.room_type.name(),
            room.width,
            room.height,
            room.x,
            room.y
        )?;
    }
    writeln!(out)
}
