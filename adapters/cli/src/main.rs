#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Delve dungeon.

mod autopilot;
mod map;

use anyhow::{Context, Result};
use autopilot::Autopilot;
use clap::Parser;
use delve_core::{Event, WorldConfig};
use delve_world::{self as world, query, World};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Generates a dungeon and drives a scripted explorer through it.
#[derive(Debug, Parser)]
#[command(name = "delve", about = "Headless Delve dungeon simulation", version)]
struct Cli {
    /// Grid width in tiles; even values are bumped to the next odd value.
    #[arg(long, default_value_t = 51)]
    width: u32,

    /// Grid height in tiles; even values are bumped to the next odd value.
    #[arg(long, default_value_t = 51)]
    height: u32,

    /// Level seed; drawn from system entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Side length of a spatial chunk in tiles.
    #[arg(long, default_value_t = 8)]
    chunk_size: u32,

    /// Print the level map before and after the run.
    #[arg(long)]
    map: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Delve command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut config = WorldConfig {
        width: cli.width,
        height: cli.height,
        seed,
        ..WorldConfig::default()
    };
    config.tunables.culling.chunk_size = cli.chunk_size;

    let mut world = World::new(config).with_context(|| {
        format!(
            "failed to build a {}x{} dungeon with chunk size {}",
            cli.width, cli.height, cli.chunk_size
        )
    })?;

    println!("{}", query::welcome_banner(&world));
    println!("seed {seed}");
    if cli.map {
        println!("{}", map::render(&world));
    }

    let summary = simulate(&mut world, cli.ticks, &mut Autopilot::default());
    info!(
        ticks = summary.ticks,
        defeated = summary.defeated,
        chests_opened = summary.chests_opened,
        kills = summary.kills,
        "run finished"
    );

    if cli.map {
        println!("{}", map::render(&world));
    }
    print_summary(&world, &summary);
    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RunSummary {
    ticks: u64,
    defeated: bool,
    chests_opened: u32,
    items_collected: u32,
    kills: u32,
}

fn simulate(world: &mut World, max_ticks: u64, autopilot: &mut Autopilot) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut commands = Vec::new();
    let mut events = Vec::new();

    while summary.ticks < max_ticks && !summary.defeated {
        commands.clear();
        autopilot.plan(world, &mut commands);
        for command in commands.drain(..) {
            events.clear();
            world::apply(world, command, &mut events);
            for event in &events {
                match event {
                    Event::TimeAdvanced { .. } => summary.ticks += 1,
                    Event::PlayerDefeated => summary.defeated = true,
                    Event::ChestOpened { .. } => summary.chests_opened += 1,
                    Event::ItemCollected { .. } => summary.items_collected += 1,
                    Event::NpcDied { .. } => summary.kills += 1,
                    _ => {}
                }
                debug!(?event, "event");
            }
        }
    }
    summary
}

fn print_summary(world: &World, summary: &RunSummary) {
    let hud = query::hud(world);
    let grid = query::tile_grid(world);
    println!("grid {}x{}", grid.width(), grid.height());
    println!(
        "rooms {}, torches {}, chests left {}, npcs left {}",
        query::rooms(world).len(),
        query::torches(world).len(),
        query::chests(world).len(),
        query::npcs(world).len()
    );
    println!(
        "ticks {}, chests opened {}, items collected {}, kills {}",
        summary.ticks, summary.chests_opened, summary.items_collected, summary.kills
    );
    println!(
        "health {}/{}, mana {}/{}",
        hud.health, hud.max_health, hud.mana, hud.max_mana
    );
    let hotbar: Vec<String> = hud
        .slots
        .iter()
        .filter(|slot| !slot.is_empty())
        .map(|slot| format!("{} x{}", slot.kind().name(), slot.count()))
        .collect();
    println!("hotbar [{}]", hotbar.join(", "));
    if summary.defeated {
        println!("the explorer fell");
    }
}
