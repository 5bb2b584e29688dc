//! Headless arena run
//!
//! Loads optional settings, populates a level with the player ship and a ring
//! of asteroids, then runs a fixed number of frames against a counting
//! renderer and logs what happened.
//!
//! Usage: `arena_demo [config.toml|config.ron] [frames]`

mod arena;
mod entities;
mod renderer;

use arcade_engine::foundation::logging::{self, LevelFilter};
use arcade_engine::prelude::*;
use arena::{SharedStats, ARENA_HALF_EXTENT};
use entities::{random_drift, Asteroid, AsteroidSize, Ship};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use renderer::CountingRenderer;
use thiserror::Error;

const DEFAULT_FRAMES: u64 = 600;
const ASTEROID_COUNT: usize = 6;
const ASTEROID_SEED: u64 = 0x5EED;

/// Demo errors
#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("Invalid frame count: {0}")]
    Frames(#[from] std::num::ParseIntError),
}

fn populate(level: &mut World, stats: &SharedStats) -> Result<(), DemoError> {
    let ship = Ship::spawn(level.scene_mut(), Vec2::zeros(), stats)?;
    level.create(Box::new(ship));

    let mut rng = StdRng::seed_from_u64(ASTEROID_SEED);
    for _ in 0..ASTEROID_COUNT {
        let distance = rng.gen_range(150.0..ARENA_HALF_EXTENT);
        let position = from_heading(rng.gen_range(0.0..std::f64::consts::TAU)) * distance;
        let velocity = random_drift(&mut rng);
        let asteroid = Asteroid::spawn(level.scene_mut(), position, velocity, AsteroidSize::Large, &mut rng, stats)?;
        level.create(Box::new(asteroid));
    }

    let report = level.flush()?;
    log::info!("Level populated with {} entities", report.created.len());
    level.log_hierarchy();
    Ok(())
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            log::info!("Loading settings from {}", path);
            SimulationConfig::load_from_file(&path)?
        }
        None => SimulationConfig::default(),
    };
    let frames = args.next().map(|arg| arg.parse::<u64>()).transpose()?.unwrap_or(DEFAULT_FRAMES);

    let mut sim = Simulation::new(config)?;
    let stats = SharedStats::default();
    populate(sim.load_level(), &stats)?;

    let mut renderer = CountingRenderer::default();
    let ran = sim.run_frames(frames, &mut renderer)?;

    let stats = stats.borrow();
    log::info!("Frames run: {}", ran);
    log::info!(
        "Shots fired: {}, ship hits: {}, asteroids destroyed: {}, kills credited: {}",
        stats.shots_fired,
        stats.ship_hits,
        stats.asteroids_destroyed,
        stats.kills_credited
    );
    log::info!(
        "Draw calls: {} ({} polygons, {} lines, {} circles)",
        renderer.total(),
        renderer.polygons,
        renderer.lines,
        renderer.circles
    );
    if let Some(level) = sim.level() {
        let player_alive = level.player().is_some_and(|player| level.is_alive(player));
        log::info!("Entities alive: {}, player alive: {}", level.len(), player_alive);
    }
    Ok(())
}

fn main() {
    logging::init(LevelFilter::Info);
    log::info!("Starting arena demo");

    if let Err(e) = run() {
        log::error!("Arena demo failed: {}", e);
        std::process::exit(1);
    }
    log::info!("Arena demo completed successfully");
}
