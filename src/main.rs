//! Slimebrawl main entry point.
//!
//! Loads the configuration, assets and prefabs, sets up the demo scene and
//! drives the world once per frame. Without the `raylib` feature (or with
//! `--headless`) the frames are drawn into a recording canvas and the run
//! ends after `--frames` frames or when one side is wiped out.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 1200
//! cargo run --release --features raylib
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use slimebrawl::error::EngineResult;
use slimebrawl::game;
use slimebrawl::resources::gameconfig::{DEFAULT_CONFIG_PATH, GameConfig};
use slimebrawl::systems::render::{Canvas, Color, RecordingCanvas};
use slimebrawl::world::World;

/// Slimebrawl: slimes versus enemies on a single lane.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Run without a window even when built with the raylib backend.
    #[arg(long)]
    headless: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> EngineResult<()> {
    let config = GameConfig::load_or_default(&cli.config)?;
    let (mut world, mut builder) = game::load(&config)?;
    game::setup(&mut world, &mut builder, config.canvas_width as f32)?;
    world.start()?;

    #[cfg(feature = "raylib")]
    if !cli.headless {
        return run_window(&mut world, &config);
    }
    #[cfg(not(feature = "raylib"))]
    if !cli.headless {
        info!("Built without the raylib feature, running headless");
    }

    run_headless(&mut world, &config, cli.frames)
}

fn run_headless(world: &mut World, config: &GameConfig, frames: u64) -> EngineResult<()> {
    let mut canvas = RecordingCanvas::new(config.canvas_width as f32, config.canvas_height as f32);
    let dt = config.frame_delta();
    for _ in 0..frames {
        world.poll_textures(&mut canvas);
        canvas.clear(Color::BLACK);
        world.tick(dt, &mut canvas)?;
        if game::is_over(world) {
            break;
        }
    }
    let (slimes, enemies) = game::survivors(world);
    info!(
        "Stopped after {} frames ({:.1}s): {} slimes, {} enemies standing, {} draw calls in last frame",
        world.time().frame_count,
        world.time().elapsed,
        slimes,
        enemies,
        canvas.commands.len()
    );
    Ok(())
}

#[cfg(feature = "raylib")]
fn run_window(world: &mut World, config: &GameConfig) -> EngineResult<()> {
    use slimebrawl::systems::raylib_backend::{RaylibCanvas, RaylibImages};

    let (mut rl, thread) = raylib::init()
        .size(config.canvas_width as i32, config.canvas_height as i32)
        .title("Slimebrawl")
        .build();
    rl.set_target_fps(config.target_fps);
    let mut images = RaylibImages::default();

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        {
            let mut uploader = images.uploader(&mut rl, &thread);
            world.poll_textures(&mut uploader);
        }
        world.update(dt)?;

        let mut d = rl.begin_drawing(&thread);
        let mut canvas = RaylibCanvas {
            d: &mut d,
            images: &images,
            height: config.canvas_height as f32,
        };
        canvas.clear(Color::BLACK);
        world.draw(&mut canvas)?;
    }
    let (slimes, enemies) = game::survivors(world);
    info!("Window closed: {} slimes, {} enemies standing", slimes, enemies);
    Ok(())
}
