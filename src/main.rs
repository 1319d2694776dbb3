//! Galaxy Run headless driver
//!
//! Stands in for a presentation layer: runs the simulation thread, plays a scripted
//! session against it and logs what comes back.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use galaxy_run::platform::input::{ExternalInput, MotionPhase, SensorReading};
use galaxy_run::platform::time::SystemClock;
use galaxy_run::runner::GameRunner;
use galaxy_run::ui::shoot_button_bounds;
use galaxy_run::{GameState, Settings};

#[derive(Parser, Debug)]
#[command(name = "galaxy-run")]
#[command(about = "Run a scripted headless Galaxy Run session")]
struct Args {
    /// Settings JSON file (defaults are used for missing fields)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames even if the game is still running
    #[arg(long, default_value_t = 3600)]
    max_frames: u64,

    /// Wall-clock time between frame requests
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

/// Frames between tilt reversals
const TILT_PERIOD_FRAMES: u64 = 45;
/// Pitch rate applied while tilting (rad/s)
const TILT_RATE: f32 = 1.5;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            Settings::from_json(&json)
                .with_context(|| format!("parsing settings from {}", path.display()))?
        }
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    let dims = settings.dimensions();
    log::info!(
        "Galaxy Run (headless) starting: {}x{} seed {}",
        settings.screen_width_px,
        settings.screen_height_px,
        settings.seed
    );

    let runner = GameRunner::spawn(settings, Box::new(SystemClock::new()))?;
    let inputs = runner.inputs();
    inputs.start_game();

    let shoot = shoot_button_bounds(&dims);
    let (shoot_x, shoot_y) = (
        (shoot.x + shoot.width / 2.0) as f32,
        (shoot.y + shoot.height / 2.0) as f32,
    );
    let mut shoot_held = false;

    let mut final_result = None;
    for frame in 0..args.max_frames {
        let tilt = if (frame / TILT_PERIOD_FRAMES) % 2 == 0 {
            TILT_RATE
        } else {
            -TILT_RATE
        };
        inputs.sensor(SensorReading {
            x: 0.0,
            y: tilt,
            z: 0.0,
        });

        runner.request_update()?;
        let result = runner.recv_update()?;

        // The shoot button only takes touches once the ship is under control
        if result.game_state == GameState::Playing && !shoot_held {
            inputs.send(ExternalInput::Motion {
                pointer_id: 0,
                phase: MotionPhase::Down,
                x: shoot_x,
                y: shoot_y,
            });
            shoot_held = true;
        }
        if !result.events.is_empty() {
            log::debug!("Frame {}: {:?}", result.frame_count, result.events);
        }
        if result.frame_count % 300 == 0 {
            log::info!(
                "Frame {} ({:.0} fps): {} score {:.0} difficulty {:.2}",
                result.frame_count,
                result.fps,
                result.game_state.as_str(),
                result.score,
                result.difficulty
            );
        }

        let over = result.game_state == GameState::GameOver;
        final_result = Some(result);
        if over {
            break;
        }
        thread::sleep(Duration::from_millis(args.frame_ms));
    }

    match final_result {
        Some(result) => log::info!(
            "Session ended after {} frames in state {}: score {:.0}",
            result.frame_count,
            result.game_state.as_str(),
            result.score
        ),
        None => log::info!("No frames requested"),
    }
    runner.shutdown();
    Ok(())
}
