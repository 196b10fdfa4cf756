//! Neon Breakout headless runner
//!
//! Plays a session in demo mode with a fixed frame step and prints the final
//! stats. Useful for soak runs and for producing save files.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use neon_breakout::persistence::SaveGame;
use neon_breakout::sim::{Command, GamePhase, format_time};
use neon_breakout::{Difficulty, FrameDriver, GameError, Settings, Surface};

#[derive(Parser, Debug)]
#[command(name = "neon-breakout")]
#[command(about = "Headless brick-breaker simulation driven by the demo paddle")]
struct Cli {
    /// Difficulty preset: easy, normal, hard or insane
    #[arg(long)]
    difficulty: Option<String>,
    /// RNG seed; defaults to the settings file, then the system clock
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Milliseconds between frames
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,
    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Resume from a save file
    #[arg(long)]
    load: Option<PathBuf>,
    /// Write the session to this file when the run ends
    #[arg(long)]
    save: Option<PathBuf>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(name) = &cli.difficulty {
        settings.difficulty =
            Difficulty::from_str(name).ok_or_else(|| GameError::UnknownDifficulty(name.clone()))?;
    }
    let seed = cli.seed.or(settings.seed).unwrap_or_else(clock_seed);

    log::info!("Neon Breakout (headless) starting...");
    let surface = Surface::new(settings.canvas_width, settings.canvas_height);
    let mut driver = FrameDriver::new(Some(surface), &settings, seed)?;
    driver.set_idle_mode(true);

    match &cli.load {
        Some(path) => {
            let save = SaveGame::load_from(path)
                .with_context(|| format!("failed to load save from {}", path.display()))?;
            *driver.state_mut() = save.restore();
            driver.command(Command::Resume);
        }
        None => {
            driver.command(Command::Start);
        }
    }

    let mut now_ms = 0.0;
    for _ in 0..cli.frames {
        let phase = driver.frame(now_ms).phase;
        now_ms += cli.frame_ms;

        match phase {
            GamePhase::LevelComplete => {
                driver.command(Command::NextLevel);
            }
            GamePhase::GameOver => break,
            _ => {}
        }
    }

    if let Some(path) = &cli.save {
        SaveGame::capture(driver.state())
            .save_to(path)
            .with_context(|| format!("failed to write save to {}", path.display()))?;
    }

    let run_time = driver.snapshot().run_time();
    let state = driver.state();
    let (phase, difficulty, seed) = (state.phase, state.difficulty, state.seed);
    let stats = driver.shutdown();
    println!("phase:     {:?}", phase);
    println!("difficulty: {}", difficulty.as_str());
    println!("seed:      {}", seed);
    println!("score:     {}", stats.score);
    println!("level:     {}", stats.level);
    println!("lives:     {}", stats.lives);
    println!("bricks:    {}", stats.bricks_destroyed);
    println!("max combo: x{}", stats.max_combo);
    println!("time:      {}", run_time);
    if let Some(elapsed) = stats.elapsed_ms {
        log::debug!("Run frozen at {}", format_time(elapsed));
    }

    Ok(())
}
