//! ByThePong headless demo
//!
//! Usage: `bythepong [difficulty] [seed] [ranking-dir]`
//!
//! Plays one match with both paddles AI-driven at the fixed 60 Hz step,
//! prints the final snapshot as JSON and, if a directory is given, records
//! the result in its ranking and player files.

use std::sync::Arc;

use bythepong::consts::SIM_DT;
use bythepong::persistence::{JsonStore, ResultSink};
use bythepong::platform::ManualClock;
use bythepong::sim::TickInput;
use bythepong::{Difficulty, GameError, MatchHandle, Settings};

/// Log progress every ten seconds of match time
const PROGRESS_TICKS: u64 = 600;

fn run() -> Result<(), GameError> {
    let mut args = std::env::args().skip(1);
    let difficulty_key = args.next().unwrap_or_else(|| Difficulty::default().as_str().to_string());
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().unwrap_or_else(|_| {
            log::warn!("Invalid seed {:?}, using 0", s);
            0
        }),
        None => 0,
    };
    let ranking_dir = args.next();

    let settings = Settings::default();
    let (difficulty, profile) = settings.profile_for(&difficulty_key);
    log::info!("ByThePong demo: {} ({}), seed {}", difficulty.as_str(), profile.description, seed);

    let clock = ManualClock::new();
    let mut handle = MatchHandle::create("Demo", difficulty, profile, settings.rules, seed, Arc::new(clock.clone()))?;
    handle.start();

    let input = TickInput {
        idle_mode: true,
        ..TickInput::default()
    };
    let mut ticks: u64 = 0;
    while !handle.is_finished() {
        clock.advance_secs(SIM_DT);
        let snapshot = handle.tick(&input)?;
        ticks += 1;
        if ticks % PROGRESS_TICKS == 0 {
            log::info!(
                "{}s left: {}-{}",
                snapshot.remaining_time,
                snapshot.left_score,
                snapshot.right_score
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&handle.snapshot())?);

    if let Some(result) = handle.take_result() {
        log::info!(
            "Final {}-{} after {} ticks (won: {}, draw: {})",
            result.final_score,
            result.opponent_score,
            ticks,
            result.won,
            result.draw
        );
        if let Some(dir) = ranking_dir {
            let mut store = JsonStore::open(&dir)?;
            store.record(&result)?;
            log::info!("Result saved to {}", store.dir().display());
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
