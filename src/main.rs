//! Headless demo runner
//!
//! Drives the simulation with a scripted autopilot until the run ends, so
//! the core can be exercised (and profiled) without any renderer attached.
//! Pass a seed as the first argument to replay a specific run.

use std::process::ExitCode;

use neon_invaders::{
    Config, FileStore, GameEvent, HighScoreStore, Mode, RenderSnapshot, TickInput, World, tick,
};

const MAX_TICKS: u64 = 20_000;
const HIGH_SCORE_FILE: &str = "highscore.json";

fn main() -> ExitCode {
    env_logger::init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("usage: neon-invaders [seed]");
                return ExitCode::FAILURE;
            }
        },
        None => 0xDEC0DE,
    };

    let mut scores = FileStore::new(HIGH_SCORE_FILE);
    let mut world = match World::new(Config::default(), seed) {
        Ok(world) => world,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    world.high_score = scores.load();

    log::info!("headless run, seed {seed}");
    run(&mut world, &mut scores);

    let snapshot = RenderSnapshot::capture(&world);
    println!(
        "seed {seed}: score {} (best {}), reached wave {}, {} ticks",
        snapshot.hud.score, snapshot.hud.high_score, snapshot.hud.wave, world.tick_count
    );
    ExitCode::SUCCESS
}

fn run(world: &mut World, scores: &mut dyn HighScoreStore) {
    tick(
        world,
        &TickInput {
            start: true,
            ..Default::default()
        },
        scores,
    );

    while world.mode != Mode::GameOver && world.tick_count < MAX_TICKS {
        let input = autopilot(world);
        tick(world, &input, scores);
        for event in world.drain_events() {
            match event {
                GameEvent::WaveCleared { wave } => log::info!("wave {wave} cleared"),
                GameEvent::PlayerHit { lives_left } => {
                    log::info!("player hit, {lives_left} lives left");
                }
                GameEvent::NewHighScore { score } => log::info!("new high score {score}"),
                _ => log::debug!("{event:?}"),
            }
        }
        if world.mode == Mode::WaveClear {
            tick(
                world,
                &TickInput {
                    confirm: true,
                    ..Default::default()
                },
                scores,
            );
        }
    }
}

/// Sweep left and right under the formation, fire constantly. Not a
/// strategy, just enough motion to hit every code path.
fn autopilot(world: &World) -> TickInput {
    let phase = (world.tick_count / 90) % 2;
    TickInput {
        left: phase == 0,
        right: phase == 1,
        fire: true,
        ..Default::default()
    }
}
