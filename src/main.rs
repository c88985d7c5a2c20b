//! Monster Shooter entry point
//!
//! Headless driver: plays a run on the virtual clock with a simple autopilot,
//! logs what happens and prints the final snapshot as JSON.
//!
//! Usage: `monster-shooter [settings.json] [seconds]`

use std::time::Duration;

use monster_shooter::platform::{Command, KeyPhase, UiCommand, map_key};
use monster_shooter::renderer::FrameRecorder;
use monster_shooter::sim::{GameEvent, GamePhase, GameSession};
use monster_shooter::{Game, Settings};

/// Frame time of the simulated display
const FRAME: Duration = Duration::from_millis(16);

/// Pick the key the autopilot presses this frame
fn autopilot(session: &GameSession) -> Option<&'static str> {
    // Lowest enemy first, otherwise the monster
    let target = session
        .enemies
        .iter()
        .max_by(|a, b| a.rect.top().total_cmp(&b.rect.top()))
        .map(|e| e.rect.center_x())
        .or_else(|| session.monster.map(|m| m.rect.center_x()))?;

    let ship = session.player.rect.center_x();
    if target < ship - 10.0 {
        Some("ArrowLeft")
    } else if target > ship + 10.0 {
        Some("ArrowRight")
    } else {
        None
    }
}

/// Frames needed to cover `seconds` of play
fn frame_count(seconds: u64) -> u64 {
    seconds.saturating_mul(1000) / FRAME.as_millis() as u64
}

fn main() {
    env_logger::init();
    log::info!("Monster Shooter (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_from_path(path),
        None => Settings::default(),
    };
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);

    let mut game = Game::new(settings);
    let mut recorder = FrameRecorder::default();
    game.handle_ui(UiCommand::Play);

    let frames = frame_count(seconds);
    for frame in 0..frames {
        if let Some(command) = autopilot(game.session()).and_then(|key| map_key(key, KeyPhase::Down)) {
            game.handle_command(command);
        }
        if frame % 20 == 0 {
            game.handle_command(Command::Fire);
        }

        game.advance(FRAME);

        for event in game.drain_events() {
            match event {
                GameEvent::MonsterSpawned
                | GameEvent::MonsterDefeated
                | GameEvent::PlayerHit
                | GameEvent::MonsterBreached
                | GameEvent::EnemyBreached { .. } => log::info!("{:?}", event),
                _ => log::debug!("{:?}", event),
            }
        }

        game.render(&mut recorder);

        if game.phase() == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Finished in {:?} with score {} ({} draw calls in last frame)",
        game.phase(),
        game.score(),
        recorder.commands.len()
    );

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }

    game.handle_ui(UiCommand::Exit);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(0), 0);
        assert_eq!(frame_count(60), 3750);
        assert_eq!(frame_count(u64::MAX), u64::MAX / 16);
    }
}
