//! Rendering contract
//!
//! The game never draws pixels itself. A `Renderer` backend receives simple
//! draw calls produced from a read-only `Snapshot`.

pub mod recorder;

pub use recorder::{DrawCommand, FrameRecorder};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{GamePhase, Rect, Snapshot};

/// RGBA color
pub type Color = [f32; 4];

pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
pub const CYAN: Color = [0.0, 1.0, 1.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];

/// Sprite images, keyed by entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Enemy,
    Monster,
}

/// Drawing backend
pub trait Renderer {
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
}

pub const GAME_OVER_TEXT: &str = "Game Over";
pub const PAUSED_TEXT: &str = "Click Resume to start the game";
pub const EXITED_TEXT: &str = "Game Exited";

/// Draw one frame of the given snapshot
pub fn draw_frame<R: Renderer + ?Sized>(snapshot: &Snapshot, renderer: &mut R) {
    renderer.clear();

    if snapshot.phase == GamePhase::Exited {
        renderer.draw_text(EXITED_TEXT, CANVAS_WIDTH / 2.0 - 150.0, CANVAS_HEIGHT / 2.0, 50.0, RED);
        return;
    }

    renderer.draw_sprite(Sprite::Player, snapshot.player.rect);
    for bullet in &snapshot.bullets {
        renderer.fill_rect(bullet.rect, YELLOW);
    }
    for bullet in &snapshot.monster_bullets {
        renderer.fill_rect(bullet.rect, CYAN);
    }
    for enemy in &snapshot.enemies {
        renderer.draw_sprite(Sprite::Enemy, enemy.rect);
    }
    if let Some(monster) = &snapshot.monster {
        renderer.draw_sprite(Sprite::Monster, monster.rect);
    }

    renderer.draw_text(&format!("Score: {}", snapshot.score), 10.0, 20.0, 20.0, WHITE);

    match snapshot.phase {
        GamePhase::GameOver => {
            renderer.draw_text(GAME_OVER_TEXT, CANVAS_WIDTH / 2.0 - 150.0, CANVAS_HEIGHT / 2.0, 50.0, RED);
        }
        GamePhase::Paused => {
            renderer.draw_text(PAUSED_TEXT, CANVAS_WIDTH / 2.0 - 230.0, CANVAS_HEIGHT / 2.0, 35.0, RED);
        }
        _ => {}
    }
}
