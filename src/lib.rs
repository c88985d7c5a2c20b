//! Monster Shooter - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring, difficulty)
//! - `scheduler`: Cancelable periodic timers on a virtual clock
//! - `game`: Game state machine driving the simulation and the producers
//! - `renderer`: Renderer contract (draws a read-only snapshot)
//! - `platform`: Input command mapping

pub mod game;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 65.0;
    pub const PLAYER_HEIGHT: f32 = 55.0;
    /// Horizontal step per move command
    pub const PLAYER_SPEED: f32 = 15.0;
    /// Gap between the player's bottom edge and the playfield bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;

    /// Projectiles (player and monster bullets share a size)
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 6.0;
    pub const MONSTER_BULLET_SPEED: f32 = BULLET_SPEED / 3.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_SPEED: f32 = 2.0;

    /// Monster boss
    pub const MONSTER_WIDTH: f32 = 80.0;
    pub const MONSTER_HEIGHT: f32 = 60.0;
    pub const MONSTER_SPEED: f32 = 1.0;
    pub const MONSTER_HEALTH: u8 = 5;
    /// Bonus awarded when the monster is defeated
    pub const MONSTER_BONUS: u64 = 5;
    /// Horizontal distance at which a bullet makes the monster sidestep
    pub const MONSTER_EVADE_RANGE: f32 = 30.0;

    /// Score thresholds
    pub const MONSTER_SCORE: u64 = 12;
    pub const MONSTER_FIRE_SCORE: u64 = 30;
    pub const MONSTER_DODGE_SCORE: u64 = 50;

    /// Monster fires this many times slower than the player
    pub const MONSTER_FIRE_RATE_FACTOR: u64 = 4;
}
