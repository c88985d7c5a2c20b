//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (owned by the session)
//! - Stable iteration order (insertion order, entity IDs)
//! - No rendering, timers or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, resolve_collisions};
pub use difficulty::{Difficulty, apply_difficulty, difficulty};
pub use rect::Rect;
pub use spawner::{Producer, spawn_enemy, spawn_monster, spawn_monster_bullet, spawn_player_bullet};
pub use state::{
    Bullet, Enemy, GameEvent, GamePhase, GameSession, Monster, MonsterBullet, Player, Snapshot,
};
pub use tick::tick;
