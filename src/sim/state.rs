//! Game state and core simulation types
//!
//! The whole session lives in one owned aggregate that is passed explicitly to
//! every simulation function.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first Play
    Idle,
    /// Clock and producers active
    Running,
    /// Clock and producers cancelled, state preserved
    Paused,
    /// Run ended (accepts Play)
    GameOver,
    /// Terminal
    Exited,
}

/// Things that happened during a tick (for logging / audio hooks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyDestroyed { id: u32 },
    MonsterSpawned,
    MonsterHit { health: u8 },
    MonsterDefeated,
    PlayerHit,
    EnemyBreached { id: u32 },
    MonsterBreached,
    FireRateChanged { fire_rate_ms: u64 },
    MonsterFireEnabled { fire_rate_ms: u64 },
    MonsterDodgeEnabled,
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                CANVAS_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
        }
    }
}

impl Player {
    /// Largest x the ship may occupy
    pub const MAX_X: f32 = CANVAS_WIDTH - PLAYER_WIDTH;

    /// Shift horizontally, clamped to the playfield
    pub fn move_by(&mut self, dx: f32) {
        self.rect.pos.x = (self.rect.pos.x + dx).clamp(0.0, Self::MAX_X);
        debug_assert!((0.0..=Self::MAX_X).contains(&self.rect.pos.x));
    }

    /// Where a freshly fired bullet starts (top edge, horizontally centered)
    pub fn muzzle(&self) -> (f32, f32) {
        (self.rect.center_x() - BULLET_WIDTH / 2.0, self.rect.top())
    }
}

/// A projectile fired by the player (moves up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub rect: Rect,
}

impl Bullet {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
        }
    }

    pub fn advance(&mut self) {
        self.rect.pos.y -= BULLET_SPEED;
    }

    /// Reached the top edge
    pub fn left_playfield(&self) -> bool {
        self.rect.top() <= 0.0
    }
}

/// A projectile fired by the monster (moves down, slower than player bullets)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterBullet {
    pub id: u32,
    pub rect: Rect,
}

impl MonsterBullet {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
        }
    }

    pub fn advance(&mut self) {
        self.rect.pos.y += MONSTER_BULLET_SPEED;
    }

    pub fn left_playfield(&self) -> bool {
        self.rect.top() >= CANVAS_HEIGHT
    }
}

/// A descending enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub rect: Rect,
}

impl Enemy {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
        }
    }

    pub fn advance(&mut self) {
        self.rect.pos.y += ENEMY_SPEED;
    }

    pub fn left_playfield(&self) -> bool {
        self.rect.top() >= CANVAS_HEIGHT
    }
}

/// The boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub rect: Rect,
    /// Base speed (vertical descent and sideways wander)
    pub speed: f32,
    /// Horizontal wander direction, -1 or +1
    pub direction: f32,
    pub health: u8,
}

impl Monster {
    pub const MAX_X: f32 = CANVAS_WIDTH - MONSTER_WIDTH;

    pub fn new(x: f32, direction: f32) -> Self {
        Self {
            rect: Rect::new(x, 0.0, MONSTER_WIDTH, MONSTER_HEIGHT),
            speed: MONSTER_SPEED,
            direction,
            health: MONSTER_HEALTH,
        }
    }

    pub fn advance(&mut self) {
        self.rect.pos.y += self.speed;
    }

    /// Step sideways in the wander direction, bouncing off the walls
    pub fn wander(&mut self) {
        self.rect.pos.x += self.direction * self.speed;
        if self.rect.pos.x < 0.0 {
            self.rect.pos.x = 0.0;
            self.direction = 1.0;
        } else if self.rect.pos.x > Self::MAX_X {
            self.rect.pos.x = Self::MAX_X;
            self.direction = -1.0;
        }
    }

    /// Sidestep away from player bullets that are horizontally close.
    ///
    /// Best effort only: a bullet can still land after the nudge.
    pub fn evade(&mut self, bullets: &[Bullet]) {
        let step = self.speed * 2.0;
        for bullet in bullets {
            let bx = bullet.rect.left();
            if (bx - self.rect.left()).abs() >= MONSTER_EVADE_RANGE {
                continue;
            }
            if bx < self.rect.left() && self.rect.right() < CANVAS_WIDTH {
                self.rect.pos.x += step;
            } else if bx > self.rect.left() && self.rect.left() > 0.0 {
                self.rect.pos.x -= step;
            }
            self.rect.pos.x = self.rect.pos.x.clamp(0.0, Self::MAX_X);
        }
    }

    /// Where a monster bullet starts (just below, horizontally centered)
    pub fn muzzle(&self) -> (f32, f32) {
        (self.rect.center_x() - BULLET_WIDTH / 2.0, self.rect.bottom())
    }
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub monster_bullets: Vec<MonsterBullet>,
    pub enemies: Vec<Enemy>,
    pub monster: Option<Monster>,
    pub score: u64,
    pub phase: GamePhase,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Monotonic, never decreases within a run
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Fire rate at the start of a run
    pub base_fire_rate_ms: u64,
    /// Current player-bullet producer period
    pub fire_rate_ms: u64,
    /// Current monster-bullet producer period (None = producer inactive)
    pub monster_fire_rate_ms: Option<u64>,
    /// Monster sidesteps bullets
    pub monster_dodges: bool,
    /// The monster has been created this run (one-shot)
    pub monster_spawned: bool,
    /// Per-tick probability of the monster picking a new wander direction
    pub monster_turn_chance: f64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub monster_bullets: Vec<MonsterBullet>,
    pub enemies: Vec<Enemy>,
    pub monster: Option<Monster>,
    rng: Pcg32,
    next_id: u32,
}

impl GameSession {
    pub fn new(settings: &Settings) -> Self {
        Self {
            seed: settings.seed,
            phase: GamePhase::Idle,
            score: 0,
            time_ticks: 0,
            base_fire_rate_ms: settings.base_fire_rate_ms.max(1),
            fire_rate_ms: settings.base_fire_rate_ms.max(1),
            monster_fire_rate_ms: None,
            monster_dodges: false,
            monster_spawned: false,
            monster_turn_chance: settings.monster_turn_chance,
            player: Player::default(),
            bullets: Vec::new(),
            monster_bullets: Vec::new(),
            enemies: Vec::new(),
            monster: None,
            rng: Pcg32::seed_from_u64(settings.seed),
            next_id: 1,
        }
    }

    /// Clear entities, score and rates for a fresh run. Phase is left to the caller.
    pub fn reset(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.fire_rate_ms = self.base_fire_rate_ms;
        self.monster_fire_rate_ms = None;
        self.monster_dodges = false;
        self.monster_spawned = false;
        self.player = Player::default();
        self.bullets.clear();
        self.monster_bullets.clear();
        self.enemies.clear();
        self.monster = None;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn add_score(&mut self, points: u64) {
        let before = self.score;
        self.score += points;
        debug_assert!(self.score >= before);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player,
            bullets: self.bullets.clone(),
            monster_bullets: self.monster_bullets.clone(),
            enemies: self.enemies.clone(),
            monster: self.monster,
            score: self.score,
            phase: self.phase,
        }
    }
}
