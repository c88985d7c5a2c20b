//! Entity producers
//!
//! Each producer appends one entity to the session. They are invoked by the
//! game's periodic timers (or by the Fire command) between simulation ticks.

use rand::Rng;

use super::state::{Bullet, Enemy, GameSession, Monster, MonsterBullet};
use crate::consts::*;

/// The three periodic producers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Producer {
    Enemy,
    PlayerBullet,
    MonsterBullet,
}

impl Producer {
    /// Append this producer's entity. Returns the new entity ID, if any.
    pub fn produce(self, session: &mut GameSession) -> Option<u32> {
        match self {
            Producer::Enemy => Some(spawn_enemy(session)),
            Producer::PlayerBullet => Some(spawn_player_bullet(session)),
            Producer::MonsterBullet => spawn_monster_bullet(session),
        }
    }
}

/// New enemy at the top edge, uniformly random x
pub fn spawn_enemy(session: &mut GameSession) -> u32 {
    let x = session.rng().random_range(0.0..=CANVAS_WIDTH - ENEMY_WIDTH);
    let id = session.next_entity_id();
    session.enemies.push(Enemy::new(id, x, 0.0));
    log::trace!("Enemy {} spawned at x={:.1}", id, x);
    id
}

/// New player bullet at the ship's horizontal center
pub fn spawn_player_bullet(session: &mut GameSession) -> u32 {
    let (x, y) = session.player.muzzle();
    let id = session.next_entity_id();
    session.bullets.push(Bullet::new(id, x, y));
    id
}

/// New monster bullet below the monster. None when there is no monster.
pub fn spawn_monster_bullet(session: &mut GameSession) -> Option<u32> {
    let (x, y) = session.monster?.muzzle();
    let id = session.next_entity_id();
    session.monster_bullets.push(MonsterBullet::new(id, x, y));
    Some(id)
}

/// Create the monster. Rejected (false) while one is alive.
pub fn spawn_monster(session: &mut GameSession) -> bool {
    if session.monster.is_some() {
        log::debug!("Monster already present, spawn ignored");
        return false;
    }

    let rng = session.rng();
    let x = rng.random_range(0.0..=Monster::MAX_X);
    let direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
    session.monster = Some(Monster::new(x, direction));
    session.monster_spawned = true;
    log::info!("Monster spawned at x={:.1}", x);
    true
}
