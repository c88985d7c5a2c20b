//! Collision resolution
//!
//! Pairs are tested in a fixed order against the entity sets as they stood
//! before resolution: bullet x enemy, then bullet x monster, then monster
//! bullet x player. Hits are collected by ID first and the collections are
//! filtered once afterwards, so an entity consumed by one pair is never tested
//! again in the same pass.

use std::collections::HashSet;

use super::state::{GameEvent, GameSession};
use crate::consts::*;

/// Result of a collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub enemies_destroyed: u32,
    pub monster_hits: u32,
    pub monster_defeated: bool,
    pub player_hit: bool,
}

impl CollisionOutcome {
    /// Points earned in this pass
    pub fn points(&self) -> u64 {
        let bonus = if self.monster_defeated { MONSTER_BONUS } else { 0 };
        u64::from(self.enemies_destroyed) + bonus
    }
}

/// Resolve every collision for this tick, updating score and collections
pub fn resolve_collisions(session: &mut GameSession, events: &mut Vec<GameEvent>) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let mut spent_bullets: HashSet<u32> = HashSet::new();
    let mut dead_enemies: HashSet<u32> = HashSet::new();

    // Player bullets x enemies
    for bullet in &session.bullets {
        for enemy in &session.enemies {
            if dead_enemies.contains(&enemy.id) {
                continue;
            }
            if bullet.rect.intersects(&enemy.rect) {
                spent_bullets.insert(bullet.id);
                dead_enemies.insert(enemy.id);
                outcome.enemies_destroyed += 1;
                events.push(GameEvent::EnemyDestroyed { id: enemy.id });
                break;
            }
        }
    }

    // Player bullets x monster
    if let Some(mut monster) = session.monster {
        for bullet in &session.bullets {
            if spent_bullets.contains(&bullet.id) {
                continue;
            }
            if bullet.rect.intersects(&monster.rect) {
                spent_bullets.insert(bullet.id);
                monster.health = monster.health.saturating_sub(1);
                outcome.monster_hits += 1;
                events.push(GameEvent::MonsterHit {
                    health: monster.health,
                });
                if monster.health == 0 {
                    outcome.monster_defeated = true;
                    break;
                }
            }
        }

        if outcome.monster_defeated {
            log::info!("Monster defeated");
            session.monster = None;
            events.push(GameEvent::MonsterDefeated);
        } else {
            session.monster = Some(monster);
        }
    }

    // Monster bullets x player
    let player = session.player.rect;
    let mut spent_monster_bullets: HashSet<u32> = HashSet::new();
    for bullet in &session.monster_bullets {
        if bullet.rect.intersects(&player) {
            spent_monster_bullets.insert(bullet.id);
        }
    }
    if !spent_monster_bullets.is_empty() {
        outcome.player_hit = true;
        events.push(GameEvent::PlayerHit);
    }

    session.bullets.retain(|b| !spent_bullets.contains(&b.id));
    session.enemies.retain(|e| !dead_enemies.contains(&e.id));
    session
        .monster_bullets
        .retain(|b| !spent_monster_bullets.contains(&b.id));

    let points = outcome.points();
    if points > 0 {
        session.add_score(points);
        log::debug!("Score +{} -> {}", points, session.score);
    }

    outcome
}
