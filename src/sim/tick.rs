//! Fixed-rate simulation tick
//!
//! Advances every entity by one step, resolves collisions, applies scoring and
//! difficulty, then decides whether the run is over.

use rand::Rng;

use super::collision::resolve_collisions;
use super::difficulty::apply_difficulty;
use super::state::{GameEvent, GamePhase, GameSession};

/// Advance the session by one tick. Does nothing unless the game is running.
pub fn tick(session: &mut GameSession) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.phase != GamePhase::Running {
        return events;
    }

    session.time_ticks += 1;

    // Move
    for bullet in &mut session.bullets {
        bullet.advance();
    }
    for bullet in &mut session.monster_bullets {
        bullet.advance();
    }
    for enemy in &mut session.enemies {
        enemy.advance();
    }

    // Prune, keeping track of enemies that slipped past the player
    let player_top = session.player.rect.top();
    let mut escaped = Vec::new();
    session.bullets.retain(|b| !b.left_playfield());
    session.monster_bullets.retain(|b| !b.left_playfield());
    session.enemies.retain(|e| {
        if !e.left_playfield() {
            return true;
        }
        if e.rect.bottom() > player_top {
            escaped.push(e.id);
        }
        false
    });

    // Monster movement
    if let Some(mut monster) = session.monster {
        monster.advance();
        let turn_chance = session.monster_turn_chance;
        let rng = session.rng();
        if rng.random_bool(turn_chance.clamp(0.0, 1.0)) {
            monster.direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        }
        monster.wander();
        if session.monster_dodges {
            monster.evade(&session.bullets);
        }
        session.monster = Some(monster);
    }

    // Collisions, score, difficulty
    let score_before = session.score;
    let outcome = resolve_collisions(session, &mut events);
    debug_assert!(session.score >= score_before);
    if session.score != score_before {
        apply_difficulty(session, &mut events);
    }

    // Termination
    for &id in &escaped {
        events.push(GameEvent::EnemyBreached { id });
    }
    for enemy in session.enemies.iter().filter(|e| e.rect.bottom() > player_top) {
        escaped.push(enemy.id);
        events.push(GameEvent::EnemyBreached { id: enemy.id });
    }
    let monster_breached = session
        .monster
        .is_some_and(|m| m.rect.bottom() > player_top);
    if monster_breached {
        events.push(GameEvent::MonsterBreached);
    }

    if outcome.player_hit || monster_breached || !escaped.is_empty() {
        log::info!(
            "Game over at tick {} with score {} (hit={}, monster_breach={}, enemy_breach={})",
            session.time_ticks,
            session.score,
            outcome.player_hit,
            monster_breached,
            !escaped.is_empty()
        );
        session.phase = GamePhase::GameOver;
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::spawner::spawn_monster;
    use crate::sim::state::{Bullet, Enemy, Monster, MonsterBullet};
    use proptest::prelude::*;

    fn running() -> GameSession {
        let mut session = GameSession::new(&Settings::default());
        session.phase = GamePhase::Running;
        session
    }

    #[test]
    fn test_tick_noop_unless_running() {
        for phase in [
            GamePhase::Idle,
            GamePhase::Paused,
            GamePhase::GameOver,
            GamePhase::Exited,
        ] {
            let mut session = GameSession::new(&Settings::default());
            session.phase = phase;
            session.enemies.push(Enemy::new(1, 100.0, 0.0));
            let events = tick(&mut session);
            assert!(events.is_empty());
            assert_eq!(session.enemies[0].rect.top(), 0.0);
            assert_eq!(session.time_ticks, 0);
        }
    }

    #[test]
    fn test_entities_move() {
        let mut session = running();
        session.enemies.push(Enemy::new(1, 100.0, 0.0));
        session.bullets.push(Bullet::new(2, 500.0, 300.0));
        session.monster_bullets.push(MonsterBullet::new(3, 10.0, 100.0));
        tick(&mut session);
        assert_eq!(session.enemies[0].rect.top(), ENEMY_SPEED);
        assert_eq!(session.bullets[0].rect.top(), 300.0 - BULLET_SPEED);
        assert_eq!(session.monster_bullets[0].rect.top(), 100.0 + MONSTER_BULLET_SPEED);
    }

    #[test]
    fn test_bullet_flies_into_enemy() {
        let mut session = running();
        session.enemies.push(Enemy::new(1, 100.0, 0.0));
        session.bullets.push(Bullet::new(2, 117.5, 50.0));

        // Gap closes by 8 per tick: bullet 44 vs enemy bottom 42, then 38 vs 44
        tick(&mut session);
        assert_eq!(session.score, 0);
        tick(&mut session);
        assert!(session.enemies.is_empty());
        assert!(session.bullets.is_empty());
        assert_eq!(session.score, 1);
        assert_eq!(session.phase, GamePhase::Running);
    }

    #[test]
    fn test_offscreen_entities_pruned() {
        let mut session = running();
        session.bullets.push(Bullet::new(1, 100.0, -BULLET_HEIGHT + 1.0));
        session
            .monster_bullets
            .push(MonsterBullet::new(2, 10.0, CANVAS_HEIGHT - 1.0));
        tick(&mut session);
        assert!(session.bullets.is_empty());
        assert!(session.monster_bullets.is_empty());
    }

    #[test]
    fn test_bullet_at_top_edge_pruned_before_collisions() {
        let mut session = running();
        session.enemies.push(Enemy::new(1, 100.0, 0.0));
        // Would still overlap the fresh enemy after moving, but its top is past the edge
        session.bullets.push(Bullet::new(2, 117.5, 3.0));
        tick(&mut session);
        assert!(session.bullets.is_empty());
        assert_eq!(session.enemies.len(), 1);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_fiftieth_point_makes_monster_dodge() {
        let mut session = running();
        session.score = 49;
        session.monster_turn_chance = 0.0;
        session.monster_spawned = true;
        let mut monster = Monster::new(300.0, 1.0);
        monster.rect.pos.y = 100.0;
        session.monster = Some(monster);
        session.enemies.push(Enemy::new(1, 100.0, 300.0));
        session.bullets.push(Bullet::new(2, 117.5, 340.0));
        // Well below the monster, horizontally within evade range
        session.bullets.push(Bullet::new(3, 290.0, 450.0));

        let events = tick(&mut session);
        assert_eq!(session.score, 50);
        assert!(session.monster_dodges);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GameEvent::MonsterDodgeEnabled)
                .count(),
            1
        );
        // Dodging starts after this tick's collisions: wander only
        let before = session.monster.unwrap();
        assert_eq!(before.rect.left(), 300.0 + before.speed);

        let events = tick(&mut session);
        assert!(!events.contains(&GameEvent::MonsterDodgeEnabled));
        let after = session.monster.unwrap();
        // Wander one step right, then sidestep away from the bullet on the left
        assert_eq!(
            after.rect.left(),
            before.rect.left() + before.speed + 2.0 * before.speed
        );
        assert_eq!(session.bullets.len(), 1);
    }

    #[test]
    fn test_twelfth_kill_spawns_monster_and_halves_fire_rate() {
        let mut session = running();
        session.score = 11;
        session.enemies.push(Enemy::new(1, 100.0, 100.0));
        session.bullets.push(Bullet::new(2, 117.5, 140.0));

        let events = tick(&mut session);
        assert_eq!(session.score, 12);
        assert!(session.monster.is_some());
        assert_eq!(session.fire_rate_ms, 75);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GameEvent::MonsterSpawned)
                .count(),
            1
        );

        // Later ticks at the same score do not respawn or reconfigure
        let events = tick(&mut session);
        assert!(!events.contains(&GameEvent::MonsterSpawned));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::FireRateChanged { .. })));
    }

    #[test]
    fn test_enemy_reaching_player_row_ends_game() {
        let mut session = running();
        let player_top = session.player.rect.top();
        // Bottom edge at player top; the next step crosses it
        session
            .enemies
            .push(Enemy::new(1, 0.0, player_top - ENEMY_HEIGHT));
        let events = tick(&mut session);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::EnemyBreached { id: 1 }));
    }

    #[test]
    fn test_monster_reaching_player_row_ends_game() {
        let mut session = running();
        let player_top = session.player.rect.top();
        let mut monster = Monster::new(300.0, 1.0);
        monster.rect.pos.y = player_top - MONSTER_HEIGHT;
        session.monster = Some(monster);
        let events = tick(&mut session);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::MonsterBreached));
    }

    #[test]
    fn test_monster_bullet_ends_game() {
        let mut session = running();
        let player = session.player.rect;
        session
            .monster_bullets
            .push(MonsterBullet::new(1, player.center_x(), player.top() - 5.0));
        let events = tick(&mut session);
        assert!(events.contains(&GameEvent::PlayerHit));
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(session.monster_bullets.is_empty());

        // Frozen afterwards
        session.enemies.push(Enemy::new(9, 100.0, 100.0));
        session.bullets.push(Bullet::new(10, 117.5, 130.0));
        tick(&mut session);
        assert_eq!(session.score, 0);
        assert_eq!(session.enemies.len(), 1);
    }

    #[test]
    fn test_monster_descends_and_stays_in_bounds() {
        let mut session = running();
        session.monster_turn_chance = 0.5;
        assert!(spawn_monster(&mut session));
        for _ in 0..400 {
            tick(&mut session);
            let monster = session.monster.unwrap();
            assert!(monster.rect.left() >= 0.0);
            assert!(monster.rect.right() <= CANVAS_WIDTH);
        }
        assert_eq!(session.monster.unwrap().rect.top(), 400.0 * MONSTER_SPEED);
    }

    #[test]
    fn test_monster_killed_by_five_hits() {
        let mut session = running();
        session.score = 20;
        session.monster_turn_chance = 0.0;
        session.monster_spawned = true;
        let mut monster = Monster::new(300.0, 1.0);
        monster.speed = 0.0;
        monster.rect.pos.y = 100.0;
        session.monster = Some(monster);

        for hit in 1..=5u8 {
            let id = session.next_entity_id();
            session.bullets.push(Bullet::new(id, 330.0, 165.0));
            tick(&mut session);
            if hit < 5 {
                assert_eq!(session.monster.unwrap().health, MONSTER_HEALTH - hit);
                assert_eq!(session.score, 20);
            }
        }
        assert!(session.monster.is_none());
        assert_eq!(session.score, 25);
        assert_eq!(session.phase, GamePhase::Running);
    }

    proptest! {
        #[test]
        fn score_never_decreases(
            seed in any::<u64>(),
            shots in proptest::collection::vec((0.0f32..795.0, 0.0f32..500.0), 0..40),
            enemies in proptest::collection::vec((0.0f32..760.0, 0.0f32..400.0), 0..20),
        ) {
            let settings = Settings { seed, ..Default::default() };
            let mut session = GameSession::new(&settings);
            session.phase = GamePhase::Running;
            for (x, y) in enemies {
                let id = session.next_entity_id();
                session.enemies.push(Enemy::new(id, x, y));
            }
            for (x, y) in shots {
                let id = session.next_entity_id();
                session.bullets.push(Bullet::new(id, x, y));
            }

            let mut last = session.score;
            for _ in 0..120 {
                tick(&mut session);
                prop_assert!(session.score >= last);
                last = session.score;
            }
        }
    }
}
