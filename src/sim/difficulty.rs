//! Score-driven difficulty progression
//!
//! `difficulty` is a pure mapping from score to a target configuration.
//! `apply_difficulty` reconciles a session against that target; because it only
//! acts on differences, calling it repeatedly with the same score is a no-op and
//! each threshold side effect happens once.

use super::spawner::spawn_monster;
use super::state::{GameEvent, GameSession};
use crate::consts::*;

/// Target configuration for a given score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    /// Player-bullet producer period
    pub fire_rate_ms: u64,
    /// A monster should have been created
    pub monster: bool,
    /// Monster-bullet producer period, if the monster may fire
    pub monster_fire_rate_ms: Option<u64>,
    /// Monster sidesteps nearby bullets
    pub monster_dodges: bool,
}

/// Periods never drop below 1ms
pub fn difficulty(score: u64, base_fire_rate_ms: u64) -> Difficulty {
    let base_fire_rate_ms = base_fire_rate_ms.max(1);
    let fire_rate_ms = if score >= MONSTER_SCORE {
        (base_fire_rate_ms / 2).max(1)
    } else {
        base_fire_rate_ms
    };

    Difficulty {
        fire_rate_ms,
        monster: score >= MONSTER_SCORE,
        monster_fire_rate_ms: (score >= MONSTER_FIRE_SCORE)
            .then_some(fire_rate_ms * MONSTER_FIRE_RATE_FACTOR),
        monster_dodges: score >= MONSTER_DODGE_SCORE,
    }
}

/// Bring the session in line with the difficulty for its current score
pub fn apply_difficulty(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let target = difficulty(session.score, session.base_fire_rate_ms);

    if target.fire_rate_ms != session.fire_rate_ms {
        log::info!(
            "Score {}: fire rate {}ms -> {}ms",
            session.score,
            session.fire_rate_ms,
            target.fire_rate_ms
        );
        session.fire_rate_ms = target.fire_rate_ms;
        events.push(GameEvent::FireRateChanged {
            fire_rate_ms: target.fire_rate_ms,
        });
    }

    // One monster per run
    if target.monster && !session.monster_spawned && spawn_monster(session) {
        events.push(GameEvent::MonsterSpawned);
    }

    // Producer only runs while there is a monster to fire from
    let monster_fire = session.monster.and(target.monster_fire_rate_ms);
    if monster_fire != session.monster_fire_rate_ms {
        session.monster_fire_rate_ms = monster_fire;
        if let Some(fire_rate_ms) = monster_fire {
            log::info!("Score {}: monster fires every {}ms", session.score, fire_rate_ms);
            events.push(GameEvent::MonsterFireEnabled { fire_rate_ms });
        }
    }

    if target.monster_dodges && !session.monster_dodges {
        log::info!("Score {}: monster starts dodging", session.score);
        session.monster_dodges = true;
        events.push(GameEvent::MonsterDodgeEnabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use proptest::prelude::*;

    #[test]
    fn test_thresholds() {
        let d = difficulty(0, 150);
        assert_eq!(d.fire_rate_ms, 150);
        assert!(!d.monster);
        assert_eq!(d.monster_fire_rate_ms, None);

        let d = difficulty(11, 150);
        assert_eq!(d.fire_rate_ms, 150);
        assert!(!d.monster);

        let d = difficulty(12, 150);
        assert_eq!(d.fire_rate_ms, 75);
        assert!(d.monster);
        assert_eq!(d.monster_fire_rate_ms, None);

        let d = difficulty(30, 150);
        assert_eq!(d.monster_fire_rate_ms, Some(300));
        assert!(!d.monster_dodges);

        let d = difficulty(50, 150);
        assert!(d.monster_dodges);
    }

    #[test]
    fn test_tiny_base_rate_stays_positive() {
        for base in [0, 1] {
            assert_eq!(difficulty(0, base).fire_rate_ms, 1);
            let d = difficulty(30, base);
            assert_eq!(d.fire_rate_ms, 1);
            assert_eq!(d.monster_fire_rate_ms, Some(MONSTER_FIRE_RATE_FACTOR));
        }
    }

    #[test]
    fn test_dodge_enabled_once_on_crossing_fifty() {
        let mut session = GameSession::new(&Settings::default());
        let mut events = Vec::new();
        session.score = 49;
        apply_difficulty(&mut session, &mut events);
        assert!(!session.monster_dodges);
        assert!(!events.contains(&GameEvent::MonsterDodgeEnabled));

        for score in [50, 50, 51, 80] {
            session.score = score;
            apply_difficulty(&mut session, &mut events);
        }
        assert!(session.monster_dodges);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GameEvent::MonsterDodgeEnabled)
                .count(),
            1
        );
    }

    #[test]
    fn test_monster_spawned_once_on_crossing() {
        let mut session = GameSession::new(&Settings::default());
        let mut events = Vec::new();

        session.score = 11;
        apply_difficulty(&mut session, &mut events);
        assert!(session.monster.is_none());
        assert!(events.is_empty());

        session.score = 12;
        apply_difficulty(&mut session, &mut events);
        assert!(session.monster.is_some());
        assert_eq!(session.fire_rate_ms, 75);
        assert_eq!(
            events,
            vec![
                GameEvent::FireRateChanged { fire_rate_ms: 75 },
                GameEvent::MonsterSpawned
            ]
        );

        // Same score again: nothing new
        events.clear();
        apply_difficulty(&mut session, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_monster_not_recreated_after_defeat() {
        let mut session = GameSession::new(&Settings::default());
        let mut events = Vec::new();
        session.score = 12;
        apply_difficulty(&mut session, &mut events);
        session.monster = None;
        session.score = 20;
        events.clear();
        apply_difficulty(&mut session, &mut events);
        assert!(session.monster.is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn test_monster_fire_follows_monster_presence() {
        let mut session = GameSession::new(&Settings::default());
        let mut events = Vec::new();
        session.score = 30;
        apply_difficulty(&mut session, &mut events);
        assert_eq!(session.monster_fire_rate_ms, Some(300));
        assert!(events.contains(&GameEvent::MonsterFireEnabled { fire_rate_ms: 300 }));

        session.monster = None;
        apply_difficulty(&mut session, &mut events);
        assert_eq!(session.monster_fire_rate_ms, None);
    }

    proptest! {
        #[test]
        fn applying_twice_is_idempotent(score in 0u64..200) {
            let mut session = GameSession::new(&Settings::default());
            session.score = score;
            let mut first = Vec::new();
            apply_difficulty(&mut session, &mut first);
            let monster = session.monster;
            let mut second = Vec::new();
            apply_difficulty(&mut session, &mut second);
            prop_assert!(second.is_empty());
            prop_assert_eq!(session.monster, monster);
            prop_assert_eq!(
                first.iter().filter(|e| **e == GameEvent::MonsterSpawned).count(),
                usize::from(score >= MONSTER_SCORE)
            );
        }
    }
}
