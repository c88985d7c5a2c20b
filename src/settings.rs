//! Runtime configuration
//!
//! Timing and randomness knobs. Playfield geometry lives in `consts`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (enemy placement, monster wander)
    pub seed: u64,
    /// Simulation clock rate
    pub tick_rate_hz: u32,
    /// Enemy producer period
    pub enemy_spawn_ms: u64,
    /// Player-bullet producer period before any difficulty increase
    pub base_fire_rate_ms: u64,
    /// Per-tick chance that the monster picks a new wander direction
    pub monster_turn_chance: f64,
    /// Run the player-bullet producer (manual Fire always works)
    pub auto_fire: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            tick_rate_hz: 60,
            enemy_spawn_ms: 2000,
            base_fire_rate_ms: 150,
            monster_turn_chance: 0.01,
            auto_fire: true,
        }
    }
}

impl Settings {
    /// Simulation clock period
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate_hz.max(1)))
    }

    /// Enemy producer period (never zero)
    pub fn enemy_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.enemy_spawn_ms.max(1))
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {} - using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_interval_60hz() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_zero_periods_are_clamped() {
        let settings = Settings::from_json(r#"{ "tick_rate_hz": 0, "enemy_spawn_ms": 0 }"#).unwrap();
        assert_eq!(settings.tick_interval(), Duration::from_secs(1));
        assert_eq!(settings.enemy_spawn_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "auto_fire": false }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert!(!settings.auto_fire);
        assert_eq!(settings.base_fire_rate_ms, 150);
        assert_eq!(settings.enemy_spawn_ms, 2000);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: 99,
            ..Default::default()
        };
        assert_eq!(Settings::from_json(&settings.to_json()).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from_path("/nonexistent/monster-shooter.json");
        assert_eq!(settings, Settings::default());
    }
}
