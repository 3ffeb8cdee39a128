use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables of a run. Missing fields in a config file keep their defaults.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pause between two waves, and before the first one.
    pub wave_countdown_ms: f32,
    /// Spawn points closer than this to the player are skipped.
    pub spawn_safety_radius: f32,
    pub attack_cooldown_ms: f32,
    /// Coins older than this merge into their nearest neighbour.
    pub coin_merge_after_ms: f32,
    pub coin_magnet_radius: f32,
    /// A kill never drops more coin entities than this; the value is spread instead.
    pub max_coin_buckets: u32,
    pub starting_coins: f32,
    pub bullet_lifetime_ms: f32,
    pub bullet_speed: f32,
    /// Fixed seed for reproducible runs. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wave_countdown_ms: 5000.0,
            spawn_safety_radius: 800.0,
            attack_cooldown_ms: 1000.0,
            coin_merge_after_ms: 5000.0,
            coin_magnet_radius: 100.0,
            max_coin_buckets: 4,
            starting_coins: 20.0,
            bullet_lifetime_ms: 5000.0,
            bullet_speed: 1800.0,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = GameConfig::from_ron_str("(wave_countdown_ms: 2500.0, rng_seed: Some(7))")
            .expect("valid config");
        assert_eq!(config.wave_countdown_ms, 2500.0);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.spawn_safety_radius, 800.0);
        assert_eq!(config.max_coin_buckets, 4);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let err = GameConfig::from_ron_str("(wave_countdown_ms: \"soon\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
