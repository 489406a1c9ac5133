//! Tuning values for the simulation, loaded from JSON.
//!
//! Every field has a default, so an empty object (`{}`) is a complete config
//! and a file only needs to name the values it changes. Speeds are given in
//! pixels per second and converted to pixels per update with the target
//! update rate.

use std::fs;
use std::path::{Path, PathBuf};

use dv_core::FrameClock;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub spell: SpellConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub target_ups: u32,
    pub animation_fps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_ups: 60,
            animation_fps: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
    /// Player window-X below which the view scrolls with the player.
    pub scroll_low: f64,
    /// Player window-X above which the view scrolls with the player.
    pub scroll_high: f64,
    pub spell_cull_margin: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 320.0,
            scroll_low: 100.0,
            scroll_high: 170.0,
            spell_cull_margin: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f64,
    pub gravity: f64,
    pub jump_impulse: f64,
    /// Top-left Y of the player when standing on the road.
    pub floor_y: f64,
    pub melee_range: f64,
    pub melee_damage: u32,
    pub trap_damage: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 50.0,
            gravity: 0.15,
            jump_impulse: 4.0,
            floor_y: 243.0,
            melee_range: 50.0,
            melee_damage: 30,
            trap_damage: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    /// Fraction of the player's speed.
    pub speed_factor: f64,
    pub idle_beyond: f64,
    pub cast_beyond: f64,
    pub walk_beyond: f64,
    pub ramp_beyond: f64,
    pub reach_beyond: f64,
    pub spell_cooldown: u32,
    pub reach_period: u32,
    pub reach_burst: u32,
    /// Burst speed scales with `distance / reach_distance_divisor`.
    pub reach_distance_divisor: f64,
    pub ramp_divisor: u32,
    pub ramp_floor: f64,
    /// Attack cooldown in attack-animation cycles.
    pub attack_cooldown_cycles: u32,
    pub melee_range: f64,
    pub melee_damage: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed_factor: 0.8,
            idle_beyond: 400.0,
            cast_beyond: 250.0,
            walk_beyond: 150.0,
            ramp_beyond: 70.0,
            reach_beyond: 30.0,
            spell_cooldown: 250,
            reach_period: 500,
            reach_burst: 10,
            reach_distance_divisor: 30.0,
            ramp_divisor: 1000,
            ramp_floor: 0.5,
            attack_cooldown_cycles: 5,
            melee_range: 50.0,
            melee_damage: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpellConfig {
    pub speed: f64,
    pub damage: u32,
    /// Subtracted from the target's frame width to get the hit radius.
    pub hit_margin: f64,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            speed: 100.0,
            damage: 5,
            hit_margin: 27.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub win_delay: u32,
    pub lose_delay: u32,
    pub intro_updates: u32,
    /// Intro updates remaining when the intro-finished signal is raised.
    pub intro_signal_at: u32,
    /// Live enemies closer than this block the win.
    pub safe_distance: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            win_delay: 100,
            lose_delay: 100,
            intro_updates: 150,
            intro_signal_at: 10,
            safe_distance: 200.0,
        }
    }
}

impl GameConfig {
    fn per_update(&self, pixels_per_second: f64) -> f64 {
        pixels_per_second / f64::from(self.timing.target_ups.max(1))
    }

    pub fn player_max_speed(&self) -> f64 {
        self.per_update(self.player.speed)
    }

    pub fn enemy_max_speed(&self) -> f64 {
        self.player_max_speed() * self.enemy.speed_factor
    }

    pub fn spell_max_speed(&self) -> f64 {
        self.per_update(self.spell.speed)
    }

    /// A fresh animation pacing clock for one animated object.
    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.timing.target_ups, self.timing.animation_fps)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), ConfigError> {
    let invalid = |message: &str| Err(ConfigError::Invalid(message.to_string()));

    if config.timing.target_ups == 0 {
        return invalid("timing.target_ups must be > 0");
    }
    if config.timing.animation_fps == 0 || config.timing.animation_fps > config.timing.target_ups {
        return invalid("timing.animation_fps must be in 1..=target_ups");
    }
    if config.window.width <= 0.0 || config.window.height <= 0.0 {
        return invalid("window size must be positive");
    }
    if config.window.scroll_low >= config.window.scroll_high {
        return invalid("window.scroll_low must be below window.scroll_high");
    }
    if config.player.speed <= 0.0 || config.enemy.speed_factor <= 0.0 || config.spell.speed <= 0.0 {
        return invalid("speeds must be positive");
    }
    if config.player.gravity <= 0.0 || config.player.jump_impulse <= 0.0 {
        return invalid("player.gravity and player.jump_impulse must be positive");
    }

    let enemy = &config.enemy;
    let tiers = [
        enemy.idle_beyond,
        enemy.cast_beyond,
        enemy.walk_beyond,
        enemy.ramp_beyond,
        enemy.reach_beyond,
    ];
    if tiers.windows(2).any(|pair| pair[0] <= pair[1]) || enemy.reach_beyond < 0.0 {
        return invalid("enemy distance tiers must be strictly decreasing and non-negative");
    }
    if enemy.ramp_divisor == 0 || enemy.reach_distance_divisor <= 0.0 {
        return invalid("enemy ramp and reach divisors must be positive");
    }
    if !(enemy.ramp_floor > 0.0 && enemy.ramp_floor <= 1.0) {
        return invalid("enemy.ramp_floor must be in (0, 1]");
    }
    if config.rules.intro_signal_at > config.rules.intro_updates {
        log::warn!(
            "rules.intro_signal_at ({}) exceeds rules.intro_updates ({}); signal fires at once",
            config.rules.intro_signal_at,
            config.rules.intro_updates
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dv_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn defaults_match_reference_tuning() {
        let config = GameConfig::default();
        assert_relative_eq!(config.player_max_speed(), 50.0 / 60.0);
        assert_relative_eq!(config.enemy_max_speed(), 50.0 / 60.0 * 0.8);
        assert_relative_eq!(config.spell_max_speed(), 100.0 / 60.0);
        assert_eq!(config.frame_clock().updates_per_frame(), 6);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "player": { "speed": 120.0 }, "rules": { "win_delay": 5 } }"#)
            .expect("write config file");

        let config = load_config_from_path(&path).expect("config should load");
        assert_relative_eq!(config.player.speed, 120.0);
        assert_relative_eq!(config.player.gravity, 0.15);
        assert_eq!(config.rules.win_delay, 5);
        assert_eq!(config.rules.lose_delay, 100);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unordered_tiers_are_rejected() {
        let path = temp_file_path("tiers");
        fs::write(&path, r#"{ "enemy": { "walk_beyond": 300.0 } }"#).expect("write config file");

        let err = load_config_from_path(&path).expect_err("tiers out of order");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_json_reports_path() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ not json").expect("write config file");

        let err = load_config_from_path(&path).expect_err("parse failure");
        assert!(err.to_string().contains(&path.display().to_string()));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_update_rate_is_rejected() {
        let mut config = GameConfig::default();
        config.timing.target_ups = 0;
        assert!(validate_config(&config).is_err());
    }
}
