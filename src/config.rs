//! Gameplay tuning values
//!
//! Every balance knob the simulation consults lives here as a named field
//! rather than a scattered constant. Out-of-range values are rejected at
//! construction time; gameplay code can then assume the config is sane.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Construction-time configuration failure.
///
/// The only errors this crate ever surfaces: a bad tuning value would
/// otherwise produce silent gameplay bugs, so it fails loudly up front.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} pool capacity must be non-zero")]
    ZeroCapacity { name: &'static str },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be a probability in 0..=1, got {value}")]
    BadProbability { name: &'static str, value: f32 },
    #[error("formation must have at least one row and one column")]
    EmptyFormation,
    #[error("lives cap {cap} is below starting lives {start}")]
    LivesCapTooLow { cap: u8, start: u8 },
    #[error("fire cooldown and power-up durations must be non-zero ticks")]
    ZeroDuration,
}

/// All gameplay tuning in one serializable bundle.
///
/// Durations are tick counts, speeds are field units per second,
/// probabilities are per-tick chances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // === Object pools ===
    pub bullet_pool_capacity: usize,
    pub explosion_pool_capacity: usize,

    // === Broad phase ===
    /// Spatial index cell edge length
    pub grid_cell_size: f32,

    // === Enemy formation ===
    pub formation_rows: usize,
    pub formation_cols: usize,
    pub formation_spacing_x: f32,
    pub formation_spacing_y: f32,
    /// Y of the formation's top row at wave start
    pub formation_start_y: f32,
    /// Horizontal sweep speed at wave 1
    pub enemy_base_speed: f32,
    /// Additive per-wave speed factor: speed(w) = base * (1 + inc * (w - 1))
    pub enemy_speed_increment: f32,
    /// Downward step applied the tick after an edge hit
    pub enemy_drop_step: f32,
    /// Chance per tick that the formation fires one bullet
    pub enemy_shoot_chance: f32,
    pub enemy_bullet_speed: f32,
    /// First wave whose top row spawns 2-health elites
    pub elite_wave_start: u32,

    // === Player ===
    pub player_speed: f32,
    pub player_bullet_speed: f32,
    pub bullet_damage: u32,
    pub fire_cooldown_ticks: u32,
    /// Rapid fire divides the cooldown by this
    pub rapid_fire_divisor: u32,
    /// Sideways velocity of the outer triple-shot lanes, as a fraction of
    /// bullet speed
    pub triple_shot_spread: f32,
    /// Horizontal muzzle offset of each outer triple-shot lane
    pub triple_shot_lane_offset: f32,
    pub starting_lives: u8,
    pub lives_cap: u8,
    /// Enemies reaching this Y lose the game for the player
    pub defense_line_y: f32,

    // === Bonuses / power-ups ===
    /// Chance a destroyed enemy drops a bonus
    pub bonus_drop_chance: f32,
    pub bonus_fall_speed: f32,
    pub freeze_duration_ticks: u32,
    pub rapid_fire_duration_ticks: u32,
    pub shield_duration_ticks: u32,
    pub triple_shot_duration_ticks: u32,
    pub explosion_duration_ticks: u32,

    // === Scoring ===
    pub enemy_score: u64,
    pub elite_score: u64,
    pub bonus_score: u64,
    pub wave_clear_bonus: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bullet_pool_capacity: 200,
            explosion_pool_capacity: 100,

            grid_cell_size: 100.0,

            formation_rows: 5,
            formation_cols: 10,
            formation_spacing_x: 70.0,
            formation_spacing_y: 40.0,
            formation_start_y: 50.0,
            enemy_base_speed: 60.0,
            enemy_speed_increment: 0.2,
            enemy_drop_step: 20.0,
            enemy_shoot_chance: 0.06,
            enemy_bullet_speed: 180.0,
            elite_wave_start: 3,

            player_speed: 300.0,
            player_bullet_speed: 420.0,
            bullet_damage: 1,
            fire_cooldown_ticks: 15,
            rapid_fire_divisor: 3,
            triple_shot_spread: 0.2,
            triple_shot_lane_offset: 10.0,
            starting_lives: 3,
            lives_cap: 5,
            defense_line_y: 510.0,

            bonus_drop_chance: 0.2,
            bonus_fall_speed: 120.0,
            freeze_duration_ticks: 300,
            rapid_fire_duration_ticks: 300,
            shield_duration_ticks: 180,
            triple_shot_duration_ticks: 300,
            explosion_duration_ticks: 30,

            enemy_score: 10,
            elite_score: 30,
            bonus_score: 50,
            wave_clear_bonus: 100,
        }
    }
}

impl Config {
    /// Check every field for sanity. Called once by `World::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bullet_pool_capacity == 0 {
            return Err(ConfigError::ZeroCapacity { name: "bullet" });
        }
        if self.explosion_pool_capacity == 0 {
            return Err(ConfigError::ZeroCapacity { name: "explosion" });
        }
        if self.formation_rows == 0 || self.formation_cols == 0 {
            return Err(ConfigError::EmptyFormation);
        }
        if self.lives_cap < self.starting_lives {
            return Err(ConfigError::LivesCapTooLow {
                cap: self.lives_cap,
                start: self.starting_lives,
            });
        }
        if self.fire_cooldown_ticks == 0
            || self.rapid_fire_divisor == 0
            || self.freeze_duration_ticks == 0
            || self.rapid_fire_duration_ticks == 0
            || self.shield_duration_ticks == 0
            || self.triple_shot_duration_ticks == 0
            || self.explosion_duration_ticks == 0
        {
            return Err(ConfigError::ZeroDuration);
        }

        for (name, value) in [
            ("grid_cell_size", self.grid_cell_size),
            ("formation_spacing_x", self.formation_spacing_x),
            ("formation_spacing_y", self.formation_spacing_y),
            ("enemy_base_speed", self.enemy_base_speed),
            ("enemy_drop_step", self.enemy_drop_step),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("player_speed", self.player_speed),
            ("player_bullet_speed", self.player_bullet_speed),
            ("triple_shot_lane_offset", self.triple_shot_lane_offset),
            ("bonus_fall_speed", self.bonus_fall_speed),
            ("defense_line_y", self.defense_line_y),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.enemy_speed_increment < 0.0 || !self.enemy_speed_increment.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "enemy_speed_increment",
                value: self.enemy_speed_increment,
            });
        }

        for (name, value) in [
            ("enemy_shoot_chance", self.enemy_shoot_chance),
            ("bonus_drop_chance", self.bonus_drop_chance),
        ] {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(ConfigError::BadProbability { name, value });
            }
        }

        Ok(())
    }

    /// Formation sweep speed for a wave. Deterministic in the wave number.
    pub fn enemy_speed_for_wave(&self, wave: u32) -> f32 {
        let scale = 1.0 + self.enemy_speed_increment * wave.saturating_sub(1) as f32;
        self.enemy_base_speed * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_pool_capacity_rejected() {
        let cfg = Config {
            bullet_pool_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ZeroCapacity { name: "bullet" })
        ));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let cfg = Config {
            enemy_base_speed: -5.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { name: "enemy_base_speed", .. })
        ));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let cfg = Config {
            bonus_drop_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::BadProbability { .. })));
    }

    #[test]
    fn test_lives_cap_below_start_rejected() {
        let cfg = Config {
            starting_lives: 4,
            lives_cap: 2,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::LivesCapTooLow { .. })));
    }

    #[test]
    fn test_empty_formation_rejected() {
        let cfg = Config {
            formation_cols: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyFormation)));
    }

    #[test]
    fn test_speed_scales_per_wave() {
        let cfg = Config::default();
        assert_eq!(cfg.enemy_speed_for_wave(1), cfg.enemy_base_speed);
        let w2 = cfg.enemy_speed_for_wave(2);
        let w3 = cfg.enemy_speed_for_wave(3);
        assert!(w2 > cfg.enemy_base_speed);
        assert!(w3 > w2);
        // Deterministic: same wave, same speed
        assert_eq!(w3, cfg.enemy_speed_for_wave(3));
    }
}
