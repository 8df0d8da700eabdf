//! Session configuration.
//!
//! Every field has a default from `constants`, so a config file only needs
//! the values it overrides.

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Per-hand tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    pub snap_range: f32,
    pub grab_release_threshold: f32,
    pub distance_check_interval: f32,
    pub physics_blend_weight: f32,
    pub finger_steps: usize,
    pub grab_sphere_radius: f32,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            snap_range: SNAP_RANGE,
            grab_release_threshold: GRAB_RELEASE_THRESHOLD,
            distance_check_interval: DISTANCE_CHECK_INTERVAL,
            physics_blend_weight: PHYSICS_BLEND_WEIGHT,
            finger_steps: FINGER_STEPS,
            grab_sphere_radius: GRAB_SPHERE_RADIUS,
        }
    }
}

/// Survival stat rates and thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    pub update_interval: f32,
    pub hunger_depletion_rate: f32,
    pub thirst_depletion_rate: f32,
    pub temperature_depletion_rate: f32,
    pub neutral_temperature: f32,
    pub base_stamina_depletion_rate: f32,
    pub climbing_stamina_depletion_rate: f32,
    pub sprinting_stamina_depletion_rate: f32,
    pub min_stamina_for_climbing: f32,
    pub min_stamina_for_sprinting: f32,
    pub critical_stamina_for_climbing: f32,
    pub sleep_stamina_restoration: f32,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            update_interval: SURVIVAL_UPDATE_INTERVAL,
            hunger_depletion_rate: HUNGER_DEPLETION_RATE,
            thirst_depletion_rate: THIRST_DEPLETION_RATE,
            temperature_depletion_rate: TEMPERATURE_DEPLETION_RATE,
            neutral_temperature: NEUTRAL_TEMPERATURE,
            base_stamina_depletion_rate: BASE_STAMINA_DEPLETION_RATE,
            climbing_stamina_depletion_rate: CLIMBING_STAMINA_DEPLETION_RATE,
            sprinting_stamina_depletion_rate: SPRINTING_STAMINA_DEPLETION_RATE,
            min_stamina_for_climbing: MIN_STAMINA_FOR_CLIMBING,
            min_stamina_for_sprinting: MIN_STAMINA_FOR_SPRINTING,
            critical_stamina_for_climbing: CRITICAL_STAMINA_FOR_CLIMBING,
            sleep_stamina_restoration: SLEEP_STAMINA_RESTORATION,
        }
    }
}

/// Day/night cycle timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    pub day_length_minutes: f32,
    pub night_speed_multiplier: f32,
    pub starting_hour: f32,
    pub day_start_hour: f32,
    pub night_start_hour: f32,
    pub day_temperature_modifier: f32,
    pub night_temperature_modifier: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            day_length_minutes: DAY_LENGTH_MINUTES,
            night_speed_multiplier: NIGHT_SPEED_MULTIPLIER,
            starting_hour: STARTING_HOUR,
            day_start_hour: DAY_START_HOUR,
            night_start_hour: NIGHT_START_HOUR,
            day_temperature_modifier: DAY_TEMPERATURE_MODIFIER,
            night_temperature_modifier: NIGHT_TEMPERATURE_MODIFIER,
        }
    }
}

/// Top-level configuration for a session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub hand: HandConfig,
    pub survival: SurvivalConfig,
    pub day_night: DayNightConfig,
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session cannot run with. Repeating timer intervals
    /// must be positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("hand.distance_check_interval", self.hand.distance_check_interval),
            ("survival.update_interval", self.survival.update_interval),
        ];
        for (field, value) in intervals {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidInterval { field, value });
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Failure to read, parse or validate a config file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidInterval { field: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid config: {}", err),
            ConfigError::InvalidInterval { field, value } => {
                write!(f, "{} must be a positive number of seconds, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::InvalidInterval { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
