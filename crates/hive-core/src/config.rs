//! Configuration System
//!
//! Loads tuning parameters from a TOML file so thresholds and magnitudes can be
//! adjusted without recompiling. Every section falls back to its defaults, so a
//! partial file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "hive_tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub foraging: ForagingConfig,
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub power_ups: PowerUpConfig,
}

/// Host loop parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub max_ticks: u64,
    pub max_cycles: u32,
    /// Idle ticks between a completed cycle and the next regeneration
    pub wait_ticks_between_cycles: u64,
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_ticks: 1000,
            max_cycles: 3,
            wait_ticks_between_cycles: 50,
            snapshot_interval: 100,
        }
    }
}

/// Foraging state machine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForagingConfig {
    pub worker_count: usize,
    pub max_nectar_per_cycle: u32,
    /// Pre-move distance below which a bee has arrived
    pub arrival_threshold: f32,
    pub launch_min: f32,
    pub launch_max: f32,
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            worker_count: 3,
            max_nectar_per_cycle: 20,
            arrival_threshold: 0.6,
            launch_min: 0.8,
            launch_max: 1.2,
        }
    }
}

/// Steering engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub step_size: f32,
    /// Radians added to the heading when the direct step is blocked
    pub avoidance_angle_offset: f32,
    /// Half-width of the uniform jitter applied on top of the offset
    pub avoidance_jitter: f32,
    pub detour_multiplier: f32,
    /// How many recent history entries the oscillation guard looks at
    pub oscillation_window: usize,
    pub oscillation_radius: f32,
    /// Consecutive detections before an escape move
    pub oscillation_limit: u32,
    pub escape_retry_multiplier: f32,
    pub history_capacity: usize,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            step_size: 0.4,
            avoidance_angle_offset: 1.2,
            avoidance_jitter: 0.3,
            detour_multiplier: 2.0,
            oscillation_window: 5,
            oscillation_radius: 0.15,
            oscillation_limit: 3,
            escape_retry_multiplier: 1.5,
            history_capacity: 20,
        }
    }
}

/// Power-up effect parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub interaction_distance: f32,
    pub growth_factor: f32,
    pub slowdown_per_interaction: f32,
    pub min_speed_multiplier: f32,
    pub base_radius: f32,
    pub max_radius: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            interaction_distance: 0.6,
            growth_factor: 1.5,
            slowdown_per_interaction: 0.25,
            min_speed_multiplier: 0.25,
            base_radius: 0.1,
            max_radius: 0.35,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string and validate it
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_TUNING_PATH, e);
            Self::default()
        })
    }

    /// Render the configuration as a TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let steering = &self.steering;
        let foraging = &self.foraging;
        let power_ups = &self.power_ups;

        if steering.step_size <= 0.0 {
            return Err(ConfigError::Invalid("steering.step_size must be positive".into()));
        }
        if steering.avoidance_jitter < 0.0 {
            return Err(ConfigError::Invalid(
                "steering.avoidance_jitter must not be negative".into(),
            ));
        }
        if steering.detour_multiplier <= 0.0 || steering.escape_retry_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(
                "steering.detour_multiplier and escape_retry_multiplier must be positive".into(),
            ));
        }
        if steering.oscillation_window == 0 || steering.oscillation_limit == 0 {
            return Err(ConfigError::Invalid(
                "steering.oscillation_window and oscillation_limit must be at least 1".into(),
            ));
        }
        if steering.oscillation_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "steering.oscillation_radius must be positive".into(),
            ));
        }
        if steering.history_capacity < steering.oscillation_window {
            return Err(ConfigError::Invalid(
                "steering.history_capacity must be at least oscillation_window".into(),
            ));
        }
        if foraging.arrival_threshold <= 0.0 {
            return Err(ConfigError::Invalid(
                "foraging.arrival_threshold must be positive".into(),
            ));
        }
        if foraging.launch_min > foraging.launch_max {
            return Err(ConfigError::Invalid(format!(
                "foraging.launch_min ({}) exceeds launch_max ({})",
                foraging.launch_min, foraging.launch_max
            )));
        }
        if !(1..=4).contains(&foraging.worker_count) {
            return Err(ConfigError::Invalid(format!(
                "foraging.worker_count must be between 1 and 4, got {}",
                foraging.worker_count
            )));
        }
        if power_ups.interaction_distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "power_ups.interaction_distance must be positive".into(),
            ));
        }
        if power_ups.base_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "power_ups.base_radius must be positive".into(),
            ));
        }
        if power_ups.base_radius > power_ups.max_radius {
            return Err(ConfigError::Invalid(
                "power_ups.base_radius exceeds max_radius".into(),
            ));
        }
        if power_ups.min_speed_multiplier <= 0.0 || power_ups.min_speed_multiplier > 1.0 {
            return Err(ConfigError::Invalid(
                "power_ups.min_speed_multiplier must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
