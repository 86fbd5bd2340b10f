//! Worker Bee Components
//!
//! The foraging agent: position, power-up driven size and speed, lifecycle
//! state, and the short movement history the oscillation guard reads.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::PowerUpConfig;

pub use hive_events::LifecycleState;

/// Default capacity of a bee's position history
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Bounded record of accepted positions, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionHistory {
    entries: VecDeque<Vec2>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a position, discarding the oldest entry when full
    pub fn push(&mut self, position: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(position);
    }

    /// The `count` most recent entries, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Vec2> {
        self.entries.iter().rev().take(count)
    }

    /// Whether `point` lies within `radius` of any of the `window` newest entries
    pub fn is_near_recent(&self, point: Vec2, window: usize, radius: f32) -> bool {
        self.recent(window).any(|p| p.distance(point) < radius)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Result of applying a power-up to a bee
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpEffect {
    pub interactions: u32,
    pub new_radius: f32,
    pub new_speed: f32,
}

/// A simulated worker bee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bee {
    pub position: Vec2,
    base_radius: f32,
    max_radius: f32,
    current_radius: f32,
    speed_multiplier: f32,
    power_up_interactions: u32,
    pub state: LifecycleState,
    history: PositionHistory,
    oscillation_count: u32,
}

impl Bee {
    /// Create a bee with the default radii (0.1 growing to at most 0.35)
    pub fn new(position: Vec2) -> Self {
        let defaults = PowerUpConfig::default();
        Self::with_radii(position, defaults.base_radius, defaults.max_radius)
    }

    pub fn with_radii(position: Vec2, base_radius: f32, max_radius: f32) -> Self {
        Self {
            position,
            base_radius,
            max_radius: max_radius.max(base_radius),
            current_radius: base_radius,
            speed_multiplier: 1.0,
            power_up_interactions: 0,
            state: LifecycleState::Seeking,
            history: PositionHistory::default(),
            oscillation_count: 0,
        }
    }

    /// Build a bee from the power-up and history settings of a config
    pub fn from_config(position: Vec2, power_ups: &PowerUpConfig, history_capacity: usize) -> Self {
        Self::with_radii(position, power_ups.base_radius, power_ups.max_radius)
            .with_history_capacity(history_capacity)
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = PositionHistory::new(capacity);
        self
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn current_radius(&self) -> f32 {
        self.current_radius
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn power_up_interactions(&self) -> u32 {
        self.power_up_interactions
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn oscillation_count(&self) -> u32 {
        self.oscillation_count
    }

    pub fn is_settled(&self) -> bool {
        self.state == LifecycleState::Settled
    }

    /// Record an accepted position for the oscillation guard
    pub fn record_position(&mut self, position: Vec2) {
        self.history.push(position);
    }

    pub(crate) fn set_oscillation_count(&mut self, count: u32) {
        self.oscillation_count = count;
    }

    /// Register one more power-up and recompute size and speed.
    ///
    /// Both values derive from the cumulative interaction count, so they
    /// never drift from repeated application.
    pub fn apply_power_up(&mut self, config: &PowerUpConfig) -> PowerUpEffect {
        self.power_up_interactions += 1;
        self.recompute_attributes(config);
        PowerUpEffect {
            interactions: self.power_up_interactions,
            new_radius: self.current_radius,
            new_speed: self.speed_multiplier,
        }
    }

    fn recompute_attributes(&mut self, config: &PowerUpConfig) {
        let count = self.power_up_interactions as i32;
        let growth = config
            .growth_factor
            .powi(count)
            .min(self.max_radius / self.base_radius);
        self.current_radius = self.base_radius * growth;

        let speed = 1.0 - config.slowdown_per_interaction * count as f32;
        self.speed_multiplier = speed.clamp(config.min_speed_multiplier, 1.0);
    }

    /// Restore base size and full speed, and forget past power-ups
    pub fn reset_attributes(&mut self) {
        self.power_up_interactions = 0;
        self.current_radius = self.base_radius;
        self.speed_multiplier = 1.0;
    }

    /// Back to seeking for a new cycle. Size and speed are left alone.
    pub fn reset_for_cycle(&mut self) {
        self.state = LifecycleState::Seeking;
        self.history.clear();
        self.oscillation_count = 0;
    }
}
