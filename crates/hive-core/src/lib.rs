//! Hive Foraging Simulation Library
//!
//! Worker bees steer around obstacles to nectar, pick up power-ups on the
//! way, carry the nectar back to the hive and settle once the cycle's quota
//! is met. [`ForagingSimulation`] owns that state and advances it one tick at
//! a time; hosts poll it between ticks.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod events;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{Config, ConfigError};
pub use systems::{ForagingCycle, ForagingSimulation, SteeringEngine};

/// Seeded random number generator resource for host-side spawning
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
