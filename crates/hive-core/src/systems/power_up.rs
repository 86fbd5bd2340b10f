//! Power-up Interaction
//!
//! Proximity-triggered growth and slowdown from power-up pickups.

use crate::components::{Bee, PowerUp, PowerUpEffect};
use crate::config::PowerUpConfig;

/// A consumed power-up and what it did to the bee
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpHit {
    pub power_up: PowerUp,
    pub effect: PowerUpEffect,
}

/// Consume the first power-up within range of `bee`, if any.
///
/// At most one power-up is consumed per call even when several are in range;
/// the first in pool order wins and is removed from `power_ups`.
pub fn check_interaction(
    bee: &mut Bee,
    power_ups: &mut Vec<PowerUp>,
    config: &PowerUpConfig,
) -> Option<PowerUpHit> {
    let index = power_ups
        .iter()
        .position(|p| p.position.distance(bee.position) < config.interaction_distance)?;

    let power_up = power_ups.remove(index);
    let effect = bee.apply_power_up(config);
    Some(PowerUpHit { power_up, effect })
}
