//! Simulation Systems
//!
//! Steering, target assignment, power-up interaction and the foraging
//! controller that drives them once per tick.

pub mod assignment;
pub mod cycle;
pub mod foraging;
pub mod power_up;
pub mod steering;

pub use assignment::find_target;
pub use cycle::ForagingCycle;
pub use foraging::ForagingSimulation;
pub use power_up::{check_interaction, PowerUpHit};
pub use steering::{SteeringEngine, StepKind, StepReport};
