//! Simulation Components
//!
//! Plain records for bees and the landscape they forage in.

pub mod agent;
pub mod world;

pub use agent::*;
pub use world::*;
