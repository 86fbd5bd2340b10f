//! Simulation Setup
//!
//! Default landscape plus nectar, power-up and worker spawning.

pub mod landscape;
pub mod spawn;

pub use landscape::*;
pub use spawn::*;
