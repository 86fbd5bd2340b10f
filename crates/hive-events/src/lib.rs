//! Shared event and snapshot types for the hive foraging simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Hosts and renderers depend on it to read what the simulation produces.

pub mod event;
pub mod snapshot;

// Re-export event types
pub use event::{generate_event_id, EventPayload, EventType, ForagingEvent};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, BeeSnapshot, CycleSnapshot, LandscapeSnapshot, LifecycleState,
    SimulationSnapshot,
};
