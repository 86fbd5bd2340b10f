//! Snapshot Types
//!
//! Serialization structs for simulation snapshots.
//!
//! A snapshot is everything a renderer polls after a tick: where each bee is,
//! how big and fast it is, what it is doing, and the cycle counters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Where a worker bee is in its foraging lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Heading for (or looking for) a nectar target
    #[default]
    Seeking,
    /// Carrying nectar back to the hive staging point
    Returning,
    /// Parked inside the hive until the next cycle
    Settled,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Seeking => "seeking",
            LifecycleState::Returning => "returning",
            LifecycleState::Settled => "settled",
        }
    }
}

/// Per-bee state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeeSnapshot {
    pub index: usize,
    pub position: Vec2,
    pub radius: f32,
    pub speed_multiplier: f32,
    pub state: LifecycleState,
    #[serde(default)]
    pub power_up_interactions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<u32>,
}

/// Cycle-level counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub cycle_index: u32,
    pub nectar_collected: u32,
    pub max_nectar_per_cycle: u32,
    #[serde(default)]
    pub total_nectar_collected: u64,
    #[serde(default)]
    pub fill_level: f32,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returning: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settled: Vec<usize>,
}

/// What is left to pick up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandscapeSnapshot {
    pub remaining_nectar: usize,
    pub remaining_power_ups: usize,
}

/// Complete simulation snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    pub triggered_by: String,
    pub bees: Vec<BeeSnapshot>,
    pub cycle: CycleSnapshot,
    #[serde(default)]
    pub landscape: LandscapeSnapshot,
}

impl SimulationSnapshot {
    /// Creates an empty snapshot.
    pub fn new(snapshot_id: impl Into<String>, tick: u64, triggered_by: impl Into<String>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            tick,
            triggered_by: triggered_by.into(),
            bees: Vec::new(),
            cycle: CycleSnapshot::default(),
            landscape: LandscapeSnapshot::default(),
        }
    }

    /// Finds a bee by index.
    pub fn find_bee(&self, index: usize) -> Option<&BeeSnapshot> {
        self.bees.iter().find(|b| b.index == index)
    }

    /// Returns bees currently in the given state.
    pub fn bees_in_state(&self, state: LifecycleState) -> Vec<&BeeSnapshot> {
        self.bees.iter().filter(|b| b.state == state).collect()
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the snapshot to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
