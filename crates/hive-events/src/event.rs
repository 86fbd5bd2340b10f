//! Event Types
//!
//! State changes observed while the foraging simulation ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// Primary event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    NectarCollected,
    PowerUpConsumed,
    Launched,
    Settled,
    CycleCompleted,
    CycleStarted,
    TargetsRegenerated,
}

impl EventType {
    /// Returns the snake_case name used in the JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NectarCollected => "nectar_collected",
            EventType::PowerUpConsumed => "power_up_consumed",
            EventType::Launched => "launched",
            EventType::Settled => "settled",
            EventType::CycleCompleted => "cycle_completed",
            EventType::CycleStarted => "cycle_started",
            EventType::TargetsRegenerated => "targets_regenerated",
        }
    }

    /// True for events that describe the whole cycle rather than one bee.
    pub fn is_cycle_level(&self) -> bool {
        matches!(
            self,
            EventType::CycleCompleted | EventType::CycleStarted | EventType::TargetsRegenerated
        )
    }

    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[
            EventType::NectarCollected,
            EventType::PowerUpConsumed,
            EventType::Launched,
            EventType::Settled,
            EventType::CycleCompleted,
            EventType::CycleStarted,
            EventType::TargetsRegenerated,
        ]
    }
}

/// Typed details for each event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// A bee reached its target and removed it from the pool
    NectarCollected {
        target_id: u32,
        position: Vec2,
        collected_this_cycle: u32,
    },
    /// A bee came within range of a power-up and consumed it
    PowerUpConsumed {
        power_up_id: u32,
        interactions: u32,
        new_radius: f32,
        new_speed: f32,
    },
    /// A bee dropped off nectar and jumped back out to forage
    Launched { from: Vec2, to: Vec2 },
    /// A bee took its slot inside the hive
    Settled { slot: Vec2 },
    /// Every bee is settled
    CycleCompleted {
        nectar_collected: u32,
        total_nectar: u64,
    },
    /// Counters and lifecycle states were reset
    CycleStarted,
    /// The host replaced the nectar and power-up pools
    TargetsRegenerated {
        nectar_count: usize,
        power_up_count: usize,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> EventType {
        match self {
            EventPayload::NectarCollected { .. } => EventType::NectarCollected,
            EventPayload::PowerUpConsumed { .. } => EventType::PowerUpConsumed,
            EventPayload::Launched { .. } => EventType::Launched,
            EventPayload::Settled { .. } => EventType::Settled,
            EventPayload::CycleCompleted { .. } => EventType::CycleCompleted,
            EventPayload::CycleStarted => EventType::CycleStarted,
            EventPayload::TargetsRegenerated { .. } => EventType::TargetsRegenerated,
        }
    }
}

/// A single simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForagingEvent {
    pub event_id: String,
    pub tick: u64,
    pub cycle: u32,
    /// Index of the bee involved, absent for cycle-level events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bee: Option<usize>,
    pub event_type: EventType,
    pub payload: EventPayload,
}

impl ForagingEvent {
    /// Creates an event; the type is taken from the payload.
    pub fn new(
        event_id: impl Into<String>,
        tick: u64,
        cycle: u32,
        bee: Option<usize>,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            tick,
            cycle,
            bee,
            event_type: payload.event_type(),
            payload,
        }
    }

    /// Serializes the event as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
