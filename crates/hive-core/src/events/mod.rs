//! Event System
//!
//! Buffering foraging events during a tick and appending them to a JSONL log.

pub mod logger;

pub use hive_events::{EventPayload, EventType, ForagingEvent};
pub use logger::{EventLogger, PendingEvents};
