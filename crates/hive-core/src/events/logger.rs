//! Event Logger
//!
//! Append-only JSONL event logging.

use bevy_ecs::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use hive_events::{generate_event_id, EventPayload, ForagingEvent};

/// Resource for logging events to a JSONL file
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
}

impl EventLogger {
    /// Create a new event logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
        })
    }

    /// Create a logger that discards events
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
        }
    }

    /// Get the current event count
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Log an event to the file
    pub fn log(&mut self, event: &ForagingEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = event.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Log multiple events
    pub fn log_batch(&mut self, events: &[ForagingEvent]) -> std::io::Result<()> {
        for event in events {
            self.log(event)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush event logger: {}", e);
        }
    }
}

/// Events recorded since the host last drained them
#[derive(Debug)]
pub struct PendingEvents {
    events: Vec<ForagingEvent>,
    next_event_id: u64,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_event_id: 1,
        }
    }

    /// Record an event with the next sequential id
    pub fn record(&mut self, tick: u64, cycle: u32, bee: Option<usize>, payload: EventPayload) {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        self.events.push(ForagingEvent::new(id, tick, cycle, bee, payload));
    }

    pub fn events(&self) -> &[ForagingEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ForagingEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for PendingEvents {
    fn default() -> Self {
        Self::new()
    }
}
