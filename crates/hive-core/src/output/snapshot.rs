//! Snapshot Generation
//!
//! Captures what a renderer needs from the simulation at a tick and writes it
//! to the output directory.

use bevy_ecs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use hive_events::{
    generate_snapshot_id, BeeSnapshot, CycleSnapshot, LandscapeSnapshot, SimulationSnapshot,
};

use crate::systems::ForagingSimulation;

/// Failure writing simulation output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resource to track snapshot generation
#[derive(Resource)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u64,
    last_snapshot_tick: Option<u64>,
}

impl SnapshotGenerator {
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
            last_snapshot_tick: None,
        }
    }

    /// Tick 0 and every interval, never twice for the same tick.
    /// An interval of 0 disables periodic snapshots.
    pub fn should_snapshot(&self, current_tick: u64) -> bool {
        if self.last_snapshot_tick == Some(current_tick) {
            return false;
        }
        current_tick == 0
            || (self.snapshot_interval > 0 && current_tick % self.snapshot_interval == 0)
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn mark_snapshot(&mut self, tick: u64) {
        self.last_snapshot_tick = Some(tick);
    }

    pub fn last_snapshot_tick(&self) -> Option<u64> {
        self.last_snapshot_tick
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Build a snapshot of the current simulation state
pub fn generate_snapshot(
    sim: &ForagingSimulation,
    snapshot_id: impl Into<String>,
    triggered_by: &str,
) -> SimulationSnapshot {
    let mut snapshot = SimulationSnapshot::new(snapshot_id, sim.current_tick(), triggered_by);
    let cycle = sim.cycle();

    snapshot.bees = sim
        .bees()
        .iter()
        .enumerate()
        .map(|(index, bee)| BeeSnapshot {
            index,
            position: bee.position,
            radius: bee.current_radius(),
            speed_multiplier: bee.speed_multiplier(),
            state: bee.state,
            power_up_interactions: bee.power_up_interactions(),
            target_id: cycle.assignment(index),
        })
        .collect();

    snapshot.cycle = CycleSnapshot {
        cycle_index: cycle.cycle_index(),
        nectar_collected: cycle.nectar_collected(),
        max_nectar_per_cycle: cycle.max_nectar_per_cycle(),
        total_nectar_collected: cycle.total_nectar_collected(),
        fill_level: cycle.fill_level(),
        complete: sim.is_cycle_complete(),
        returning: cycle.returning().iter().copied().collect(),
        settled: cycle.settled().iter().copied().collect(),
    };

    snapshot.landscape = LandscapeSnapshot {
        remaining_nectar: sim.landscape().nectar().len(),
        remaining_power_ups: sim.landscape().power_ups().len(),
    };

    snapshot
}

/// Write snapshot to file
pub fn write_snapshot(snapshot: &SimulationSnapshot, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let json = snapshot.to_json_pretty()?;
    fs::write(path, json)?;
    Ok(())
}

/// Write snapshot to `<output_dir>/snapshots/snap_NNNNNN.json`, keyed by tick
pub fn write_snapshot_to_dir(
    snapshot: &SimulationSnapshot,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, OutputError> {
    let dir = output_dir.as_ref().join("snapshots");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("snap_{:06}.json", snapshot.tick));
    write_snapshot(snapshot, &path)?;
    Ok(path)
}

/// Write current state (overwrites each time)
pub fn write_current_state(
    snapshot: &SimulationSnapshot,
    output_dir: impl AsRef<Path>,
) -> Result<(), OutputError> {
    write_snapshot(snapshot, output_dir.as_ref().join("current_state.json"))
}
