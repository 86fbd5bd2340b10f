//! Foraging Cycle Bookkeeping
//!
//! Per-cycle counters, the returning/settled index sets and the bee → target
//! assignment map. The cycle is reset between rounds, never rebuilt.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::components::PickupId;

/// Counters and ownership records for one foraging round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForagingCycle {
    cycle_index: u32,
    nectar_collected: u32,
    max_nectar_per_cycle: u32,
    total_nectar_collected: u64,
    returning: BTreeSet<usize>,
    settled: BTreeSet<usize>,
    assignments: BTreeMap<usize, PickupId>,
}

impl ForagingCycle {
    /// Start the first cycle with the given quota
    pub fn new(max_nectar_per_cycle: u32) -> Self {
        Self {
            cycle_index: 1,
            nectar_collected: 0,
            max_nectar_per_cycle,
            total_nectar_collected: 0,
            returning: BTreeSet::new(),
            settled: BTreeSet::new(),
            assignments: BTreeMap::new(),
        }
    }

    pub fn cycle_index(&self) -> u32 {
        self.cycle_index
    }

    pub fn nectar_collected(&self) -> u32 {
        self.nectar_collected
    }

    pub fn max_nectar_per_cycle(&self) -> u32 {
        self.max_nectar_per_cycle
    }

    /// Nectar collected over every cycle so far, this one included
    pub fn total_nectar_collected(&self) -> u64 {
        self.total_nectar_collected
    }

    pub fn quota_reached(&self) -> bool {
        self.nectar_collected >= self.max_nectar_per_cycle
    }

    /// Share of the quota collected this cycle, in [0, 1]
    pub fn fill_level(&self) -> f32 {
        if self.max_nectar_per_cycle == 0 {
            return 1.0;
        }
        (self.nectar_collected as f32 / self.max_nectar_per_cycle as f32).clamp(0.0, 1.0)
    }

    /// Count one collected nectar and return this cycle's new count
    pub fn record_collection(&mut self) -> u32 {
        self.nectar_collected += 1;
        self.total_nectar_collected += 1;
        self.nectar_collected
    }

    pub fn returning(&self) -> &BTreeSet<usize> {
        &self.returning
    }

    pub fn settled(&self) -> &BTreeSet<usize> {
        &self.settled
    }

    pub fn mark_returning(&mut self, bee: usize) {
        self.returning.insert(bee);
    }

    /// The bee reached the staging point
    pub fn mark_arrived(&mut self, bee: usize) {
        self.returning.remove(&bee);
    }

    pub fn mark_settled(&mut self, bee: usize) {
        self.returning.remove(&bee);
        self.settled.insert(bee);
    }

    pub fn assignments(&self) -> &BTreeMap<usize, PickupId> {
        &self.assignments
    }

    pub fn assignment(&self, bee: usize) -> Option<PickupId> {
        self.assignments.get(&bee).copied()
    }

    pub fn assign(&mut self, bee: usize, target: PickupId) {
        self.assignments.insert(bee, target);
    }

    pub fn release(&mut self, bee: usize) -> Option<PickupId> {
        self.assignments.remove(&bee)
    }

    pub fn clear_assignments(&mut self) {
        self.assignments.clear();
    }

    /// Clear per-cycle state and move on to the next cycle index
    pub fn reset(&mut self) {
        self.returning.clear();
        self.settled.clear();
        self.assignments.clear();
        self.nectar_collected = 0;
        self.cycle_index += 1;
    }
}
