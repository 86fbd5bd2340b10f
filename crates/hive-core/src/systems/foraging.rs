//! Foraging Controller
//!
//! Owns the bees, the landscape and the cycle counters and advances them one
//! tick at a time. Within a tick, bees are processed in index order. Each
//! non-settled bee first checks for power-ups, then branches on its lifecycle
//! state, then picks a target and moves.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use hive_events::{EventPayload, ForagingEvent};

use super::assignment::find_target;
use super::cycle::ForagingCycle;
use super::power_up::check_interaction;
use super::steering::SteeringEngine;
use crate::components::{Bee, Landscape, LifecycleState};
use crate::config::{Config, ForagingConfig, PowerUpConfig};
use crate::events::PendingEvents;

/// The simulation session: every piece of mutable foraging state
#[derive(Resource)]
pub struct ForagingSimulation {
    landscape: Landscape,
    bees: Vec<Bee>,
    cycle: ForagingCycle,
    steering: SteeringEngine,
    foraging: ForagingConfig,
    power_ups: PowerUpConfig,
    rng: SmallRng,
    ticks_elapsed: u64,
    events: PendingEvents,
}

impl ForagingSimulation {
    /// Build a session seeded from `config.simulation.seed`
    pub fn new(landscape: Landscape, bees: Vec<Bee>, config: &Config) -> Self {
        Self::with_rng(
            landscape,
            bees,
            config,
            SmallRng::seed_from_u64(config.simulation.seed),
        )
    }

    pub fn with_rng(landscape: Landscape, bees: Vec<Bee>, config: &Config, rng: SmallRng) -> Self {
        Self {
            landscape,
            bees,
            cycle: ForagingCycle::new(config.foraging.max_nectar_per_cycle),
            steering: SteeringEngine::new(config.steering.clone()),
            foraging: config.foraging.clone(),
            power_ups: config.power_ups.clone(),
            rng,
            ticks_elapsed: 0,
            events: PendingEvents::new(),
        }
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn bees(&self) -> &[Bee] {
        &self.bees
    }

    /// Mutable access for the host, e.g. to reposition bees between cycles
    pub fn bees_mut(&mut self) -> &mut [Bee] {
        &mut self.bees
    }

    pub fn cycle(&self) -> &ForagingCycle {
        &self.cycle
    }

    /// Number of ticks advanced so far
    pub fn current_tick(&self) -> u64 {
        self.ticks_elapsed
    }

    /// True once every bee is settled
    pub fn is_cycle_complete(&self) -> bool {
        self.bees.iter().all(Bee::is_settled)
    }

    /// The pool is empty or this cycle's quota has been reached
    pub fn are_all_nectar_collected(&self) -> bool {
        self.landscape.nectar().is_empty() || self.cycle.quota_reached()
    }

    pub fn pending_events(&self) -> &[ForagingEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<ForagingEvent> {
        self.events.drain()
    }

    fn record(&mut self, bee: Option<usize>, payload: EventPayload) {
        self.events
            .record(self.ticks_elapsed, self.cycle.cycle_index(), bee, payload);
    }

    /// Advance every bee by one tick
    pub fn tick(&mut self) {
        self.ticks_elapsed += 1;
        if self.is_cycle_complete() {
            return;
        }

        for index in 0..self.bees.len() {
            if self.bees[index].is_settled() {
                continue;
            }

            self.check_power_ups(index);

            match self.bees[index].state {
                LifecycleState::Seeking => self.advance_seeking(index),
                LifecycleState::Returning => self.advance_returning(index),
                LifecycleState::Settled => {}
            }
        }

        if self.is_cycle_complete() {
            tracing::info!(
                cycle = self.cycle.cycle_index(),
                nectar = self.cycle.nectar_collected(),
                tick = self.ticks_elapsed,
                "Foraging cycle complete"
            );
            let payload = EventPayload::CycleCompleted {
                nectar_collected: self.cycle.nectar_collected(),
                total_nectar: self.cycle.total_nectar_collected(),
            };
            self.record(None, payload);
        }
    }

    fn check_power_ups(&mut self, index: usize) {
        let hit = check_interaction(
            &mut self.bees[index],
            self.landscape.power_ups_mut(),
            &self.power_ups,
        );

        if let Some(hit) = hit {
            tracing::debug!(
                bee = index,
                power_up = hit.power_up.id,
                radius = hit.effect.new_radius,
                speed = hit.effect.new_speed,
                "Power-up consumed"
            );
            self.record(
                Some(index),
                EventPayload::PowerUpConsumed {
                    power_up_id: hit.power_up.id,
                    interactions: hit.effect.interactions,
                    new_radius: hit.effect.new_radius,
                    new_speed: hit.effect.new_speed,
                },
            );
        }
    }

    fn advance_seeking(&mut self, index: usize) {
        if self.are_all_nectar_collected() {
            self.cycle.release(index);
            self.begin_return(index);
            return;
        }

        // Another bee may have taken the held target since the last tick
        if let Some(id) = self.cycle.assignment(index) {
            if self.landscape.find_nectar(id).is_none() {
                self.cycle.release(index);
            }
        }

        let target = match self.cycle.assignment(index) {
            Some(id) => self.landscape.find_nectar(id).copied(),
            None => {
                let found = find_target(
                    self.bees[index].position,
                    self.landscape.nectar(),
                    self.cycle.assignments(),
                )
                .copied();
                if let Some(target) = found {
                    self.cycle.assign(index, target.id);
                }
                found
            }
        };

        let Some(target) = target else {
            self.begin_return(index);
            return;
        };

        let distance = self.steering.move_towards(
            &mut self.bees[index],
            target.position,
            &self.landscape,
            &mut self.rng,
        );

        if distance < self.foraging.arrival_threshold
            && self.landscape.take_nectar(target.id).is_some()
        {
            self.cycle.release(index);
            let collected = self.cycle.record_collection();
            self.bees[index].state = LifecycleState::Returning;
            self.cycle.mark_returning(index);

            tracing::debug!(bee = index, target = target.id, collected, "Nectar collected");
            self.record(
                Some(index),
                EventPayload::NectarCollected {
                    target_id: target.id,
                    position: target.position,
                    collected_this_cycle: collected,
                },
            );
        }
    }

    fn begin_return(&mut self, index: usize) {
        self.bees[index].state = LifecycleState::Returning;
        self.cycle.mark_returning(index);
    }

    fn advance_returning(&mut self, index: usize) {
        let staging = self.landscape.hive.staging_point;
        let distance = self.steering.move_towards(
            &mut self.bees[index],
            staging,
            &self.landscape,
            &mut self.rng,
        );

        if distance >= self.foraging.arrival_threshold {
            return;
        }

        self.cycle.mark_arrived(index);
        if self.are_all_nectar_collected() {
            self.settle(index);
        } else {
            self.launch(index);
        }
    }

    fn settle(&mut self, index: usize) {
        let slot = self.landscape.hive.settle_slot(index);
        let bee = &mut self.bees[index];
        bee.position = slot;
        bee.state = LifecycleState::Settled;
        self.cycle.mark_settled(index);

        tracing::debug!(bee = index, ?slot, "Bee settled in hive");
        self.record(Some(index), EventPayload::Settled { slot });
    }

    /// Instantaneous jump away from the staging point, not a steered step
    fn launch(&mut self, index: usize) {
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = self
            .rng
            .gen_range(self.foraging.launch_min..=self.foraging.launch_max);

        let bee = &mut self.bees[index];
        let from = bee.position;
        let to = from + Vec2::new(angle.cos(), angle.sin()) * distance;
        bee.position = to;
        bee.state = LifecycleState::Seeking;

        tracing::debug!(bee = index, ?from, ?to, "Bee launched from hive");
        self.record(Some(index), EventPayload::Launched { from, to });
    }

    /// Start the next cycle.
    ///
    /// Clears the returning and settled sets and all assignments, zeroes this
    /// cycle's counter and sends every bee back to seeking. Leftover pickups
    /// are discarded. Power-up growth is kept; hosts that want it gone call
    /// [`Bee::reset_attributes`] separately.
    pub fn reset_for_new_cycle(&mut self) {
        self.cycle.reset();
        self.landscape.clear_pickups();
        for bee in &mut self.bees {
            bee.reset_for_cycle();
        }

        tracing::info!(cycle = self.cycle.cycle_index(), "Starting new foraging cycle");
        self.record(None, EventPayload::CycleStarted);
    }

    /// Replace the nectar and power-up pools with freshly spawned positions
    pub fn regenerate_targets(&mut self, nectar: &[Vec2], power_ups: &[Vec2]) {
        self.landscape.clear_pickups();
        for &position in nectar {
            self.landscape.add_nectar(position);
        }
        for &position in power_ups {
            self.landscape.add_power_up(position);
        }
        self.cycle.clear_assignments();

        tracing::debug!(
            nectar = nectar.len(),
            power_ups = power_ups.len(),
            "Targets regenerated"
        );
        self.record(
            None,
            EventPayload::TargetsRegenerated {
                nectar_count: nectar.len(),
                power_up_count: power_ups.len(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Hive;
    use hive_events::EventType;

    /// Hive whose staging point sits 3.0 above the origin
    fn open_landscape() -> Landscape {
        Landscape::new(Hive::new(
            Vec2::new(-1.5, 3.0),
            3.0,
            3.0,
            Vec2::new(0.0, 3.0),
        ))
    }

    fn config_with_quota(quota: u32) -> Config {
        let mut config = Config::default();
        config.foraging.max_nectar_per_cycle = quota;
        config
    }

    fn event_types(sim: &ForagingSimulation) -> Vec<EventType> {
        sim.pending_events().iter().map(|e| e.event_type).collect()
    }

    #[test]
    fn test_arrival_below_threshold_collects() {
        let mut landscape = open_landscape();
        landscape.add_nectar(Vec2::new(0.59, 0.0));
        let mut sim =
            ForagingSimulation::new(landscape, vec![Bee::new(Vec2::ZERO)], &config_with_quota(5));

        sim.tick();
        assert!(sim.landscape().nectar().is_empty());
        assert_eq!(sim.cycle().nectar_collected(), 1);
        assert_eq!(sim.bees()[0].state, LifecycleState::Returning);
    }

    #[test]
    fn test_arrival_above_threshold_does_not_collect() {
        let mut landscape = open_landscape();
        landscape.add_nectar(Vec2::new(0.61, 0.0));
        let mut sim =
            ForagingSimulation::new(landscape, vec![Bee::new(Vec2::ZERO)], &config_with_quota(5));

        sim.tick();
        assert_eq!(sim.landscape().nectar().len(), 1);
        assert_eq!(sim.cycle().nectar_collected(), 0);
        assert_eq!(sim.bees()[0].state, LifecycleState::Seeking);
        assert_eq!(sim.cycle().assignment(0), sim.landscape().nectar().first().map(|t| t.id));

        // Now 0.21 away
        sim.tick();
        assert_eq!(sim.cycle().nectar_collected(), 1);
    }

    #[test]
    fn test_target_consumed_once_by_converging_bees() {
        let mut landscape = open_landscape();
        let target = landscape.add_nectar(Vec2::new(2.0, 0.0));
        let bees = vec![Bee::new(Vec2::new(1.0, 0.0)), Bee::new(Vec2::new(2.3, 0.0))];
        let mut sim = ForagingSimulation::new(landscape, bees, &config_with_quota(5));

        // Both hold the only target; the closer bee takes it
        sim.tick();
        assert_eq!(sim.cycle().nectar_collected(), 1);
        assert_eq!(sim.cycle().assignment(0), Some(target));
        assert_eq!(sim.bees()[1].state, LifecycleState::Returning);

        sim.tick();
        assert_eq!(sim.cycle().assignment(0), None);
        assert_eq!(sim.bees()[0].state, LifecycleState::Returning);

        let collected: Vec<_> = sim
            .pending_events()
            .iter()
            .filter(|e| e.event_type == EventType::NectarCollected)
            .collect();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].bee, Some(1));
    }

    #[test]
    fn test_power_up_checked_before_moving() {
        let mut landscape = open_landscape();
        landscape.add_nectar(Vec2::new(5.0, 0.0));
        landscape.add_power_up(Vec2::new(0.2, 0.0));
        let mut sim =
            ForagingSimulation::new(landscape, vec![Bee::new(Vec2::ZERO)], &config_with_quota(5));

        sim.tick();
        assert!(sim.landscape().power_ups().is_empty());
        let bee = &sim.bees()[0];
        assert_eq!(bee.power_up_interactions(), 1);
        // The first step already uses the reduced speed
        assert!((bee.position.x - 0.3).abs() < 1e-5);
        assert_eq!(event_types(&sim), vec![EventType::PowerUpConsumed]);
    }

    #[test]
    fn test_returning_bee_launches_while_nectar_remains() {
        let mut landscape = open_landscape();
        landscape.add_nectar(Vec2::new(8.0, 8.0));
        let mut bee = Bee::new(Vec2::new(0.0, 2.7));
        bee.state = LifecycleState::Returning;
        let mut sim = ForagingSimulation::new(landscape, vec![bee], &config_with_quota(5));

        sim.tick();
        let bee = &sim.bees()[0];
        assert_eq!(bee.state, LifecycleState::Seeking);

        let events = sim.pending_events();
        assert_eq!(events.len(), 1);
        match events[0].payload {
            EventPayload::Launched { from, to } => {
                let jump = from.distance(to);
                assert!((0.8..=1.2).contains(&jump), "jump of {jump}");
                assert_eq!(to, bee.position);
            }
            ref other => panic!("expected launch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_pool_sends_bees_home() {
        let mut sim = ForagingSimulation::new(
            open_landscape(),
            vec![Bee::new(Vec2::new(0.0, 2.0))],
            &config_with_quota(5),
        );

        sim.tick();
        assert_eq!(sim.bees()[0].state, LifecycleState::Returning);
        assert!(sim.cycle().returning().contains(&0));

        for _ in 0..10 {
            sim.tick();
        }
        assert!(sim.is_cycle_complete());
        assert_eq!(sim.cycle().nectar_collected(), 0);
    }

    #[test]
    fn test_single_bee_cycle_and_reset() {
        let mut landscape = open_landscape();
        landscape.add_nectar(Vec2::new(2.0, 0.0));
        landscape.add_nectar(Vec2::new(6.0, 0.0));
        let mut sim =
            ForagingSimulation::new(landscape, vec![Bee::new(Vec2::ZERO)], &config_with_quota(1));

        let mut ticks = 0;
        while !sim.is_cycle_complete() && ticks < 100 {
            sim.tick();
            ticks += 1;
        }
        assert!(sim.is_cycle_complete());
        assert_eq!(sim.cycle().nectar_collected(), 1);
        // Quota reached with nectar left over
        assert_eq!(sim.landscape().nectar().len(), 1);
        assert_eq!(sim.bees()[0].position, sim.landscape().hive.settle_slot(0));
        assert_eq!(
            event_types(&sim),
            vec![
                EventType::NectarCollected,
                EventType::Settled,
                EventType::CycleCompleted
            ]
        );

        // Completed cycles stay complete
        sim.tick();
        assert!(sim.is_cycle_complete());
        assert_eq!(sim.drain_events().len(), 3);

        sim.reset_for_new_cycle();
        assert!(!sim.is_cycle_complete());
        assert_eq!(sim.cycle().cycle_index(), 2);
        assert_eq!(sim.cycle().nectar_collected(), 0);
        assert_eq!(sim.cycle().total_nectar_collected(), 1);
        assert!(sim.cycle().settled().is_empty());
        assert!(sim.landscape().nectar().is_empty());
        assert_eq!(sim.bees()[0].state, LifecycleState::Seeking);

        sim.regenerate_targets(&[Vec2::new(11.0, 3.0)], &[Vec2::new(4.0, 4.0)]);
        assert_eq!(sim.landscape().nectar().len(), 1);
        assert_eq!(sim.landscape().power_ups().len(), 1);

        let events = sim.drain_events();
        assert_eq!(events[0].event_type, EventType::CycleStarted);
        assert_eq!(events[0].cycle, 2);
        assert_eq!(events[1].event_type, EventType::TargetsRegenerated);
    }

    #[test]
    fn test_reset_keeps_power_up_growth() {
        let mut landscape = open_landscape();
        landscape.add_power_up(Vec2::ZERO);
        let mut sim =
            ForagingSimulation::new(landscape, vec![Bee::new(Vec2::ZERO)], &config_with_quota(1));

        sim.tick();
        assert_eq!(sim.bees()[0].power_up_interactions(), 1);

        sim.reset_for_new_cycle();
        assert!((sim.bees()[0].current_radius() - 0.15).abs() < 1e-6);

        sim.bees_mut()[0].reset_attributes();
        assert_eq!(sim.bees()[0].current_radius(), 0.1);
    }
}
