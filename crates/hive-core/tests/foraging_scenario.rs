//! End-to-end foraging scenarios
//!
//! Drives the controller through whole cycles the way a host would.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

use hive_core::events::{EventPayload, EventType};
use hive_core::setup;
use hive_core::{Bee, Config, ForagingSimulation, Hive, Landscape, LifecycleState};

/// One bee at the origin, one target 2.0 away, staging point 3.0 away
fn single_bee_scenario() -> ForagingSimulation {
    let hive = Hive::new(Vec2::new(-1.5, 3.0), 3.0, 3.0, Vec2::new(0.0, 3.0));
    let mut landscape = Landscape::new(hive);
    landscape.add_nectar(Vec2::new(2.0, 0.0));

    let mut config = Config::default();
    config.foraging.max_nectar_per_cycle = 1;
    ForagingSimulation::new(landscape, vec![Bee::new(Vec2::ZERO)], &config)
}

#[test]
fn test_single_bee_collects_and_settles() {
    let mut sim = single_bee_scenario();

    let mut ticks = 0;
    while sim.cycle().nectar_collected() == 0 {
        sim.tick();
        ticks += 1;
        assert!(ticks <= 10, "target never reached");
    }
    assert_eq!(ticks, 5);
    assert!(sim.landscape().nectar().is_empty());
    assert_eq!(sim.cycle().nectar_collected(), 1);
    assert_eq!(sim.bees()[0].state, LifecycleState::Returning);
    assert!(!sim.is_cycle_complete());

    while !sim.is_cycle_complete() {
        sim.tick();
        ticks += 1;
        assert!(ticks <= 40, "bee never made it home");
    }
    let bee = &sim.bees()[0];
    assert_eq!(bee.state, LifecycleState::Settled);
    assert_eq!(bee.position, Vec2::new(-1.25, 3.25));
    assert!(sim.cycle().settled().contains(&0));
}

#[test]
fn test_cycle_stays_complete_until_reset() {
    let mut sim = single_bee_scenario();
    for _ in 0..40 {
        sim.tick();
    }
    assert!(sim.is_cycle_complete());

    let position = sim.bees()[0].position;
    for _ in 0..10 {
        sim.tick();
        assert!(sim.is_cycle_complete());
    }
    assert_eq!(sim.bees()[0].position, position);

    sim.reset_for_new_cycle();
    assert!(!sim.is_cycle_complete());
    assert_eq!(sim.cycle().cycle_index(), 2);
}

#[test]
fn test_default_landscape_run_keeps_invariants() {
    let config = Config::default();
    let mut host_rng = SmallRng::seed_from_u64(1234);

    let landscape = setup::create_default_landscape();
    let targets = setup::spawn_targets(&landscape, &mut host_rng);
    let bees = setup::spawn_workers(&config, &landscape.hive, &mut host_rng);
    let mut sim = ForagingSimulation::new(landscape, bees, &config);
    sim.regenerate_targets(&targets.nectar, &targets.power_ups);

    let mut collected_targets = HashSet::new();
    let mut consumed_power_ups = HashSet::new();
    let mut last_event_number = 0u64;

    for _ in 0..2000 {
        sim.tick();

        for bee in sim.bees() {
            assert!((0.25..=1.0).contains(&bee.speed_multiplier()));
            assert!(bee.current_radius() >= bee.base_radius());
            assert!(bee.current_radius() <= bee.max_radius() + 1e-6);
        }
        assert!(sim.cycle().nectar_collected() <= sim.cycle().max_nectar_per_cycle());
        assert_eq!(
            sim.is_cycle_complete(),
            sim.bees().iter().all(|b| b.state == LifecycleState::Settled)
        );

        for event in sim.drain_events() {
            let number: u64 = event.event_id.trim_start_matches("evt_").parse().unwrap();
            assert!(number > last_event_number);
            last_event_number = number;

            match event.payload {
                EventPayload::NectarCollected { target_id, .. } => {
                    assert!(collected_targets.insert(target_id), "target {target_id} taken twice");
                }
                EventPayload::PowerUpConsumed { power_up_id, .. } => {
                    assert!(consumed_power_ups.insert(power_up_id));
                }
                _ => {}
            }
        }

        // Removed pickups never come back
        assert!(sim
            .landscape()
            .nectar()
            .iter()
            .all(|t| !collected_targets.contains(&t.id)));
        assert!(sim
            .landscape()
            .power_ups()
            .iter()
            .all(|p| !consumed_power_ups.contains(&p.id)));

        if sim.is_cycle_complete() {
            break;
        }
    }

    assert!(!collected_targets.is_empty());
    assert_eq!(collected_targets.len() as u64, sim.cycle().total_nectar_collected());
}

#[test]
fn test_host_style_cycle_transition() {
    let mut config = Config::default();
    config.foraging.worker_count = 2;
    config.foraging.max_nectar_per_cycle = 2;

    let mut host_rng = SmallRng::seed_from_u64(99);
    let mut landscape = setup::create_default_landscape();
    let hive = landscape.hive;
    // Nectar close to the hive keeps the cycle short
    landscape.add_nectar(Vec2::new(10.5, 3.5));
    landscape.add_nectar(Vec2::new(9.5, 2.5));
    let bees = setup::spawn_workers(&config, &hive, &mut host_rng);
    let mut sim = ForagingSimulation::new(landscape, bees, &config);

    for _ in 0..500 {
        sim.tick();
        if sim.is_cycle_complete() {
            break;
        }
    }
    assert!(sim.is_cycle_complete());
    assert_eq!(sim.cycle().nectar_collected(), 2);
    sim.drain_events();

    sim.reset_for_new_cycle();
    let targets = setup::spawn_targets(sim.landscape(), &mut host_rng);
    sim.regenerate_targets(&targets.nectar, &targets.power_ups);
    setup::place_workers_around_hive(sim.bees_mut(), &hive, true, &mut host_rng);

    assert_eq!(sim.cycle().cycle_index(), 2);
    assert_eq!(sim.cycle().nectar_collected(), 0);
    assert_eq!(sim.cycle().total_nectar_collected(), 2);
    assert!(sim.landscape().nectar().len() >= setup::MIN_NECTAR);
    for bee in sim.bees() {
        assert_eq!(bee.state, LifecycleState::Seeking);
        assert_eq!(bee.power_up_interactions(), 0);
        assert!(!hive.bounds.contains(bee.position));
    }

    let kinds: Vec<EventType> = sim.drain_events().iter().map(|e| e.event_type).collect();
    assert_eq!(kinds, vec![EventType::CycleStarted, EventType::TargetsRegenerated]);
}
