//! Determinism verification tests
//!
//! The same seed and configuration must reproduce the same spawn layout,
//! trajectories and event stream.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use hive_core::events::ForagingEvent;
use hive_core::setup;
use hive_core::{Config, ForagingSimulation};

struct RunRecord {
    nectar: Vec<Vec2>,
    power_ups: Vec<Vec2>,
    trajectory: Vec<Vec<Vec2>>,
    events: Vec<ForagingEvent>,
}

fn run(seed: u64, ticks: u64) -> RunRecord {
    let mut config = Config::default();
    config.simulation.seed = seed;
    config.foraging.worker_count = 4;

    let mut host_rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
    let landscape = setup::create_default_landscape();
    let targets = setup::spawn_targets(&landscape, &mut host_rng);
    let bees = setup::spawn_workers(&config, &landscape.hive, &mut host_rng);

    let mut sim = ForagingSimulation::new(landscape, bees, &config);
    sim.regenerate_targets(&targets.nectar, &targets.power_ups);

    let mut trajectory = Vec::new();
    let mut events = sim.drain_events();
    for _ in 0..ticks {
        sim.tick();
        trajectory.push(sim.bees().iter().map(|b| b.position).collect());
        events.extend(sim.drain_events());
    }

    RunRecord {
        nectar: targets.nectar,
        power_ups: targets.power_ups,
        trajectory,
        events,
    }
}

/// Same seed, same spawn layout
#[test]
fn test_spawning_determinism() {
    let first = run(42, 0);
    let second = run(42, 0);

    assert_eq!(first.nectar, second.nectar);
    assert_eq!(first.power_ups, second.power_ups);
}

/// Same seed, same positions after every tick
#[test]
fn test_trajectory_determinism() {
    let first = run(42, 300);
    let second = run(42, 300);

    assert_eq!(first.trajectory.len(), 300);
    assert_eq!(first.trajectory, second.trajectory, "bee trajectories diverged");
}

/// Same seed, byte-identical event log
#[test]
fn test_event_stream_determinism() {
    let first = run(7, 500);
    let second = run(7, 500);

    let lines = |record: &RunRecord| -> Vec<String> {
        record
            .events
            .iter()
            .map(|e| e.to_jsonl().unwrap())
            .collect()
    };
    assert!(!first.events.is_empty());
    assert_eq!(lines(&first), lines(&second));
}

/// Different seeds should lay out a different field
#[test]
fn test_different_seeds_differ() {
    let first = run(42, 50);
    let second = run(43, 50);

    assert!(
        first.nectar != second.nectar
            || first.power_ups != second.power_ups
            || first.trajectory != second.trajectory,
        "Different seeds should produce different runs"
    );
}

/// Controllers seeded alike make the same random choices on the same input
#[test]
fn test_controller_rng_is_per_session() {
    let config = Config::default();
    let make = || {
        let mut landscape = setup::create_default_landscape();
        landscape.add_nectar(Vec2::new(13.5, 11.0));
        // Straight north runs into the pond, forcing jittered detours
        let bee = hive_core::Bee::new(Vec2::new(13.5, 4.6));
        ForagingSimulation::new(landscape, vec![bee], &config)
    };

    let mut a = make();
    let mut b = make();
    // Interleaving must not matter: each session owns its RNG
    for _ in 0..20 {
        a.tick();
        b.tick();
        b.tick();
        a.tick();
        assert_eq!(a.bees()[0].position, b.bees()[0].position);
    }
}
