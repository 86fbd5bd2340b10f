//! Hive Foraging Simulation
//!
//! Headless host: builds the default landscape, runs foraging cycles until the
//! cycle or tick limit, and writes events and snapshots for external viewers.

use bevy_ecs::prelude::*;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use hive_core::config::{Config, ConfigError};
use hive_core::events::EventLogger;
use hive_core::output::{self, OutputError, SnapshotGenerator};
use hive_core::setup;
use hive_core::{ForagingSimulation, SimRng};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "hive_sim")]
#[command(about = "A headless worker-bee foraging simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of foraging cycles to complete
    #[arg(long)]
    cycles: Option<u32>,

    /// Number of worker bees (1 to 4)
    #[arg(long)]
    workers: Option<usize>,

    /// Nectar quota per cycle
    #[arg(long)]
    quota: Option<u32>,

    /// Tuning file (TOML); defaults to hive_tuning.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for events and snapshots
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Skip writing events and snapshots
    #[arg(long)]
    no_output: bool,
}

impl Args {
    fn apply_to(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            config.simulation.max_ticks = ticks;
        }
        if let Some(cycles) = self.cycles {
            config.simulation.max_cycles = cycles;
        }
        if let Some(workers) = self.workers {
            config.foraging.worker_count = workers;
        }
        if let Some(quota) = self.quota {
            config.foraging.max_nectar_per_cycle = quota;
        }
    }
}

/// Errors that stop the host before or during a run
#[derive(Debug, Error)]
enum HostError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("output: {0}")]
    Output(#[from] OutputError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Global simulation state resource
#[derive(Resource)]
pub struct SimulationState {
    pub current_tick: u64,
    pub max_ticks: u64,
    pub max_cycles: u32,
    pub cycles_completed: u32,
    pub wait_ticks_between_cycles: u64,
}

/// Where the host is between cycles
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPhase {
    Foraging,
    /// Cycle finished at `since`; the next one starts after the wait
    Waiting { since: u64 },
    Finished,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn load_config(args: &Args) -> Result<Config, HostError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), HostError> {
    let config = load_config(args)?;
    let sim_config = &config.simulation;

    println!("Hive Foraging Simulation");
    println!("========================");
    println!("Seed: {}", sim_config.seed);
    println!("Max ticks: {}", sim_config.max_ticks);
    println!("Cycles: {}", sim_config.max_cycles);
    println!("Workers: {}", config.foraging.worker_count);
    println!("Quota per cycle: {}", config.foraging.max_nectar_per_cycle);
    println!();

    let output_dir = if args.no_output {
        None
    } else {
        fs::create_dir_all(args.output_dir.join("snapshots"))?;
        Some(args.output_dir.clone())
    };

    // Host spawning draws from its own stream so the bees' RNG is untouched
    let mut host_rng = SmallRng::seed_from_u64(sim_config.seed.wrapping_add(1));

    println!("Creating landscape...");
    let landscape = setup::create_default_landscape();
    let targets = setup::spawn_targets(&landscape, &mut host_rng);
    let bees = setup::spawn_workers(&config, &landscape.hive, &mut host_rng);
    println!(
        "  {} nectar targets, {} power-ups, {} workers",
        targets.nectar.len(),
        targets.power_ups.len(),
        bees.len()
    );

    let mut simulation = ForagingSimulation::new(landscape, bees, &config);
    simulation.regenerate_targets(&targets.nectar, &targets.power_ups);

    let logger = match &output_dir {
        Some(dir) => EventLogger::new(dir.join("events.jsonl"))?,
        None => EventLogger::null(),
    };

    // Initialize the ECS world
    let mut world = World::new();
    world.insert_resource(SimulationState {
        current_tick: 0,
        max_ticks: sim_config.max_ticks,
        max_cycles: sim_config.max_cycles,
        cycles_completed: 0,
        wait_ticks_between_cycles: sim_config.wait_ticks_between_cycles,
    });
    world.insert_resource(HostPhase::Foraging);
    world.insert_resource(SimRng(host_rng));
    world.insert_resource(simulation);
    world.insert_resource(logger);
    world.insert_resource(SnapshotGenerator::new(sim_config.snapshot_interval));

    // Flush the initial regeneration event before the first tick
    flush_events(&mut world);
    take_snapshot(&mut world, output_dir.as_deref(), "simulation_start")?;

    let mut schedule = Schedule::default();
    schedule.add_systems((advance_simulation, handle_cycle_transition, log_events).chain());

    println!();
    println!("Starting simulation...");
    println!();

    for tick in 1..=sim_config.max_ticks {
        world.resource_mut::<SimulationState>().current_tick = tick;
        schedule.run(&mut world);

        let should_snapshot = world.resource::<SnapshotGenerator>().should_snapshot(tick);
        if should_snapshot {
            take_snapshot(&mut world, output_dir.as_deref(), "periodic")?;
        }

        if tick % 100 == 0 {
            let sim = world.resource::<ForagingSimulation>();
            let cycle = sim.cycle();
            println!(
                "Tick {} / {} - cycle {}: {}/{} nectar",
                tick,
                sim_config.max_ticks,
                cycle.cycle_index(),
                cycle.nectar_collected(),
                cycle.max_nectar_per_cycle()
            );
        }

        if *world.resource::<HostPhase>() == HostPhase::Finished {
            break;
        }
    }

    take_snapshot(&mut world, output_dir.as_deref(), "simulation_end")?;
    world.resource_mut::<EventLogger>().flush()?;

    let state = world.resource::<SimulationState>();
    let sim = world.resource::<ForagingSimulation>();
    println!();
    println!(
        "Simulation complete. Ran {} ticks, {} of {} cycles completed.",
        state.current_tick, state.cycles_completed, state.max_cycles
    );
    println!(
        "Total nectar collected: {}",
        sim.cycle().total_nectar_collected()
    );
    println!(
        "Logged {} events, generated {} snapshots.",
        world.resource::<EventLogger>().event_count(),
        world.resource::<SnapshotGenerator>().snapshot_count()
    );

    Ok(())
}

/// Advance every bee by one tick
fn advance_simulation(mut sim: ResMut<ForagingSimulation>) {
    sim.tick();
}

/// Count finished cycles and start the next one after the wait
fn handle_cycle_transition(
    mut sim: ResMut<ForagingSimulation>,
    mut phase: ResMut<HostPhase>,
    mut state: ResMut<SimulationState>,
    mut rng: ResMut<SimRng>,
) {
    let tick = state.current_tick;

    match *phase {
        HostPhase::Foraging => {
            if !sim.is_cycle_complete() {
                return;
            }
            state.cycles_completed += 1;
            if state.cycles_completed >= state.max_cycles {
                tracing::info!(cycles = state.cycles_completed, tick, "All cycles complete");
                *phase = HostPhase::Finished;
            } else {
                *phase = HostPhase::Waiting { since: tick };
            }
        }
        HostPhase::Waiting { since } => {
            if tick.saturating_sub(since) < state.wait_ticks_between_cycles {
                return;
            }
            start_next_cycle(&mut sim, &mut rng.0);
            *phase = HostPhase::Foraging;
        }
        HostPhase::Finished => {}
    }
}

/// Reset counters, respawn pickups and bring the bees back to the hive
fn start_next_cycle(sim: &mut ForagingSimulation, rng: &mut SmallRng) {
    sim.reset_for_new_cycle();

    let targets = setup::spawn_targets(sim.landscape(), rng);
    sim.regenerate_targets(&targets.nectar, &targets.power_ups);

    let hive = sim.landscape().hive;
    setup::place_workers_around_hive(sim.bees_mut(), &hive, true, rng);
}

/// Append this tick's events to the event log
fn log_events(mut sim: ResMut<ForagingSimulation>, mut logger: ResMut<EventLogger>) {
    let events = sim.drain_events();
    if let Err(e) = logger.log_batch(&events) {
        tracing::warn!("Failed to log {} events: {}", events.len(), e);
    }
}

fn flush_events(world: &mut World) {
    let events = world.resource_mut::<ForagingSimulation>().drain_events();
    if let Err(e) = world.resource_mut::<EventLogger>().log_batch(&events) {
        tracing::warn!("Failed to log {} events: {}", events.len(), e);
    }
}

/// Generate a snapshot and write it when output is enabled
fn take_snapshot(
    world: &mut World,
    output_dir: Option<&Path>,
    triggered_by: &str,
) -> Result<(), OutputError> {
    let tick = world.resource::<SimulationState>().current_tick;
    if world.resource::<SnapshotGenerator>().last_snapshot_tick() == Some(tick) {
        return Ok(());
    }

    let snapshot_id = world.resource_mut::<SnapshotGenerator>().next_id();
    let snapshot = output::generate_snapshot(
        world.resource::<ForagingSimulation>(),
        snapshot_id,
        triggered_by,
    );
    world.resource_mut::<SnapshotGenerator>().mark_snapshot(tick);

    if let Some(dir) = output_dir {
        output::write_snapshot_to_dir(&snapshot, dir)?;
        output::write_current_state(&snapshot, dir)?;
    }
    Ok(())
}
