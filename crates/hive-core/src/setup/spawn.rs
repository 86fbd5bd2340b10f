//! Spawning
//!
//! Nectar, power-up and worker placement. These decide positions only; the
//! controller turns them into pickups through `regenerate_targets`.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Bee, Hive, WorldQuery};
use crate::config::Config;

/// Lower-left cells of the 3×3 nectar beds
const NECTAR_AREAS: [(i32, i32); 4] = [(1, 4), (1, 11), (7, 4), (7, 11)];

/// Flower beds used to top up a thin nectar pool
const FLOWER_AREAS: [(&str, (i32, i32)); 5] = [
    ("center", (4, 7)),
    ("right", (7, 4)),
    ("left", (1, 4)),
    ("top", (7, 11)),
    ("upper left", (1, 11)),
];

/// Power-up cell ranges as half-open `(x, y)` spans
const POWER_UP_AREAS: [((i32, i32), (i32, i32)); 4] = [
    ((1, 4), (7, 10)),
    ((4, 7), (10, 14)),
    ((7, 10), (7, 10)),
    ((4, 7), (4, 7)),
];

const AREA_SIZE: i32 = 3;
const MAX_PER_AREA: usize = 5;
const PLACEMENT_ATTEMPTS: usize = 10;

/// Smallest nectar pool a cycle starts with
pub const MIN_NECTAR: usize = 5;

fn cell_centre(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

fn random_cell_in_area(origin: (i32, i32), rng: &mut SmallRng) -> Vec2 {
    let x = origin.0 + rng.gen_range(0..AREA_SIZE);
    let y = origin.1 + rng.gen_range(0..AREA_SIZE);
    cell_centre(x, y)
}

/// One to five nectar positions in each nectar bed
pub fn spawn_nectar_positions(rng: &mut SmallRng) -> Vec<Vec2> {
    let mut positions = Vec::new();
    for &origin in &NECTAR_AREAS {
        let count = rng.gen_range(1..=MAX_PER_AREA);
        for _ in 0..count {
            positions.push(random_cell_in_area(origin, rng));
        }
    }
    positions
}

/// Top `nectar` up to [`MIN_NECTAR`], one position per flower bed.
///
/// Beds are visited in shuffled order and positions inside the forbidden
/// zone are rejected.
pub fn ensure_minimum_nectar<W>(nectar: &mut Vec<Vec2>, world: &W, rng: &mut SmallRng)
where
    W: WorldQuery + ?Sized,
{
    if nectar.len() >= MIN_NECTAR {
        return;
    }

    let mut areas = FLOWER_AREAS;
    areas.shuffle(rng);

    for (name, origin) in areas {
        if nectar.len() >= MIN_NECTAR {
            break;
        }

        let placed = (0..PLACEMENT_ATTEMPTS)
            .map(|_| random_cell_in_area(origin, rng))
            .find(|&p| !world.is_in_forbidden_zone(p));

        match placed {
            Some(position) => {
                tracing::debug!(area = name, ?position, "Added nectar to reach the minimum pool");
                nectar.push(position);
            }
            None => tracing::warn!(
                area = name,
                attempts = PLACEMENT_ATTEMPTS,
                "Could not find a valid nectar position"
            ),
        }
    }
}

/// One to five power-up positions in each power-up area
pub fn spawn_power_up_positions(rng: &mut SmallRng) -> Vec<Vec2> {
    let mut positions = Vec::new();
    for &((x0, x1), (y0, y1)) in &POWER_UP_AREAS {
        let count = rng.gen_range(1..=MAX_PER_AREA);
        for _ in 0..count {
            let x = rng.gen_range(x0..x1);
            let y = rng.gen_range(y0..y1);
            positions.push(cell_centre(x, y));
        }
    }
    positions
}

/// Freshly spawned pickup positions for one cycle
#[derive(Debug, Clone, Default)]
pub struct SpawnedTargets {
    pub nectar: Vec<Vec2>,
    pub power_ups: Vec<Vec2>,
}

/// Spawn nectar, power-ups, then top the nectar pool up to the minimum
pub fn spawn_targets<W>(world: &W, rng: &mut SmallRng) -> SpawnedTargets
where
    W: WorldQuery + ?Sized,
{
    let mut nectar = spawn_nectar_positions(rng);
    let power_ups = spawn_power_up_positions(rng);
    ensure_minimum_nectar(&mut nectar, world, rng);
    SpawnedTargets { nectar, power_ups }
}

/// Position just outside the hive for bee `index`.
///
/// Sides rotate right, top, left, bottom by index.
pub fn position_near_hive(index: usize, hive: &Hive, rng: &mut SmallRng) -> Vec2 {
    let origin = hive.bounds.position;
    let (width, height) = (hive.bounds.width, hive.bounds.height);
    let x_offset = rng.gen_range(0.5..=1.5);
    let y_offset = rng.gen_range(0.5..=1.5);

    match index % 4 {
        0 => Vec2::new(origin.x + width + x_offset, origin.y + rng.gen_range(0.0..=height)),
        1 => Vec2::new(origin.x + rng.gen_range(0.0..=width), origin.y + height + y_offset),
        2 => Vec2::new(origin.x - x_offset, origin.y + rng.gen_range(0.0..=height)),
        _ => Vec2::new(origin.x + rng.gen_range(0.0..=width), origin.y - y_offset),
    }
}

/// Move every bee next to the hive, optionally clearing power-up growth
pub fn place_workers_around_hive(
    bees: &mut [Bee],
    hive: &Hive,
    reset_attributes: bool,
    rng: &mut SmallRng,
) {
    for (index, bee) in bees.iter_mut().enumerate() {
        bee.position = position_near_hive(index, hive, rng);
        if reset_attributes {
            bee.reset_attributes();
        }
    }
}

/// Create `config.foraging.worker_count` bees around the hive
pub fn spawn_workers(config: &Config, hive: &Hive, rng: &mut SmallRng) -> Vec<Bee> {
    (0..config.foraging.worker_count)
        .map(|index| {
            let position = position_near_hive(index, hive, rng);
            Bee::from_config(position, &config.power_ups, config.steering.history_capacity)
        })
        .collect()
}
