//! Landscape Setup
//!
//! The default 15×15 field: hive in the lower right, a pond above it and a
//! circular no-fly zone in the middle of the flower beds.

use glam::Vec2;

use crate::components::{Circle, Hive, Landscape, Obstacle, Rect};

/// Side length of the square field
pub const FIELD_SIZE: f32 = 15.0;

/// Create the default landscape with no pickups spawned yet
pub fn create_default_landscape() -> Landscape {
    let hive = Hive::new(Vec2::new(11.0, 0.0), 3.0, 3.0, Vec2::new(11.0, 2.0));

    Landscape::new(hive)
        .with_obstacle(Obstacle::Pond(Rect::new(Vec2::new(12.0, 5.0), 3.0, 5.0)))
        .with_obstacle(Obstacle::ForbiddenZone(Circle::new(Vec2::new(5.5, 8.5), 1.5)))
}
