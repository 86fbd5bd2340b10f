//! World Components
//!
//! Hive, obstacles, nectar targets and power-ups, plus the point-in-obstacle
//! queries the steering engine consumes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier of a nectar target or power-up within one landscape
pub type PickupId = u32;

/// Point-in-obstacle queries supplied by the surrounding landscape
pub trait WorldQuery {
    fn is_inside_pond(&self, point: Vec2) -> bool;

    fn is_in_forbidden_zone(&self, point: Vec2) -> bool;

    /// Either obstacle
    fn is_obstructed(&self, point: Vec2) -> bool {
        self.is_inside_pond(point) || self.is_in_forbidden_zone(point)
    }
}

/// An empty world with nothing to avoid
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl WorldQuery for OpenField {
    fn is_inside_pond(&self, _point: Vec2) -> bool {
        false
    }

    fn is_in_forbidden_zone(&self, _point: Vec2) -> bool {
        false
    }
}

/// Axis-aligned rectangle with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left corner
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.width
            && point.y >= self.position.y
            && point.y <= self.position.y + self.height
    }
}

/// Circle with inclusive boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// Read-only obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Obstacle {
    Pond(Rect),
    ForbiddenZone(Circle),
}

impl Obstacle {
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Obstacle::Pond(rect) => rect.contains(point),
            Obstacle::ForbiddenZone(circle) => circle.contains(point),
        }
    }
}

/// The hive rectangle and the point bees aim for when returning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hive {
    pub bounds: Rect,
    /// Aim point outside the hive; bees count as home once close to it
    pub staging_point: Vec2,
}

impl Hive {
    pub fn new(position: Vec2, width: f32, height: f32, staging_point: Vec2) -> Self {
        Self {
            bounds: Rect::new(position, width, height),
            staging_point,
        }
    }

    /// Deterministic parking slot for bee `index`, three per row
    pub fn settle_slot(&self, index: usize) -> Vec2 {
        let row = (index / 3) as f32;
        let col = (index % 3) as f32;
        self.bounds.position + Vec2::new(0.25 + 0.25 * col, 0.25 + 0.25 * row)
    }
}

/// A nectar pickup point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NectarTarget {
    pub id: PickupId,
    pub position: Vec2,
}

/// A pickup that grows and slows the bee that touches it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: PickupId,
    pub position: Vec2,
}

/// The environment the bees forage in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landscape {
    pub hive: Hive,
    obstacles: Vec<Obstacle>,
    nectar: Vec<NectarTarget>,
    power_ups: Vec<PowerUp>,
    next_pickup_id: PickupId,
}

impl Landscape {
    pub fn new(hive: Hive) -> Self {
        Self {
            hive,
            obstacles: Vec::new(),
            nectar: Vec::new(),
            power_ups: Vec::new(),
            next_pickup_id: 1,
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn nectar(&self) -> &[NectarTarget] {
        &self.nectar
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    fn allocate_id(&mut self) -> PickupId {
        let id = self.next_pickup_id;
        self.next_pickup_id += 1;
        id
    }

    pub fn add_nectar(&mut self, position: Vec2) -> PickupId {
        let id = self.allocate_id();
        self.nectar.push(NectarTarget { id, position });
        id
    }

    pub fn add_power_up(&mut self, position: Vec2) -> PickupId {
        let id = self.allocate_id();
        self.power_ups.push(PowerUp { id, position });
        id
    }

    pub fn find_nectar(&self, id: PickupId) -> Option<&NectarTarget> {
        self.nectar.iter().find(|n| n.id == id)
    }

    /// Remove a nectar target. Returns `None` if it is already gone.
    pub fn take_nectar(&mut self, id: PickupId) -> Option<NectarTarget> {
        let index = self.nectar.iter().position(|n| n.id == id)?;
        Some(self.nectar.remove(index))
    }

    pub(crate) fn power_ups_mut(&mut self) -> &mut Vec<PowerUp> {
        &mut self.power_ups
    }

    /// Drop every remaining pickup. Ids are never reused.
    pub fn clear_pickups(&mut self) {
        self.nectar.clear();
        self.power_ups.clear();
    }
}

impl WorldQuery for Landscape {
    fn is_inside_pond(&self, point: Vec2) -> bool {
        self.obstacles
            .iter()
            .any(|o| matches!(o, Obstacle::Pond(_)) && o.contains(point))
    }

    fn is_in_forbidden_zone(&self, point: Vec2) -> bool {
        self.obstacles
            .iter()
            .any(|o| matches!(o, Obstacle::ForbiddenZone(_)) && o.contains(point))
    }
}
