//! Steering Engine
//!
//! Moves a bee one bounded step toward a target. A blocked step is replaced by
//! a single curved detour, and a bee that keeps landing on its own recent
//! positions is kicked out along a random heading.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::components::{Bee, WorldQuery};
use crate::config::SteeringConfig;

/// How the accepted position was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Already at the target; nothing moved
    Stationary,
    /// Straight along the heading
    Direct,
    /// Rotated away from an obstacle
    Detour,
    /// Random heading chosen by the oscillation guard
    Escape,
}

/// Outcome of one steering call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Distance to the target before moving; callers compare it to the arrival threshold
    pub distance_before: f32,
    pub kind: StepKind,
    /// The accepted position is inside an obstacle anyway
    pub obstructed: bool,
}

fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Computes single steps of motion for bees
#[derive(Debug, Clone, Default)]
pub struct SteeringEngine {
    config: SteeringConfig,
}

impl SteeringEngine {
    pub fn new(config: SteeringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    /// Step with the configured step size and return the pre-move distance
    pub fn move_towards<W, R>(&self, bee: &mut Bee, target: Vec2, world: &W, rng: &mut R) -> f32
    where
        W: WorldQuery + ?Sized,
        R: Rng + ?Sized,
    {
        self.step(bee, target, self.config.step_size, world, rng)
            .distance_before
    }

    /// Move `bee` one step toward `target`.
    ///
    /// The step length is `step_size` scaled by the bee's speed multiplier,
    /// except for escape moves which use `step_size` as is.
    pub fn step<W, R>(
        &self,
        bee: &mut Bee,
        target: Vec2,
        step_size: f32,
        world: &W,
        rng: &mut R,
    ) -> StepReport
    where
        W: WorldQuery + ?Sized,
        R: Rng + ?Sized,
    {
        let origin = bee.position;
        let offset = target - origin;
        let distance = offset.length();

        if distance == 0.0 {
            return StepReport {
                distance_before: 0.0,
                kind: StepKind::Stationary,
                obstructed: world.is_obstructed(origin),
            };
        }

        let angle = offset.y.atan2(offset.x);
        let effective_step = step_size * bee.speed_multiplier();

        let mut kind = StepKind::Direct;
        let mut candidate = origin + heading(angle) * effective_step;

        if world.is_obstructed(candidate) {
            // One detour only; the rotated point is not re-checked before the guard
            let jitter = self.config.avoidance_jitter;
            let detour_angle =
                angle + self.config.avoidance_angle_offset + rng.gen_range(-jitter..=jitter);
            candidate =
                origin + heading(detour_angle) * (effective_step * self.config.detour_multiplier);
            kind = StepKind::Detour;
        }

        let mut oscillations = if bee.history().is_near_recent(
            candidate,
            self.config.oscillation_window,
            self.config.oscillation_radius,
        ) {
            bee.oscillation_count() + 1
        } else {
            0
        };

        if oscillations >= self.config.oscillation_limit {
            candidate = origin + heading(rng.gen_range(0.0..TAU)) * step_size;
            if world.is_obstructed(candidate) {
                let retry = step_size * self.config.escape_retry_multiplier;
                candidate = origin + heading(rng.gen_range(0.0..TAU)) * retry;
            }
            tracing::debug!(
                from = ?origin,
                to = ?candidate,
                "oscillation detected, escaping along a random heading"
            );
            kind = StepKind::Escape;
            oscillations = 0;
        }

        let obstructed = world.is_obstructed(candidate);
        if obstructed {
            tracing::warn!(
                position = ?candidate,
                kind = ?kind,
                "accepted step lies inside an obstacle"
            );
        }

        bee.set_oscillation_count(oscillations);
        bee.position = candidate;
        bee.record_position(candidate);

        StepReport {
            distance_before: distance,
            kind,
            obstructed,
        }
    }
}
