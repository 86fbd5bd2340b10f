//! Target Assignment
//!
//! Greedy nearest-target matching that prefers targets no other bee holds.

use glam::Vec2;
use std::collections::BTreeMap;

use crate::components::{NectarTarget, PickupId};

/// Pick the nearest uncontested target for a bee at `position`.
///
/// Targets already held in `assignments` are skipped unless every target is
/// held, in which case the whole pool is considered and several bees may
/// converge on one target. Equal distances resolve to the earlier target in
/// pool order.
pub fn find_target<'a>(
    position: Vec2,
    targets: &'a [NectarTarget],
    assignments: &BTreeMap<usize, PickupId>,
) -> Option<&'a NectarTarget> {
    let is_held = |target: &NectarTarget| assignments.values().any(|&id| id == target.id);

    let uncontested = nearest(position, targets.iter().filter(|t| !is_held(*t)));
    uncontested.or_else(|| nearest(position, targets.iter()))
}

fn nearest<'a>(
    position: Vec2,
    candidates: impl Iterator<Item = &'a NectarTarget>,
) -> Option<&'a NectarTarget> {
    let mut best: Option<(&NectarTarget, f32)> = None;
    for target in candidates {
        let distance = target.position.distance(position);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((target, distance)),
        }
    }
    best.map(|(target, _)| target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(points: &[(f32, f32)]) -> Vec<NectarTarget> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| NectarTarget {
                id: i as u32 + 10,
                position: Vec2::new(x, y),
            })
            .collect()
    }

    #[test]
    fn test_empty_pool() {
        let assignments = BTreeMap::new();
        assert!(find_target(Vec2::ZERO, &[], &assignments).is_none());
    }

    #[test]
    fn test_nearest_wins() {
        let pool = targets(&[(5.0, 0.0), (1.0, 1.0), (0.0, 3.0)]);
        let assignments = BTreeMap::new();
        assert_eq!(find_target(Vec2::ZERO, &pool, &assignments).map(|t| t.id), Some(11));
    }

    #[test]
    fn test_contested_targets_are_skipped() {
        let pool = targets(&[(1.0, 0.0), (2.0, 0.0)]);
        let mut assignments = BTreeMap::new();
        assignments.insert(0, 10);

        assert_eq!(find_target(Vec2::ZERO, &pool, &assignments).map(|t| t.id), Some(11));
    }

    #[test]
    fn test_falls_back_to_full_pool_when_all_contested() {
        let pool = targets(&[(4.0, 0.0), (1.0, 0.0)]);
        let mut assignments = BTreeMap::new();
        assignments.insert(0, 10);
        assignments.insert(1, 11);

        assert_eq!(find_target(Vec2::ZERO, &pool, &assignments).map(|t| t.id), Some(11));
    }

    #[test]
    fn test_ties_go_to_first_in_pool_order() {
        let pool = targets(&[(0.0, 2.0), (2.0, 0.0), (-2.0, 0.0)]);
        let assignments = BTreeMap::new();
        assert_eq!(find_target(Vec2::ZERO, &pool, &assignments).map(|t| t.id), Some(10));
    }
}
