use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::Cell;

/// Squared distances below this are treated as this to bound the charge push.
const MIN_DISTANCE_SQ: f32 = 1.0;

/// A link spring. `bias` is the share of the correction taken by the target,
/// derived from endpoint degrees so hubs move less.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) bias: f32,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) padding: f32,
    pub(super) reach_sq: f32,
}

/// Stable pseudo-random unit vector for separating coincident bodies.
fn separation_direction(first: usize, second: usize) -> Vec2 {
    let angle = ((first as f32) * 0.618_034 + (second as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin())
}

pub(super) fn apply_springs(positions: &mut [Vec2], springs: &[Spring], distance: f32, alpha: f32) {
    for spring in springs {
        if spring.source == spring.target {
            continue;
        }
        let delta = positions[spring.target] - positions[spring.source];
        let length = delta.length();
        if length <= f32::EPSILON {
            continue;
        }
        let correction = delta * (alpha * (length - distance) / length);
        positions[spring.target] -= correction * spring.bias;
        positions[spring.source] += correction * (1.0 - spring.bias);
    }
}

pub(super) fn apply_gravity(positions: &mut [Vec2], center: Vec2, strength: f32) {
    for position in positions {
        *position += (center - *position) * strength;
    }
}

/// Adds the Barnes-Hut approximated charge velocity for body `index` to
/// `push`. Negative charges repel.
pub(super) fn accumulate_charge(
    cell: &Cell,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    alpha: f32,
    theta: f32,
    push: &mut Vec2,
) {
    if cell.charge == 0.0 {
        return;
    }
    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.bodies {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta.length_sq() < 1e-6 {
                delta = separation_direction(index, other);
            }
            let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
            *push += delta * (alpha * charges[other] / distance_sq);
        }
        return;
    }

    let delta = cell.centroid - point;
    let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    let side = cell.bounds.side();
    if !cell.bounds.contains(point) && side * side < theta * theta * distance_sq {
        *push += delta * (alpha * cell.charge / distance_sq);
        return;
    }

    for child in cell.children() {
        accumulate_charge(child, index, positions, charges, alpha, theta, push);
    }
}

fn separate(
    first: usize,
    second: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    shifts: &mut [Vec2],
) {
    let delta = positions[first] - positions[second];
    let distance = delta.length();
    let direction = if distance > 1e-4 {
        delta / distance
    } else {
        separation_direction(first, second)
    };
    let min_distance = radii[first] + radii[second] + params.padding;
    if distance < min_distance {
        let shift = direction * ((min_distance - distance) * params.strength * 0.5);
        shifts[first] += shift;
        shifts[second] -= shift;
    }
}

/// Pushes overlapping node circles apart, pruning cell pairs that are
/// further apart than `params.reach_sq`.
pub(super) fn accumulate_collisions(
    a: &Cell,
    b: &Cell,
    same: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    shifts: &mut [Vec2],
) {
    if a.bounds.gap_sq(b.bounds) > params.reach_sq {
        return;
    }

    if a.is_leaf() && b.is_leaf() {
        if same {
            for (offset, &first) in a.bodies.iter().enumerate() {
                for &second in &a.bodies[offset + 1..] {
                    separate(first, second, positions, radii, params, shifts);
                }
            }
        } else {
            for &first in &a.bodies {
                for &second in &b.bodies {
                    separate(first, second, positions, radii, params, shifts);
                }
            }
        }
        return;
    }

    if same {
        let children = a.children().collect::<Vec<_>>();
        for (offset, first) in children.iter().enumerate() {
            accumulate_collisions(first, first, true, positions, radii, params, shifts);
            for second in &children[offset + 1..] {
                accumulate_collisions(first, second, false, positions, radii, params, shifts);
            }
        }
        return;
    }

    let split_a = !a.is_leaf() && (b.is_leaf() || a.bounds.half_extent >= b.bounds.half_extent);
    if split_a {
        for child in a.children() {
            accumulate_collisions(child, b, false, positions, radii, params, shifts);
        }
    } else {
        for child in b.children() {
            accumulate_collisions(a, child, false, positions, radii, params, shifts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn springs_pull_toward_rest_length() {
        let mut positions = vec![vec2(0.0, 0.0), vec2(200.0, 0.0)];
        let springs = [Spring {
            source: 0,
            target: 1,
            bias: 0.5,
        }];
        apply_springs(&mut positions, &springs, 100.0, 0.1);
        let length = (positions[1] - positions[0]).length();
        assert!(length < 200.0 && length > 100.0);
        assert!((positions[0].x + positions[1].x - 200.0).abs() < 1e-3);
    }

    #[test]
    fn negative_charge_repels() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let charges = vec![-30.0, -30.0];
        let root = Cell::build(&positions, &charges).unwrap();
        let mut push = Vec2::ZERO;
        accumulate_charge(&root, 0, &positions, &charges, 0.1, 0.8, &mut push);
        assert!(push.x < 0.0);
        assert_eq!(push.y, 0.0);
    }

    #[test]
    fn overlapping_circles_separate() {
        let positions = vec![vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(500.0, 0.0)];
        let radii = vec![5.0, 5.0, 5.0];
        let root = Cell::build(&positions, &[-1.0; 3]).unwrap();
        let mut shifts = vec![Vec2::ZERO; 3];
        let params = CollisionParams {
            strength: 1.0,
            padding: 2.0,
            reach_sq: 12.0 * 12.0,
        };
        accumulate_collisions(&root, &root, true, &positions, &radii, params, &mut shifts);
        assert!(shifts[0].x < 0.0);
        assert!(shifts[1].x > 0.0);
        assert_eq!(shifts[2], Vec2::ZERO);
    }
}
