use std::f32::consts::FRAC_1_SQRT_2;

use eframe::egui::{Vec2, vec2};

use crate::geometry::CurvePath;

pub const ARROW_SIZE: f32 = 8.0;

/// Where the target lies relative to the source, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    /// Target right of and below the source.
    SouthEast,
    SouthWest,
    NorthWest,
    NorthEast,
}

impl Quadrant {
    pub fn of(source: Vec2, target: Vec2) -> Self {
        match (target.x >= source.x, target.y >= source.y) {
            (true, true) => Self::SouthEast,
            (false, true) => Self::SouthWest,
            (false, false) => Self::NorthWest,
            (true, false) => Self::NorthEast,
        }
    }

    /// Diagonal unit offset from the source boundary toward the target.
    fn toward(self) -> Vec2 {
        let (x, y) = match self {
            Self::SouthEast => (1.0, 1.0),
            Self::SouthWest => (-1.0, 1.0),
            Self::NorthWest => (-1.0, -1.0),
            Self::NorthEast => (1.0, -1.0),
        };
        vec2(x, y) * FRAC_1_SQRT_2
    }
}

/// Directed edges bend clockwise along a circle whose radius equals the
/// center distance, with both ends pulled back onto the node boundaries.
/// Undirected edges are straight segments between the boundaries.
pub fn edge_path(
    source: Vec2,
    source_radius: f32,
    target: Vec2,
    target_radius: f32,
    directed: bool,
) -> CurvePath {
    let delta = target - source;
    let distance = delta.length();
    if distance <= source_radius + target_radius {
        return CurvePath::Line([source, target]);
    }

    if !directed {
        let unit = delta / distance;
        return CurvePath::Line([source + unit * source_radius, target - unit * target_radius]);
    }

    let quadrant = Quadrant::of(source, target);
    let from = source + quadrant.toward() * source_radius;
    let to = target - quadrant.toward() * target_radius;

    let chord = to - from;
    let half = chord.length() * 0.5;
    if half <= f32::EPSILON {
        return CurvePath::Line([source, target]);
    }
    let radius = distance.max(half);
    let unit = chord / (half * 2.0);
    let normal = vec2(-unit.y, unit.x);
    let rise = (radius * radius - half * half).max(0.0).sqrt();
    CurvePath::Arc {
        from,
        to,
        center: from + chord * 0.5 + normal * rise,
        clockwise: true,
    }
}

/// Triangle `[tip, left, right]` closing `path` at its end.
pub fn arrowhead(path: &CurvePath, size: f32) -> [Vec2; 3] {
    let tip = path.end();
    let direction = path.end_direction();
    let back = tip - direction * size;
    let side = vec2(-direction.y, direction.x) * (size * 0.5);
    [tip, back + side, back - side]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn quadrants() {
        let origin = Vec2::ZERO;
        assert_eq!(Quadrant::of(origin, vec2(5.0, 5.0)), Quadrant::SouthEast);
        assert_eq!(Quadrant::of(origin, vec2(-5.0, 5.0)), Quadrant::SouthWest);
        assert_eq!(Quadrant::of(origin, vec2(-5.0, -5.0)), Quadrant::NorthWest);
        assert_eq!(Quadrant::of(origin, vec2(5.0, -5.0)), Quadrant::NorthEast);
    }

    #[test]
    fn undirected_edges_are_straight_between_boundaries() {
        let path = edge_path(vec2(0.0, 0.0), 5.0, vec2(100.0, 0.0), 10.0, false);
        let CurvePath::Line([start, end]) = path else {
            panic!("undirected edge should be a line");
        };
        assert!(close(start, vec2(5.0, 0.0)));
        assert!(close(end, vec2(90.0, 0.0)));
    }

    #[test]
    fn directed_edges_arc_and_leave_node_boundaries() {
        let source = vec2(0.0, 0.0);
        let target = vec2(100.0, 40.0);
        let path = edge_path(source, 10.0, target, 10.0, true);
        let CurvePath::Arc { from, to, center, .. } = path else {
            panic!("directed edge should be an arc");
        };
        assert!(((from - source).length() - 10.0).abs() < 1e-3);
        assert!(((to - target).length() - 10.0).abs() < 1e-3);
        assert!(((from - center).length() - (to - center).length()).abs() < 1e-2);

        let mid = path.point_at(0.5);
        let straight_mid = (from + to) * 0.5;
        assert!((mid - straight_mid).length() > 1.0);
        assert!(close(path.point_at(1.0), to));
    }

    #[test]
    fn reverse_edges_bend_apart() {
        let a = vec2(0.0, 0.0);
        let b = vec2(120.0, 0.0);
        let forward = edge_path(a, 5.0, b, 5.0, true).point_at(0.5);
        let backward = edge_path(b, 5.0, a, 5.0, true).point_at(0.5);
        assert!((forward - backward).length() > 5.0);
    }

    #[test]
    fn arrowhead_points_at_path_end() {
        let path = CurvePath::Line([vec2(0.0, 0.0), vec2(50.0, 0.0)]);
        let [tip, left, right] = arrowhead(&path, ARROW_SIZE);
        assert!(close(tip, vec2(50.0, 0.0)));
        assert!(left.x < tip.x && right.x < tip.x);
        assert!((left.y + right.y).abs() < 1e-4);
    }

    #[test]
    fn overlapping_nodes_fall_back_to_line() {
        let path = edge_path(vec2(0.0, 0.0), 10.0, vec2(5.0, 0.0), 10.0, true);
        assert!(matches!(path, CurvePath::Line(_)));
    }
}
