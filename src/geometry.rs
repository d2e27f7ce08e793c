//! Shared 2-D helpers. Angles are in radians, measured clockwise from
//! twelve o'clock, with screen coordinates (y grows downwards).

use std::f32::consts::{PI, TAU};

use eframe::egui::{Vec2, vec2};

pub fn polar(angle: f32, radius: f32) -> Vec2 {
    vec2(radius * angle.sin(), -radius * angle.cos())
}

/// Angle of `offset` in the same convention as [`polar`], in `[0, TAU)`.
pub fn angle_of(offset: Vec2) -> f32 {
    offset.x.atan2(-offset.y).rem_euclid(TAU)
}

/// Wraps an angle difference into `(-PI, PI]`.
pub fn wrap_delta(delta: f32) -> f32 {
    let wrapped = (delta + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

pub fn angle_within(angle: f32, start: f32, end: f32) -> bool {
    let angle = angle.rem_euclid(TAU);
    let span = end - start;
    if span >= TAU {
        return true;
    }
    let offset = (angle - start).rem_euclid(TAU);
    offset <= span
}

pub fn quadratic_point(p0: Vec2, c: Vec2, p1: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t)
}

pub fn cubic_point(p0: Vec2, c0: Vec2, c1: Vec2, p1: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + c0 * (3.0 * u * u * t) + c1 * (3.0 * u * t * t) + p1 * (t * t * t)
}

/// Points along an arc of `radius` around the origin, `segments + 1` of them.
pub fn arc_points(start: f32, end: f32, radius: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|step| {
            let t = step as f32 / segments as f32;
            polar(start + (end - start) * t, radius)
        })
        .collect()
}

/// A curve in layout space that the drawing backend flattens to a polyline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurvePath {
    Line([Vec2; 2]),
    Quadratic([Vec2; 3]),
    Cubic([Vec2; 4]),
    /// Circular arc from `from` to `to` around `center`, sweeping clockwise
    /// on screen when `clockwise` is set.
    Arc {
        from: Vec2,
        to: Vec2,
        center: Vec2,
        clockwise: bool,
    },
}

impl CurvePath {
    pub fn start(&self) -> Vec2 {
        match self {
            Self::Line([start, _]) | Self::Quadratic([start, _, _]) | Self::Cubic([start, ..]) => {
                *start
            }
            Self::Arc { from, .. } => *from,
        }
    }

    pub fn end(&self) -> Vec2 {
        match self {
            Self::Line([_, end]) | Self::Quadratic([_, _, end]) | Self::Cubic([.., end]) => *end,
            Self::Arc { to, .. } => *to,
        }
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        match *self {
            Self::Line([a, b]) => a + (b - a) * t,
            Self::Quadratic([a, c, b]) => quadratic_point(a, c, b, t),
            Self::Cubic([a, c0, c1, b]) => cubic_point(a, c0, c1, b, t),
            Self::Arc {
                from,
                to,
                center,
                clockwise,
            } => {
                let radius = (from - center).length();
                let start = (from - center).y.atan2((from - center).x);
                let end = (to - center).y.atan2((to - center).x);
                let mut sweep = end - start;
                // y points down, so a positive atan2 sweep runs clockwise on screen.
                if clockwise && sweep < 0.0 {
                    sweep += TAU;
                } else if !clockwise && sweep > 0.0 {
                    sweep -= TAU;
                }
                let angle = start + sweep * t;
                center + vec2(angle.cos(), angle.sin()) * radius
            }
        }
    }

    /// Tangent direction at the end of the path, normalized when non-zero.
    pub fn end_direction(&self) -> Vec2 {
        let end = self.end();
        let before = self.point_at(0.98);
        let direction = end - before;
        if direction.length_sq() > 1e-12 {
            direction.normalized()
        } else {
            (end - self.start()).normalized()
        }
    }

    pub fn flatten(&self, segments: usize) -> Vec<Vec2> {
        match self {
            Self::Line([a, b]) => vec![*a, *b],
            _ => {
                let segments = segments.max(1);
                (0..=segments)
                    .map(|step| self.point_at(step as f32 / segments as f32))
                    .collect()
            }
        }
    }
}

pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq <= f32::EPSILON {
        return (point - a).length();
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).length()
}

pub fn distance_to_polyline(point: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => (point - *only).length(),
        _ => points
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(polygon: &[Vec2], point: Vec2) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut previous = polygon[polygon.len() - 1];
    for &current in polygon {
        if (current.y > point.y) != (previous.y > point.y) {
            let crossing =
                (previous.x - current.x) * (point.y - current.y) / (previous.y - current.y) + current.x;
            if point.x < crossing {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}
