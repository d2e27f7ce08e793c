use eframe::egui::{Vec2, vec2};
use tracing::debug;

use super::forces::{
    CollisionParams, Spring, accumulate_charge, accumulate_collisions, apply_gravity, apply_springs,
};
use super::quadtree::Cell;
use crate::session::{PassToken, RenderSession};

pub const START_ALPHA: f32 = 0.1;
pub const ALPHA_DECAY: f32 = 0.99;
pub const SETTLE_ALPHA: f32 = 0.005;
/// Minimum distance kept between a node center and the drawing-area border.
pub const BORDER_MARGIN: f32 = 50.0;

const FRICTION: f32 = 0.9;
const THETA: f32 = 0.8;
const COLLISION_PADDING: f32 = 2.0;
const COLLISION_STRENGTH: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// A newer render pass started; nothing was touched.
    Superseded,
    Running,
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    pub charge: f32,
    pub link_distance: f32,
    pub gravity: f32,
    pub width: f32,
    pub height: f32,
}

/// Verlet-style force simulation stepped one tick at a time by its owner.
#[derive(Clone, Debug)]
pub struct ForceSimulation {
    params: SimulationParams,
    token: PassToken,
    positions: Vec<Vec2>,
    previous: Vec<Vec2>,
    radii: Vec<f32>,
    charges: Vec<f32>,
    springs: Vec<Spring>,
    alpha: f32,
    ticks: usize,
}

fn clamp_axis(value: f32, extent: f32) -> f32 {
    if extent <= BORDER_MARGIN * 2.0 {
        extent * 0.5
    } else {
        value.clamp(BORDER_MARGIN, extent - BORDER_MARGIN)
    }
}

impl ForceSimulation {
    /// `seeds` are initial offsets in `[-1, 1]` per node; `links` are node
    /// index pairs.
    pub fn new(
        token: PassToken,
        params: SimulationParams,
        seeds: &[(f32, f32)],
        radii: Vec<f32>,
        links: &[(usize, usize)],
    ) -> Self {
        let center = vec2(params.width, params.height) * 0.5;
        let spread = vec2(
            (params.width * 0.5 - BORDER_MARGIN).max(0.0),
            (params.height * 0.5 - BORDER_MARGIN).max(0.0),
        );
        let positions = seeds
            .iter()
            .map(|&(x, y)| center + vec2(x * spread.x, y * spread.y))
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; positions.len()];
        for &(source, target) in links {
            if source < degree.len() && target < degree.len() {
                degree[source] += 1;
                degree[target] += 1;
            }
        }
        let springs = links
            .iter()
            .filter(|(source, target)| *source < degree.len() && *target < degree.len())
            .map(|&(source, target)| Spring {
                source,
                target,
                bias: degree[source] as f32 / (degree[source] + degree[target]) as f32,
            })
            .collect();

        let alpha = if positions.is_empty() { 0.0 } else { START_ALPHA };
        Self {
            params,
            token,
            previous: positions.clone(),
            charges: vec![params.charge; positions.len()],
            positions,
            radii,
            springs,
            alpha,
            ticks: 0,
        }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn token(&self) -> PassToken {
        self.token
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < SETTLE_ALPHA
    }

    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// Restarts cooling from the initial temperature.
    pub fn reheat(&mut self) {
        self.alpha = START_ALPHA;
    }

    /// Advances one tick, unless the pass that created this simulation has
    /// been superseded.
    pub fn tick(&mut self, session: &RenderSession) -> TickStatus {
        if !session.is_current(self.token) {
            return TickStatus::Superseded;
        }
        if self.is_settled() {
            return TickStatus::Settled;
        }

        self.step();
        self.alpha *= ALPHA_DECAY;
        self.ticks += 1;
        if self.is_settled() {
            debug!(ticks = self.ticks, nodes = self.positions.len(), "force simulation settled");
            TickStatus::Settled
        } else {
            TickStatus::Running
        }
    }

    /// Ticks until settled, superseded, or `max_ticks` have run.
    pub fn run(&mut self, session: &RenderSession, max_ticks: usize) -> TickStatus {
        let mut status = if self.is_settled() {
            TickStatus::Settled
        } else {
            TickStatus::Running
        };
        for _ in 0..max_ticks {
            status = self.tick(session);
            if status != TickStatus::Running {
                break;
            }
        }
        status
    }

    fn step(&mut self) {
        let alpha = self.alpha;
        let center = vec2(self.params.width, self.params.height) * 0.5;

        apply_springs(&mut self.positions, &self.springs, self.params.link_distance, alpha);
        apply_gravity(&mut self.positions, center, alpha * self.params.gravity);

        if let Some(root) = Cell::build(&self.positions, &self.charges) {
            for index in 0..self.positions.len() {
                let mut push = Vec2::ZERO;
                accumulate_charge(&root, index, &self.positions, &self.charges, alpha, THETA, &mut push);
                self.previous[index] -= push;
            }

            let max_radius = self.radii.iter().copied().fold(0.0_f32, f32::max);
            let reach = max_radius * 2.0 + COLLISION_PADDING;
            if reach > 0.0 {
                let mut shifts = vec![Vec2::ZERO; self.positions.len()];
                accumulate_collisions(
                    &root,
                    &root,
                    true,
                    &self.positions,
                    &self.radii,
                    CollisionParams {
                        strength: COLLISION_STRENGTH,
                        padding: COLLISION_PADDING,
                        reach_sq: reach * reach,
                    },
                    &mut shifts,
                );
                for (position, shift) in self.positions.iter_mut().zip(shifts) {
                    *position += shift;
                }
            }
        }

        for (position, previous) in self.positions.iter_mut().zip(self.previous.iter_mut()) {
            let velocity = (*position - *previous) * FRICTION;
            *previous = *position;
            *position += velocity;
            position.x = clamp_axis(position.x, self.params.width);
            position.y = clamp_axis(position.y, self.params.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimulationParams {
        SimulationParams {
            charge: -120.0,
            link_distance: 100.0,
            gravity: 0.1,
            width: 600.0,
            height: 400.0,
        }
    }

    fn simulation(session: &RenderSession) -> ForceSimulation {
        ForceSimulation::new(
            session.begin_pass(),
            params(),
            &[(0.0, 0.0), (0.1, 0.1), (-0.9, 0.95), (1.0, -1.0)],
            vec![5.0; 4],
            &[(0, 1), (1, 2), (2, 3)],
        )
    }

    #[test]
    fn settles_and_keeps_nodes_inside_margin() {
        let session = RenderSession::new();
        let mut sim = simulation(&session);
        assert_eq!(sim.run(&session, 2_000), TickStatus::Settled);
        assert!(sim.ticks() > 100);
        for position in sim.positions() {
            assert!(position.x >= BORDER_MARGIN && position.x <= 600.0 - BORDER_MARGIN);
            assert!(position.y >= BORDER_MARGIN && position.y <= 400.0 - BORDER_MARGIN);
        }
        assert_eq!(sim.tick(&session), TickStatus::Settled);
    }

    #[test]
    fn stale_ticks_do_nothing() {
        let session = RenderSession::new();
        let mut sim = simulation(&session);
        sim.tick(&session);
        let before = sim.positions().to_vec();
        let alpha = sim.alpha();
        session.begin_pass();
        assert_eq!(sim.tick(&session), TickStatus::Superseded);
        assert_eq!(sim.positions(), before.as_slice());
        assert_eq!(sim.alpha(), alpha);
        assert_eq!(sim.run(&session, 10), TickStatus::Superseded);
    }

    #[test]
    fn deterministic_for_same_seeds() {
        let session = RenderSession::new();
        let mut first = simulation(&session);
        first.run(&session, 50);
        let mut second = simulation(&session);
        second.run(&session, 50);
        assert_eq!(first.positions(), second.positions());
    }

    #[test]
    fn tiny_area_pins_to_center() {
        let session = RenderSession::new();
        let mut sim = ForceSimulation::new(
            session.begin_pass(),
            SimulationParams {
                width: 80.0,
                height: 80.0,
                ..params()
            },
            &[(0.5, 0.5), (-0.5, -0.5)],
            vec![5.0; 2],
            &[],
        );
        sim.tick(&session);
        assert!(sim.positions().iter().all(|p| *p == vec2(40.0, 40.0)));
    }
}
