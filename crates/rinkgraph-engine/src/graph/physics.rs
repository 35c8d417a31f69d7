use glam::{IVec3, Vec3};
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::graph::model::Node;
use crate::util::config::{ConnectionConfig, PhysicsConfig};

const ENERGY_MIN: f32 = 0.1;
const ENERGY_MAX: f32 = 1.0;
const ENERGY_KEEP: f32 = 0.98;
const COINCIDENT_EPS: f32 = 1e-6;
/// Cell coordinates are clamped so neighbour offsets never overflow `i32`.
const CELL_LIMIT: f32 = (i32::MAX / 2) as f32;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    pub active_links: usize,
    pub repulsed_pairs: usize,
    pub resets: usize,
    pub max_speed: f32,
}

/// Uniform hash grid used to find pairs closer than a cutoff.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell: f32,
    cells: HashMap<IVec3, SmallVec<[usize; 8]>>,
}

impl SpatialGrid {
    fn key(&self, p: Vec3) -> IVec3 {
        (p / self.cell)
            .floor()
            .clamp(Vec3::splat(-CELL_LIMIT), Vec3::splat(CELL_LIMIT))
            .as_ivec3()
    }

    pub fn rebuild(&mut self, positions: impl Iterator<Item = Vec3>, cell: f32) {
        self.cell = cell.max(1e-3);
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        for (i, p) in positions.enumerate() {
            if !p.is_finite() {
                continue;
            }
            let key = self.key(p);
            self.cells.entry(key).or_default().push(i);
        }
        self.cells.retain(|_, bucket| !bucket.is_empty());
    }

    /// Calls `f(i, j)` once for every `i < j` closer than `radius`, in
    /// ascending `i`, so force sums do not depend on hash order.
    /// `radius` must not exceed the cell size used in `rebuild`.
    pub fn for_each_close_pair(&self, positions: &[Vec3], radius: f32, mut f: impl FnMut(usize, usize)) {
        let r2 = radius * radius;
        for (i, p) in positions.iter().enumerate() {
            if !p.is_finite() {
                continue;
            }
            let key = self.key(*p);
            for dz in -1..=1 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let Some(other) = self.cells.get(&(key + IVec3::new(dx, dy, dz))) else {
                            continue;
                        };
                        for &j in other {
                            if j > i && p.distance_squared(positions[j]) < r2 {
                                f(i, j);
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn for_each_close_pair_brute(positions: &[Vec3], radius: f32, mut f: impl FnMut(usize, usize)) {
    let r2 = radius * radius;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if positions[i].distance_squared(positions[j]) < r2 {
                f(i, j);
            }
        }
    }
}

/// Separation direction for two nodes sharing a point, stable per pair.
fn fallback_direction(i: usize, j: usize) -> Vec3 {
    let a = i as f32 * 2.399_963 + j as f32 * 0.618_034;
    Vec3::new(a.cos(), 0.5, a.sin()).normalize()
}

/// Per-frame integrator. Holds scratch buffers so a frame does not allocate
/// once warmed up.
#[derive(Debug, Default)]
pub struct Simulator {
    forces: Vec<Vec3>,
    positions: Vec<Vec3>,
    active: Vec<usize>,
    grid: SpatialGrid,
}

impl Simulator {
    pub fn step(
        &mut self,
        nodes: &mut [Node],
        dt: f32,
        cfg: &PhysicsConfig,
        links: &ConnectionConfig,
    ) -> StepStats {
        let mut stats = StepStats::default();
        let n = nodes.len();
        if n == 0 {
            return stats;
        }
        let s = if dt.is_finite() {
            (dt * 60.0).clamp(0.0, cfg.max_time_scale)
        } else {
            0.0
        };

        self.forces.clear();
        self.forces.resize(n, Vec3::ZERO);
        self.active.clear();
        self.active.resize(n, 0);
        self.positions.clear();
        self.positions.extend(nodes.iter().map(|node| node.position));

        // cluster attraction + soft walls
        for (i, node) in nodes.iter().enumerate() {
            let to_target = node.cluster_target - node.position;
            if to_target.length() > cfg.dead_zone {
                self.forces[i] += to_target * cfg.attraction;
            }

            let p = node.position;
            let mut wall = Vec3::ZERO;
            for axis in 0..3 {
                let excess = p[axis].abs() - cfg.bound;
                if excess > 0.0 {
                    wall[axis] = -p[axis].signum() * excess * cfg.boundary_strength;
                }
            }
            self.forces[i] += wall;
        }

        // repulsion
        let min_sep = cfg.min_separation.max(0.0);
        if min_sep > 0.0 && cfg.repulsion != 0.0 {
            self.grid.rebuild(self.positions.iter().copied(), min_sep);
            let positions = &self.positions;
            let forces = &mut self.forces;
            let min_distance = cfg.min_distance.max(COINCIDENT_EPS);
            self.grid.for_each_close_pair(positions, min_sep, |i, j| {
                let delta = positions[i] - positions[j];
                let dist = delta.length();
                let dir = if dist > COINCIDENT_EPS {
                    delta / dist
                } else {
                    fallback_direction(i, j)
                };
                let f = dir * (cfg.repulsion / dist.max(min_distance));
                forces[i] += f;
                forces[j] -= f;
                stats.repulsed_pairs += 1;
            });
        }

        // connection springs
        for i in 0..n {
            for j in nodes[i].connections.iter().map(|c| c.0) {
                if j <= i || j >= n {
                    continue;
                }
                let d = self.positions[j] - self.positions[i];
                let Some(alpha) = links.alpha_at(d.length()) else {
                    continue;
                };
                let f = d * (cfg.spring_strength * alpha);
                self.forces[i] += f;
                self.forces[j] -= f;
                self.active[i] += 1;
                self.active[j] += 1;
                stats.active_links += 1;
            }
        }

        let damping = cfg.damping.clamp(0.0, 1.0).powf(s);
        for (i, node) in nodes.iter_mut().enumerate() {
            let mut v = (node.velocity + self.forces[i] * s) * damping;
            if !v.is_finite() {
                v = Vec3::ZERO;
            }
            let mut p = node.position + v * s;
            if !p.is_finite() {
                tracing::warn!(node = %node.id, "non-finite position, resetting to cluster target");
                p = if node.cluster_target.is_finite() {
                    node.cluster_target
                } else {
                    Vec3::ZERO
                };
                v = Vec3::ZERO;
                stats.resets += 1;
            }
            node.velocity = v;
            node.position = p;
            node.active_connections = self.active[i];

            let speed = v.length();
            stats.max_speed = stats.max_speed.max(speed);
            let target = (cfg.energy_base
                + speed * cfg.speed_gain
                + self.active[i] as f32 * cfg.connection_gain)
                .clamp(ENERGY_MIN, ENERGY_MAX);
            let energy = node.energy * ENERGY_KEEP + target * (1.0 - ENERGY_KEEP);
            node.energy = if energy.is_finite() {
                energy.clamp(ENERGY_MIN, ENERGY_MAX)
            } else {
                ENERGY_MIN
            };

            if node.trail.latest() != Some(p) {
                node.trail.push(p);
            }
        }

        stats
    }
}

/// One-off step without reusable scratch space.
pub fn step(nodes: &mut [Node], dt: f32, cfg: &PhysicsConfig, links: &ConnectionConfig) -> StepStats {
    Simulator::default().step(nodes, dt, cfg, links)
}
