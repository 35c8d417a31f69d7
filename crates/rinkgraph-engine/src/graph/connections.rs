use glam::Vec3;
use serde::Serialize;

use crate::graph::model::{Node, NodeIndex};
use crate::util::config::{ConnectionConfig, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectionSegment {
    #[serde(skip)]
    pub a: NodeIndex,
    #[serde(skip)]
    pub b: NodeIndex,
    pub from: [f32; 3],
    pub to: [f32; 3],
    /// Relationship color already multiplied by `alpha`.
    pub color: Rgb,
    pub alpha: f32,
    pub cross_team: bool,
}

impl ConnectionSegment {
    pub fn from_vec(&self) -> Vec3 {
        Vec3::from_array(self.from)
    }

    pub fn to_vec(&self) -> Vec3 {
        Vec3::from_array(self.to)
    }
}

/// Rebuilds the visible connection segments every frame. Only the buffer is
/// kept between frames; nothing is cached on the nodes.
#[derive(Debug, Default)]
pub struct ConnectionBuilder {
    segments: Vec<ConnectionSegment>,
    truncated: bool,
}

impl ConnectionBuilder {
    pub fn rebuild(&mut self, nodes: &[Node], cfg: &ConnectionConfig) -> &[ConnectionSegment] {
        self.segments.clear();
        self.truncated = false;

        'outer: for (i, a) in nodes.iter().enumerate() {
            for b_idx in a.connections.iter() {
                let j = b_idx.0;
                if j <= i {
                    continue;
                }
                let Some(b) = nodes.get(j) else {
                    continue;
                };
                let Some(alpha) = cfg.alpha_at(a.position.distance(b.position)) else {
                    continue;
                };
                if self.segments.len() >= cfg.max_segments {
                    self.truncated = true;
                    break 'outer;
                }

                let cross_team = a.team != b.team;
                let base = if cross_team {
                    cfg.cross_team_color
                } else {
                    cfg.same_team_color
                };
                self.segments.push(ConnectionSegment {
                    a: NodeIndex(i),
                    b: *b_idx,
                    from: a.position.to_array(),
                    to: b.position.to_array(),
                    color: base.map(|c| c * alpha),
                    alpha,
                    cross_team,
                });
            }
        }

        if self.truncated {
            tracing::debug!(cap = cfg.max_segments, "connection segments truncated");
        }
        &self.segments
    }

    pub fn segments(&self) -> &[ConnectionSegment] {
        &self.segments
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.truncated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{test_node, NodeSet};
    use rinkgraph_core::Team;

    fn pair_set(dist: f32, team_b: Team) -> NodeSet {
        let mut set = NodeSet {
            nodes: vec![
                test_node("a", Team::Home, Vec3::ZERO),
                test_node("b", team_b, Vec3::new(dist, 0.0, 0.0)),
            ],
        };
        set.connect(NodeIndex(0), NodeIndex(1));
        set
    }

    #[test]
    fn colors_by_relationship_scaled_by_alpha() {
        let cfg = ConnectionConfig::default();
        let mut builder = ConnectionBuilder::default();

        let same = pair_set(cfg.max_distance * 0.5, Team::Home);
        let seg = builder.rebuild(&same.nodes, &cfg)[0];
        assert!(!seg.cross_team);
        assert!((seg.alpha - 0.5).abs() < 1e-5);
        for (c, base) in seg.color.iter().zip(cfg.same_team_color) {
            assert!((c - base * 0.5).abs() < 1e-5);
        }

        let cross = pair_set(0.0, Team::Away);
        let seg = builder.rebuild(&cross.nodes, &cfg)[0];
        assert!(seg.cross_team);
        assert_eq!(seg.alpha, 1.0);
        assert_eq!(seg.color, cfg.cross_team_color);
    }

    #[test]
    fn out_of_range_links_are_hidden_and_rebuilt_each_frame() {
        let cfg = ConnectionConfig::default();
        let mut builder = ConnectionBuilder::default();
        let mut set = pair_set(5.0, Team::Home);
        assert_eq!(builder.rebuild(&set.nodes, &cfg).len(), 1);

        set.nodes[1].position = Vec3::new(cfg.max_distance + 1.0, 0.0, 0.0);
        assert!(builder.rebuild(&set.nodes, &cfg).is_empty());

        set.nodes[1].position = Vec3::new(1.0, 0.0, 0.0);
        let segs = builder.rebuild(&set.nodes, &cfg);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].to, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn segment_count_is_capped() {
        let cfg = ConnectionConfig {
            max_segments: 2,
            ..ConnectionConfig::default()
        };
        let mut set = NodeSet {
            nodes: (0..4)
                .map(|i| test_node(&format!("n{i}"), Team::Home, Vec3::splat(i as f32)))
                .collect(),
        };
        for a in 0..4 {
            for b in (a + 1)..4 {
                set.connect(NodeIndex(a), NodeIndex(b));
            }
        }
        let mut builder = ConnectionBuilder::default();
        assert_eq!(builder.rebuild(&set.nodes, &cfg).len(), 2);
        assert!(builder.truncated());
    }
}
