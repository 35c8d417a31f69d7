use glam::Vec3;
use rinkgraph_core::{EventKind, NodeId, Team};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::util::config::Rgb;
use crate::util::trail::Trail;

/// Dense slot of a node; stable for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeIndex(pub usize);

/// Semantic cluster a node settles into around its game center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Theme {
    #[default]
    Players,
    Passes,
    Saves,
    Goals,
}

impl Theme {
    pub fn from_group(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "goals" | "goal" => Some(Self::Goals),
            "saves" | "save" => Some(Self::Saves),
            "passes" | "pass" => Some(Self::Passes),
            "players" | "player" => Some(Self::Players),
            _ => None,
        }
    }

    pub fn from_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::Goal => Self::Goals,
            EventKind::Save | EventKind::Shot => Self::Saves,
            EventKind::Pass | EventKind::Assist => Self::Passes,
            _ => Self::Players,
        }
    }

    /// Theme of one event: explicit groups win over the event kind.
    pub fn for_event(kind: EventKind, groups: &[String]) -> Self {
        groups
            .iter()
            .find_map(|g| Self::from_group(g))
            .unwrap_or_else(|| Self::from_kind(kind))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Players => "players",
            Self::Passes => "passes",
            Self::Saves => "saves",
            Self::Goals => "goals",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub game_id: String,
    pub team: Team,
    pub label: String,
    pub theme: Theme,
    pub period: u8,
    pub is_filler: bool,

    pub position: Vec3,
    pub velocity: Vec3,
    pub cluster_target: Vec3,
    pub energy: f32,
    pub size: f32,
    pub color: Rgb,
    pub connections: BTreeSet<NodeIndex>,
    pub active_connections: usize,
    pub trail: Trail,
}

impl Node {
    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// All nodes of an engine, indexed by `NodeIndex`.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    pub nodes: Vec<Node>,
}

impl NodeSet {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.0)
    }

    pub fn find(&self, id: &NodeId) -> Option<NodeIndex> {
        self.nodes.iter().position(|n| &n.id == id).map(NodeIndex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    /// Links `a` and `b` both ways. Self links and unknown slots are ignored.
    pub fn connect(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        if a == b || a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return false;
        }
        let added = self.nodes[a.0].connections.insert(b);
        self.nodes[b.0].connections.insert(a);
        added
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum::<usize>() / 2
    }

    pub fn filler_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_filler).count()
    }

    /// Unordered connected pairs with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.iter().flat_map(|(a, n)| {
            n.connections
                .iter()
                .filter(move |b| a < **b)
                .map(move |b| (a, *b))
        })
    }
}

#[cfg(test)]
pub(crate) fn test_node(id: &str, team: Team, position: Vec3) -> Node {
    Node {
        id: NodeId(id.to_string()),
        game_id: "g0".to_string(),
        team,
        label: id.to_string(),
        theme: Theme::Players,
        period: 1,
        is_filler: false,
        position,
        velocity: Vec3::ZERO,
        cluster_target: position,
        energy: 0.5,
        size: 1.0,
        color: [1.0, 1.0, 1.0],
        connections: BTreeSet::new(),
        active_connections: 0,
        trail: Trail::new(4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_is_symmetric_and_idempotent() {
        let mut set = NodeSet {
            nodes: vec![
                test_node("a", Team::Home, Vec3::ZERO),
                test_node("b", Team::Away, Vec3::X),
            ],
        };
        assert!(set.connect(NodeIndex(0), NodeIndex(1)));
        assert!(!set.connect(NodeIndex(1), NodeIndex(0)));
        assert!(!set.connect(NodeIndex(0), NodeIndex(0)));
        assert!(!set.connect(NodeIndex(0), NodeIndex(9)));

        assert_eq!(set.edge_count(), 1);
        assert_eq!(set.edges().collect::<Vec<_>>(), vec![(NodeIndex(0), NodeIndex(1))]);
        assert!(set.nodes[0].connections.contains(&NodeIndex(1)));
        assert!(set.nodes[1].connections.contains(&NodeIndex(0)));
    }

    #[test]
    fn theme_groups_override_kind() {
        assert_eq!(Theme::for_event(EventKind::Hit, &[]), Theme::Players);
        assert_eq!(Theme::for_event(EventKind::Shot, &[]), Theme::Saves);
        assert_eq!(
            Theme::for_event(EventKind::Hit, &["misc".to_string(), "Goals".to_string()]),
            Theme::Goals
        );
        assert!(Theme::Goals > Theme::Saves && Theme::Saves > Theme::Passes);
    }
}
