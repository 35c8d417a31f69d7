use glam::Vec3;
use rand::Rng;
use rinkgraph_core::{id_filler, id_player, Game, Team};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::graph::layout::{self, LayoutSeed};
use crate::graph::model::{Node, NodeIndex, NodeSet, Theme};
use crate::util::config::{IngestConfig, LayoutConfig};
use crate::util::trail::Trail;

const PLAYER_ENERGY: f32 = 0.3;
const FILLER_ENERGY: f32 = 0.1;
const MAX_SIZE_DEGREE: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub players: usize,
    pub fillers: usize,
    pub edges: usize,
    pub dropped_roster: usize,
    pub dropped_capacity: usize,
    pub duplicate_players: usize,
    pub unknown_participants: usize,
}

/// Role and first appearance of one player within a game.
#[derive(Debug, Clone, Copy)]
struct Involvement {
    theme: Theme,
    period: u8,
}

fn involvements(game: &Game) -> HashMap<&str, Involvement> {
    let mut out: HashMap<&str, Involvement> = HashMap::new();
    for event in &game.events {
        let theme = Theme::for_event(event.kind, &event.thematic_groups);
        let period = event.period.max(1);
        for player in &event.players {
            let e = out.entry(player.as_str()).or_insert(Involvement { theme, period });
            e.theme = e.theme.max(theme);
            e.period = e.period.min(period);
        }
    }
    out
}

/// Builds the node set and connection graph from a games snapshot.
///
/// Roster entries are visited game by game, home before away, in input
/// order; once `max_nodes` slots are taken the remaining entries are
/// dropped. Participants that do not resolve to an ingested node of the same
/// game are skipped. Never fails.
pub fn ingest<R: Rng + ?Sized>(
    games: &[Game],
    cfg: &IngestConfig,
    layout_cfg: &LayoutConfig,
    rng: &mut R,
) -> (NodeSet, IngestReport) {
    let mut set = NodeSet {
        nodes: Vec::with_capacity(cfg.max_nodes),
    };
    let mut report = IngestReport::default();
    let mut slots: HashMap<(usize, &str), NodeIndex> = HashMap::new();
    let total_games = games.len();

    for (gi, game) in games.iter().enumerate() {
        let roles = involvements(game);
        let mut seen: HashSet<&str> = HashSet::new();

        for team in [Team::Home, Team::Away] {
            let roster = game.roster(team);
            if roster.len() > cfg.max_roster_per_team {
                let extra = roster.len() - cfg.max_roster_per_team;
                report.dropped_roster += extra;
                tracing::warn!(game = %game.id, ?team, extra, "roster over limit, extra entries dropped");
            }

            for entry in roster.iter().take(cfg.max_roster_per_team) {
                if !seen.insert(entry.id.as_str()) {
                    report.duplicate_players += 1;
                    tracing::debug!(game = %game.id, player = %entry.id, "duplicate roster entry skipped");
                    continue;
                }
                if set.nodes.len() >= cfg.max_nodes {
                    report.dropped_capacity += 1;
                    continue;
                }

                let role = roles.get(entry.id.as_str()).copied().unwrap_or(Involvement {
                    theme: Theme::Players,
                    period: 1,
                });
                let seed = LayoutSeed {
                    game_index: gi,
                    total_games,
                    theme: role.theme,
                    team,
                    period: role.period,
                };
                let target = layout::cluster_target(&seed, layout_cfg, rng);
                let position = layout::initial_position(target, layout_cfg, rng);
                let color = match team {
                    Team::Home => cfg.home_color,
                    Team::Away => cfg.away_color,
                };

                slots.insert((gi, entry.id.as_str()), NodeIndex(set.nodes.len()));
                set.nodes.push(Node {
                    id: id_player(&game.id, &entry.id),
                    game_id: game.id.clone(),
                    team,
                    label: entry.display_label(),
                    theme: role.theme,
                    period: role.period,
                    is_filler: false,
                    position,
                    velocity: Vec3::ZERO,
                    cluster_target: target,
                    energy: PLAYER_ENERGY,
                    size: cfg.base_size,
                    color,
                    connections: BTreeSet::new(),
                    active_connections: 0,
                    trail: Trail::new(cfg.trail_length),
                });
            }
        }
    }

    if report.dropped_capacity > 0 {
        tracing::warn!(
            max_nodes = cfg.max_nodes,
            dropped = report.dropped_capacity,
            "node capacity reached, trailing roster entries dropped"
        );
    }
    report.players = set.nodes.len();

    for (gi, game) in games.iter().enumerate() {
        for event in &game.events {
            if event.players.len() < 2 {
                continue;
            }
            let mut members: SmallVec<[NodeIndex; 8]> = SmallVec::new();
            for player in &event.players {
                match slots.get(&(gi, player.as_str())) {
                    Some(idx) => members.push(*idx),
                    None => {
                        report.unknown_participants += 1;
                        tracing::debug!(game = %game.id, event = %event.id, %player, "participant not ingested");
                    }
                }
            }
            members.sort_unstable();
            members.dedup();

            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    set.connect(*a, *b);
                }
            }
        }
    }

    if report.unknown_participants > 0 {
        tracing::warn!(
            skipped = report.unknown_participants,
            "event participants without a matching node were skipped"
        );
    }

    for node in set.nodes.iter_mut() {
        let degree = node.connections.len().min(MAX_SIZE_DEGREE) as f32;
        node.size = cfg.base_size + cfg.degree_size * degree;
    }
    report.edges = set.edge_count();

    if cfg.fill_to_capacity {
        while set.nodes.len() < cfg.max_nodes {
            let n = set.nodes.len() - report.players;
            let position = layout::filler_position(layout_cfg, rng);
            set.nodes.push(Node {
                id: id_filler(n),
                game_id: String::new(),
                team: Team::Home,
                label: String::new(),
                theme: Theme::Players,
                period: 1,
                is_filler: true,
                position,
                velocity: Vec3::ZERO,
                cluster_target: position,
                energy: FILLER_ENERGY,
                size: cfg.base_size * 0.5,
                color: cfg.filler_color,
                connections: BTreeSet::new(),
                active_connections: 0,
                trail: Trail::new(0),
            });
        }
    }
    report.fillers = set.nodes.len() - report.players;

    tracing::info!(
        games = total_games,
        players = report.players,
        fillers = report.fillers,
        edges = report.edges,
        "graph ingested"
    );
    (set, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rinkgraph_core::{EventKind, GameEvent, NodeId, RosterEntry};

    fn roster(prefix: &str, n: usize) -> Vec<RosterEntry> {
        (0..n)
            .map(|i| RosterEntry {
                id: format!("{prefix}{i}"),
                name: format!("Player {prefix}{i}"),
                number: Some(i as u32 + 1),
                position: None,
            })
            .collect()
    }

    fn event(id: &str, kind: EventKind, period: u8, players: &[&str]) -> GameEvent {
        GameEvent {
            id: id.to_string(),
            kind,
            period,
            players: players.iter().map(|p| p.to_string()).collect(),
            thematic_groups: Vec::new(),
        }
    }

    fn game(id: &str, home: usize, away: usize, events: Vec<GameEvent>) -> Game {
        Game {
            id: id.to_string(),
            home_team: None,
            away_team: None,
            home_roster: roster("h", home),
            away_roster: roster("a", away),
            events,
        }
    }

    fn no_fill() -> IngestConfig {
        IngestConfig {
            fill_to_capacity: false,
            ..IngestConfig::default()
        }
    }

    fn run(games: &[Game], cfg: &IngestConfig) -> (NodeSet, IngestReport) {
        let mut rng = StdRng::seed_from_u64(42);
        ingest(games, cfg, &LayoutConfig::default(), &mut rng)
    }

    fn idx(set: &NodeSet, id: &str) -> NodeIndex {
        set.find(&NodeId(id.to_string())).expect("node present")
    }

    #[test]
    fn shared_event_links_all_pairs_symmetrically() {
        let games = vec![game(
            "g1",
            3,
            3,
            vec![event("e1", EventKind::Goal, 1, &["h0", "h1", "a2"])],
        )];
        let (set, report) = run(&games, &no_fill());

        assert_eq!(report.edges, 3);
        let ids = [idx(&set, "g1:h0"), idx(&set, "g1:h1"), idx(&set, "g1:a2")];
        for a in ids {
            for b in ids {
                if a != b {
                    assert!(set.nodes[a.0].connections.contains(&b));
                    assert!(set.nodes[b.0].connections.contains(&a));
                }
            }
        }
        for (a, n) in set.iter() {
            for b in &n.connections {
                assert!(set.nodes[b.0].connections.contains(&a));
            }
        }
    }

    #[test]
    fn repeated_events_do_not_duplicate_edges() {
        let games = vec![game(
            "g1",
            2,
            2,
            vec![
                event("e1", EventKind::Pass, 1, &["h0", "h1"]),
                event("e2", EventKind::Pass, 2, &["h1", "h0", "h0"]),
            ],
        )];
        let (set, report) = run(&games, &no_fill());
        assert_eq!(report.edges, 1);
        assert_eq!(set.nodes[idx(&set, "g1:h0").0].num_connections(), 1);
    }

    #[test]
    fn unknown_and_cross_game_participants_are_skipped() {
        let games = vec![
            game("g1", 2, 0, vec![event("e1", EventKind::Hit, 1, &["h0", "ghost", "h1"])]),
            game("g2", 2, 0, vec![event("e2", EventKind::Hit, 1, &["h0", "zz"])]),
        ];
        let (set, report) = run(&games, &no_fill());
        assert_eq!(report.unknown_participants, 2);
        assert_eq!(report.edges, 1);
        assert_eq!(set.nodes[idx(&set, "g2:h0").0].num_connections(), 0);
    }

    #[test]
    fn capacity_drops_the_last_entry_processed() {
        let mut games: Vec<Game> = (0..20).map(|i| game(&format!("g{i}"), 25, 25, vec![])).collect();
        games.push(game("g20", 1, 0, vec![]));
        let cfg = IngestConfig {
            max_nodes: 1000,
            ..IngestConfig::default()
        };

        let (set, report) = run(&games, &cfg);

        assert_eq!(set.len(), 1000);
        assert_eq!(report.dropped_capacity, 1);
        assert_eq!(report.fillers, 0);
        assert!(set.find(&NodeId("g20:h0".to_string())).is_none());
        assert!(set.find(&NodeId("g19:a24".to_string())).is_some());
    }

    #[test]
    fn fillers_take_remaining_slots_without_links() {
        let games = vec![game("g1", 5, 5, vec![event("e1", EventKind::Pass, 1, &["h0", "h1"])])];
        let cfg = IngestConfig {
            max_nodes: 50,
            ..IngestConfig::default()
        };
        let (set, report) = run(&games, &cfg);

        assert_eq!(set.len(), 50);
        assert_eq!(report.players, 10);
        assert_eq!(report.fillers, 40);
        assert_eq!(set.filler_count(), 40);
        for n in set.nodes.iter().filter(|n| n.is_filler) {
            assert!(n.connections.is_empty());
            assert!(n.energy <= 0.1 + f32::EPSILON);
            assert_eq!(n.position, n.cluster_target);
        }
        assert_eq!(set.nodes[10].id.0, "filler:0");
    }

    #[test]
    fn roster_limit_and_duplicates_are_tolerated() {
        let mut g = game("g1", 6, 1, vec![]);
        g.away_roster.push(g.home_roster[0].clone());
        let cfg = IngestConfig {
            max_roster_per_team: 4,
            ..no_fill()
        };
        let (set, report) = run(&[g], &cfg);
        assert_eq!(report.dropped_roster, 2);
        assert_eq!(report.duplicate_players, 1);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn theme_and_period_follow_event_involvement() {
        let games = vec![game(
            "g1",
            3,
            1,
            vec![
                event("e1", EventKind::Pass, 3, &["h0", "h1"]),
                event("e2", EventKind::Goal, 2, &["h0"]),
            ],
        )];
        let (set, _) = run(&games, &no_fill());
        let h0 = &set.nodes[idx(&set, "g1:h0").0];
        let h1 = &set.nodes[idx(&set, "g1:h1").0];
        let h2 = &set.nodes[idx(&set, "g1:h2").0];
        assert_eq!((h0.theme, h0.period), (Theme::Goals, 2));
        assert_eq!((h1.theme, h1.period), (Theme::Passes, 3));
        assert_eq!((h2.theme, h2.period), (Theme::Players, 1));
        assert!(h0.size > h2.size);
    }

    #[test]
    fn empty_input_with_fill_yields_only_fillers() {
        let cfg = IngestConfig {
            max_nodes: 12,
            ..IngestConfig::default()
        };
        let (set, report) = run(&[], &cfg);
        assert_eq!(set.len(), 12);
        assert_eq!(report.players, 0);
        assert_eq!(set.edge_count(), 0);
    }
}
