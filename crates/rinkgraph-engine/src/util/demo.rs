use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rinkgraph_core::{EventKind, Game, GameEvent, RosterEntry, Team};

const ROSTER_SIZE: usize = 20;
const EVENTS_PER_GAME: usize = 36;

const TEAMS: &[&str] = &[
    "Oilers", "Leafs", "Canucks", "Flames", "Jets", "Senators", "Canadiens", "Bruins",
];

const SURNAMES: &[&str] = &[
    "Ahlberg", "Bouchard", "Carlsson", "Doyle", "Eriksson", "Fournier", "Gagne", "Hartley",
    "Ivanov", "Jokinen", "Kowalski", "Lindqvist", "Moreau", "Nylander", "Olsen", "Pelletier",
    "Quinn", "Rask", "Sundin", "Tkachuk", "Ullmark", "Vasquez", "Wennberg", "Zadina",
];

/// Deterministic synthetic games for demo mode and the headless runner.
pub fn demo_games(count: usize, seed: u64) -> Vec<Game> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|i| demo_game(i, &mut rng)).collect()
}

fn demo_game(index: usize, rng: &mut StdRng) -> Game {
    let home = TEAMS[(index * 2) % TEAMS.len()];
    let away = TEAMS[(index * 2 + 1) % TEAMS.len()];
    let home_roster = demo_roster("h", rng);
    let away_roster = demo_roster("a", rng);

    let mut events = Vec::with_capacity(EVENTS_PER_GAME);
    for n in 0..EVENTS_PER_GAME {
        let period = 1 + (n * 3 / EVENTS_PER_GAME) as u8;
        let team = if rng.gen_bool(0.5) { Team::Home } else { Team::Away };
        let (own, other) = match team {
            Team::Home => (&home_roster, &away_roster),
            Team::Away => (&away_roster, &home_roster),
        };
        let skater = |rng: &mut StdRng, roster: &[RosterEntry]| {
            roster[rng.gen_range(1..roster.len())].id.clone()
        };

        let roll: f32 = rng.gen();
        let (kind, players) = if roll < 0.12 {
            let mut players = vec![skater(rng, own)];
            for _ in 0..rng.gen_range(0..=2) {
                players.push(skater(rng, own));
            }
            (EventKind::Goal, players)
        } else if roll < 0.35 {
            (EventKind::Save, vec![skater(rng, own), other[0].id.clone()])
        } else if roll < 0.6 {
            (EventKind::Pass, vec![skater(rng, own), skater(rng, own)])
        } else if roll < 0.78 {
            (EventKind::Hit, vec![skater(rng, own), skater(rng, other)])
        } else if roll < 0.92 {
            (EventKind::Faceoff, vec![skater(rng, own), skater(rng, other)])
        } else {
            (EventKind::Penalty, vec![skater(rng, own)])
        };

        events.push(GameEvent {
            id: format!("g{index}-e{n}"),
            kind,
            period,
            players,
            thematic_groups: Vec::new(),
        });
    }

    Game {
        id: format!("g{index}"),
        home_team: Some(home.to_string()),
        away_team: Some(away.to_string()),
        home_roster,
        away_roster,
        events,
    }
}

fn demo_roster(prefix: &str, rng: &mut StdRng) -> Vec<RosterEntry> {
    let mut numbers: Vec<u32> = (1..=98).collect();
    numbers.shuffle(rng);
    (0..ROSTER_SIZE)
        .map(|i| RosterEntry {
            id: format!("{prefix}{i}"),
            name: SURNAMES[rng.gen_range(0..SURNAMES.len())].to_string(),
            number: Some(numbers[i]),
            position: Some(if i == 0 { "G" } else { "F" }.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_games_are_deterministic_per_seed() {
        let a = demo_games(3, 7);
        let b = demo_games(3, 7);
        assert_eq!(a, b);
        assert_ne!(a, demo_games(3, 8));
    }

    #[test]
    fn demo_events_reference_roster_ids() {
        for game in demo_games(2, 1) {
            assert_eq!(game.home_roster.len(), ROSTER_SIZE);
            assert_eq!(game.away_roster.len(), ROSTER_SIZE);
            for e in &game.events {
                assert!((1..=3).contains(&e.period));
                for p in &e.players {
                    let known = game.home_roster.iter().chain(&game.away_roster).any(|r| &r.id == p);
                    assert!(known, "unknown player {p} in {}", e.id);
                }
            }
        }
    }
}
