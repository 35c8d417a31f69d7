use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn id_player(game_id: &str, player_id: &str) -> NodeId {
    NodeId(format!("{game_id}:{player_id}"))
}

pub fn id_filler(n: usize) -> NodeId {
    NodeId(format!("filler:{n}"))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Home,
    Away,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub position: Option<String>,
}

impl RosterEntry {
    pub fn display_label(&self) -> String {
        let name = if self.name.trim().is_empty() {
            self.id.as_str()
        } else {
            self.name.trim()
        };
        match self.number {
            Some(n) => format!("#{n} {name}"),
            None => name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Goal,
    Assist,
    Shot,
    Save,
    Pass,
    Hit,
    Block,
    Penalty,
    Faceoff,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default = "default_period")]
    pub period: u8,
    #[serde(default, deserialize_with = "ids_string_or_number")]
    pub players: Vec<String>,
    #[serde(default)]
    pub thematic_groups: Vec<String>,
}

fn default_period() -> u8 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub home_roster: Vec<RosterEntry>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub away_roster: Vec<RosterEntry>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub events: Vec<GameEvent>,
}

impl Game {
    pub fn roster(&self, team: Team) -> &[RosterEntry] {
        match team {
            Team::Home => &self.home_roster,
            Team::Away => &self.away_roster,
        }
    }
}

/// Ids arrive as strings or as bare JSON numbers (league player ids).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Str(String),
    Num(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Str(s) => s,
            RawId::Num(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    RawId::deserialize(de).map(String::from)
}

fn ids_string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let raw: Vec<RawId> = Vec::deserialize(de)?;
    Ok(raw.into_iter().map(String::from).collect())
}

/// Decodes list items one by one; items that do not decode are dropped with a
/// warning instead of failing the surrounding document.
fn decode_items<T: DeserializeOwned>(items: Vec<serde_json::Value>, what: &'static str) -> Vec<T> {
    let total = items.len();
    let mut out = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(value) => out.push(value),
            Err(err) => tracing::warn!(what, index, %err, "malformed item skipped"),
        }
    }
    if out.len() < total {
        tracing::debug!(what, kept = out.len(), total, "partial list decoded");
    }
    out
}

fn skip_malformed<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items: Vec<serde_json::Value> = Vec::deserialize(de)?;
    Ok(decode_items(items, std::any::type_name::<T>()))
}

/// Games snapshot as handed over by the data layer: either a bare list or an
/// object wrapping it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum GamesFile {
    List(Vec<serde_json::Value>),
    Wrapped { games: Vec<serde_json::Value> },
}

/// Fails only when the document is not JSON or not a list of games at all;
/// individual games, roster entries and events that do not decode are
/// skipped.
pub fn parse_games(json: &str) -> serde_json::Result<Vec<Game>> {
    let file: GamesFile = serde_json::from_str(json)?;
    let items = match file {
        GamesFile::List(games) => games,
        GamesFile::Wrapped { games } => games,
    };
    Ok(decode_items(items, "game"))
}
