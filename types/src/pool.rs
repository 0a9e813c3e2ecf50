use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Which player universe a pool was loaded from. The overall pool
/// carries full franchise histories and trophy cabinets; the
/// current-season pool knows one team per player and no trophies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Overall,
    Current,
}

impl Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Overall => write!(f, "overall"),
            DataSource::Current => write!(f, "current"),
        }
    }
}

/// One cricket player. Immutable once the pool is built; identity is
/// `id`. `teams` is the franchise history in chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub nation: String,
    pub teams: Vec<String>,
    pub trophies: Vec<String>,
}

impl PlayerRecord {
    pub fn current_team(&self) -> Option<&str> {
        self.teams.first().map(String::as_str)
    }
}

impl Display for PlayerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.nation)
    }
}

/// Read-only collection of players for one data source, built once at
/// startup and injected wherever generation or evaluation needs it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerPool {
    source: DataSource,
    players: Vec<PlayerRecord>,
}

impl PlayerPool {
    /// Build a pool from raw records, normalizing as we go: blank ids
    /// get a stable name-derived surrogate (identity never comes from
    /// pool position), and current-season records are cut down to a
    /// single team with no trophies.
    pub fn new(source: DataSource, records: Vec<PlayerRecord>) -> Self {
        let players = records
            .into_iter()
            .filter_map(|record| normalize(source, record))
            .collect();
        Self { source, players }
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn get(&self, id: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Distinct team names across the pool, sorted.
    pub fn team_names(&self) -> Vec<&str> {
        self.players
            .iter()
            .flat_map(|player| &player.teams)
            .map(String::as_str)
            .sorted()
            .dedup()
            .collect()
    }

    /// Distinct nations across the pool, sorted.
    pub fn nations(&self) -> Vec<&str> {
        self.players
            .iter()
            .map(|player| player.nation.as_str())
            .filter(|nation| !nation.is_empty())
            .sorted()
            .dedup()
            .collect()
    }

    /// Distinct trophies across the pool, sorted. Empty for the
    /// current-season source.
    pub fn trophies(&self) -> Vec<&str> {
        self.players
            .iter()
            .flat_map(|player| &player.trophies)
            .map(String::as_str)
            .sorted()
            .dedup()
            .collect()
    }
}

fn normalize(source: DataSource, mut record: PlayerRecord) -> Option<PlayerRecord> {
    record.teams.retain(|team| !team.trim().is_empty());
    if record.id.trim().is_empty() {
        if record.name.trim().is_empty() {
            log::warn!("dropping player record with neither id nor name ({record:?})");
            return None;
        }
        record.id = surrogate_id(&record.name, &record.nation);
    }
    if source == DataSource::Current {
        record.teams.truncate(1);
        record.trophies.clear();
    }
    Some(record)
}

/// Stable slug surrogate for records the data file shipped without an
/// id, e.g. ("MS Dhoni", "India") -> "ms-dhoni-india".
fn surrogate_id(name: &str, nation: &str) -> String {
    format!("{name} {nation}")
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, nation: &str, teams: &[&str], trophies: &[&str]) -> PlayerRecord {
        PlayerRecord {
            id: id.to_string(),
            name: name.to_string(),
            nation: nation.to_string(),
            teams: teams.iter().map(ToString::to_string).collect(),
            trophies: trophies.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn blank_id_gets_name_surrogate() {
        let pool = PlayerPool::new(
            DataSource::Overall,
            vec![record("", "MS Dhoni", "India", &["Chennai Super Kings"], &[])],
        );
        assert_eq!(pool.players()[0].id, "ms-dhoni-india");
    }

    #[test]
    fn record_without_id_or_name_is_dropped() {
        let pool = PlayerPool::new(
            DataSource::Overall,
            vec![
                record("", "", "India", &["Chennai Super Kings"], &[]),
                record("p1", "Suresh Raina", "India", &["Chennai Super Kings"], &[]),
            ],
        );
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.players()[0].id, "p1");
    }

    #[test]
    fn current_source_keeps_one_team_and_no_trophies() {
        let pool = PlayerPool::new(
            DataSource::Current,
            vec![record(
                "p1",
                "Rohit Sharma",
                "India",
                &["Mumbai Indians", "Deccan Chargers"],
                &["IPL 2020"],
            )],
        );
        let player = &pool.players()[0];
        assert_eq!(player.teams, vec!["Mumbai Indians".to_string()]);
        assert!(player.trophies.is_empty());
    }

    #[test]
    fn unions_are_distinct_and_sorted() {
        let pool = PlayerPool::new(
            DataSource::Overall,
            vec![
                record("p1", "A", "India", &["Mumbai Indians"], &["IPL 2020"]),
                record("p2", "B", "Australia", &["Mumbai Indians", "Gujarat Titans"], &[]),
                record("p3", "C", "India", &["Chennai Super Kings"], &["IPL 2020"]),
            ],
        );
        assert_eq!(
            pool.team_names(),
            vec!["Chennai Super Kings", "Gujarat Titans", "Mumbai Indians"]
        );
        assert_eq!(pool.nations(), vec!["Australia", "India"]);
        assert_eq!(pool.trophies(), vec!["IPL 2020"]);
    }
}
