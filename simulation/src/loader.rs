use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use types::{DataSource, PlayerPool, PlayerRecord};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read player data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed player data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk record shape. The overall file carries `iplTeams` and
/// `trophies`; the current-season file a single `team`. Ids and names
/// may be missing; `PlayerPool::new` normalizes that away.
#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nation: String,
    #[serde(default, alias = "iplTeams")]
    teams: Vec<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    trophies: Vec<String>,
}

impl From<RawPlayer> for PlayerRecord {
    fn from(raw: RawPlayer) -> Self {
        let mut teams = raw.teams;
        if teams.is_empty() {
            teams.extend(raw.team);
        }
        PlayerRecord {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            nation: raw.nation,
            teams,
            trophies: raw.trophies,
        }
    }
}

/// Read and normalize a player pool from a JSON file. Runs once at
/// startup; the pool is immutable afterwards.
pub fn load_players(path: &Path, source: DataSource) -> Result<PlayerPool, LoaderError> {
    let text = fs::read_to_string(path)?;
    let raw: Vec<RawPlayer> = serde_json::from_str(&text)?;
    let records = raw.into_iter().map(PlayerRecord::from).collect();
    let pool = PlayerPool::new(source, records);
    log::info!("loaded {} players from {}", pool.len(), path.display());
    Ok(pool)
}
