use std::fs;
use std::path::Path;

use serde::Deserialize;
use types::{DataSource, Difficulty, GridSize};

/// Knobs for the simulation harness, resolved CLI > env > YAML file >
/// defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub pool_file: String,
    pub source: DataSource,
    pub grid_size: GridSize,
    pub difficulty: Difficulty,
    /// Rated bot matches to run.
    pub matches: usize,
    /// Simulated seconds charged per presented candidate.
    pub seconds_per_turn: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pool_file: "overall.json".to_string(),
            source: DataSource::Overall,
            grid_size: GridSize::Three,
            difficulty: Difficulty::Normal,
            matches: 1,
            seconds_per_turn: 5.0,
        }
    }
}

impl SimulationConfig {
    pub fn from_cli_or_env_or_yaml(cli_pool: Option<String>, yaml_path: Option<&Path>) -> Self {
        let mut config = yaml_path
            .and_then(|path| match fs::read_to_string(path) {
                Ok(text) => Some(text),
                Err(err) => {
                    log::warn!("could not read config {}: {err}", path.display());
                    None
                }
            })
            .and_then(|text| match serde_yaml::from_str::<SimulationConfig>(&text) {
                Ok(config) => Some(config),
                Err(err) => {
                    log::warn!("could not parse config: {err}");
                    None
                }
            })
            .unwrap_or_default();

        if let Ok(pool_file) = std::env::var("BINGO_POOL_FILE") {
            config.pool_file = pool_file;
        }
        if let Some(pool_file) = cli_pool {
            config.pool_file = pool_file;
        }
        config
    }
}
