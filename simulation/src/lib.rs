pub mod config;
pub mod loader;
pub mod runner;

pub use config::SimulationConfig;
pub use loader::{load_players, LoaderError};
pub use runner::{run_rated_match, run_session, SessionReport};
