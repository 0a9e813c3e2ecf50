pub mod daily;
pub mod error;
pub mod generator;
pub mod matching;
pub mod session;

pub use daily::{daily_seed, daily_session};
pub use error::EngineError;
pub use generator::generate;
pub use matching::matches;
pub use session::{CompletionReason, GameSession, SessionStatus, INITIAL_SKIPS};
