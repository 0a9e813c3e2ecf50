use thiserror::Error;
use types::DataSource;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no player data available for the {0} pool")]
    EmptyPool(DataSource),

    #[error("cell index {index} is outside a {cells}-cell grid")]
    CellOutOfBounds { index: usize, cells: usize },

    #[error("cell {0} is already filled")]
    CellAlreadyFilled(usize),

    #[error("the candidate queue is exhausted")]
    CandidatesExhausted,

    #[error("no skips left")]
    NoSkipsLeft,

    #[error("the wildcard has already been used")]
    WildcardAlreadyUsed,

    #[error("the session is already complete")]
    SessionOver,
}
