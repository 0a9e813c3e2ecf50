pub mod cell;
pub mod params;
pub mod pool;

pub use cell::{Cell, CellKind, Grid, COMBO_SEPARATOR};
pub use params::{Difficulty, GameMode, GridSize};
pub use pool::{DataSource, PlayerPool, PlayerRecord};
