use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Side length of the bingo grid. Only 3×3 and 4×4 boards exist; the
/// numeric wire form ("grid_size": 3) is preserved via serde.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridSize {
    Three,
    Four,
}

impl GridSize {
    pub fn dimension(self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Four => 4,
        }
    }

    pub fn cell_count(self) -> usize {
        self.dimension() * self.dimension()
    }
}

impl From<GridSize> for u8 {
    fn from(size: GridSize) -> Self {
        size.dimension() as u8
    }
}

impl TryFrom<u8> for GridSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(GridSize::Three),
            4 => Ok(GridSize::Four),
            other => Err(format!("unsupported grid size {other}; expected 3 or 4")),
        }
    }
}

impl Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}x{0}", self.dimension())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Normal => write!(f, "normal"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// How a session was entered. Only `Rated` games touch ratings;
/// `Friends` games finish unscored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solo,
    Rated,
    Friends,
    Daily,
}

impl Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Solo => write!(f, "solo"),
            GameMode::Rated => write!(f, "rated"),
            GameMode::Friends => write!(f, "friends"),
            GameMode::Daily => write!(f, "daily"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_round_trips_through_numbers() {
        assert_eq!(GridSize::try_from(3), Ok(GridSize::Three));
        assert_eq!(GridSize::try_from(4), Ok(GridSize::Four));
        assert!(GridSize::try_from(5).is_err());
        assert_eq!(u8::from(GridSize::Four), 4);
        assert_eq!(GridSize::Three.cell_count(), 9);
        assert_eq!(GridSize::Four.cell_count(), 16);
    }
}
