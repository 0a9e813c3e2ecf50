use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::params::GridSize;

/// Joins the sub-values of a combo cell, e.g. `"Mumbai Indians + India"`.
pub const COMBO_SEPARATOR: &str = " + ";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Team,
    Nation,
    Trophy,
    Combo,
}

impl Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellKind::Team => write!(f, "team"),
            CellKind::Nation => write!(f, "nation"),
            CellKind::Trophy => write!(f, "trophy"),
            CellKind::Combo => write!(f, "combo"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub value: String,
}

impl Cell {
    pub fn new(kind: CellKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn combo(parts: &[&str]) -> Self {
        Self::new(CellKind::Combo, parts.join(COMBO_SEPARATOR))
    }

    /// The `+`-separated sub-values of this cell's value, trimmed.
    /// A plain cell yields its whole value as the single part.
    pub fn parts(&self) -> Vec<&str> {
        self.value
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \"{}\"", self.kind, self.value)
    }
}

/// A generated board: `size.cell_count()` cells in row-major order,
/// immutable after generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: GridSize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), size.cell_count());
        Self { size, cells }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self
            .cells
            .chunks(self.size.dimension())
            .map(|row| row.iter().map(|cell| &cell.value).join(" | "))
            .join("\n");
        write!(f, "{rows}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_parts_are_split_and_trimmed() {
        let cell = Cell::combo(&["Mumbai Indians", "India"]);
        assert_eq!(cell.value, "Mumbai Indians + India");
        assert_eq!(cell.parts(), vec!["Mumbai Indians", "India"]);
    }

    #[test]
    fn plain_cell_is_its_own_single_part() {
        let cell = Cell::new(CellKind::Nation, "Australia");
        assert_eq!(cell.parts(), vec!["Australia"]);
    }

    #[test]
    fn ragged_separators_still_split() {
        let cell = Cell::new(CellKind::Combo, "Chennai Super Kings +India");
        assert_eq!(cell.parts(), vec!["Chennai Super Kings", "India"]);
    }
}
