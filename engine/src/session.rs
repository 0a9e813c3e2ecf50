use std::fmt::Display;

use chrono::{DateTime, Utc};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use types::{DataSource, Difficulty, Grid, GridSize, PlayerPool, PlayerRecord};

use crate::{error::EngineError, generator, matching};

/// Skips granted at the start of every session.
pub const INITIAL_SKIPS: u8 = 3;

/// Candidates drawn per session, as a multiple of the cell count.
const CANDIDATE_FACTOR: usize = 3;

/// Par time per cell in seconds; play beyond it costs score.
const SECONDS_PER_CELL: f64 = 15.0;

const COMPLETION_BONUS: f64 = 200.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionReason {
    GridComplete,
    CandidatesExhausted,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    InProgress,
    Completed(CompletionReason),
}

/// One match in play: the board, the shuffled queue of candidate
/// players, and the running tally. Mutated strictly sequentially by the
/// owning player's actions; the surrounding layer serializes it between
/// calls and supplies elapsed time, so a deserialized session resumes
/// exactly where it left off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    source: DataSource,
    difficulty: Difficulty,
    grid: Grid,
    fill: Vec<Option<String>>,
    candidates: Vec<PlayerRecord>,
    cursor: usize,
    correct: u32,
    wrong: u32,
    skips_remaining: u8,
    wildcard_used: bool,
    status: SessionStatus,
    started_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(
        pool: &PlayerPool,
        size: GridSize,
        difficulty: Difficulty,
    ) -> Result<Self, EngineError> {
        Self::with_rng(pool, size, difficulty, &mut thread_rng())
    }

    /// Seeded construction; the daily challenge derives its rng from
    /// the date so every caller gets the identical board and queue.
    pub fn with_rng(
        pool: &PlayerPool,
        size: GridSize,
        difficulty: Difficulty,
        rng: &mut impl Rng,
    ) -> Result<Self, EngineError> {
        let grid = generator::generate(pool, size, difficulty, rng)?;
        let mut candidates = pool.players().to_vec();
        candidates.shuffle(rng);
        candidates.truncate(CANDIDATE_FACTOR * size.cell_count());
        log::debug!(
            "new {difficulty} session on a {size} grid with {} candidates",
            candidates.len()
        );
        Ok(Self {
            source: pool.source(),
            difficulty,
            fill: vec![None; size.cell_count()],
            grid,
            candidates,
            cursor: 0,
            correct: 0,
            wrong: 0,
            skips_remaining: INITIAL_SKIPS,
            wildcard_used: false,
            status: SessionStatus::InProgress,
            started_at: Utc::now(),
        })
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> GridSize {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Which candidate id filled each cell, by grid position.
    pub fn fill(&self) -> &[Option<String>] {
        &self.fill
    }

    /// The player currently shown to the user, if any remain.
    pub fn current_candidate(&self) -> Option<&PlayerRecord> {
        self.candidates.get(self.cursor)
    }

    pub fn candidates_remaining(&self) -> usize {
        self.candidates.len().saturating_sub(self.cursor)
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    pub fn skips_remaining(&self) -> u8 {
        self.skips_remaining
    }

    pub fn wildcard_used(&self) -> bool {
        self.wildcard_used
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn grid_complete(&self) -> bool {
        self.fill.iter().all(Option::is_some)
    }

    /// Indices of cells nobody has filled yet.
    pub fn open_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.fill
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .map(|(index, _)| index)
    }

    /// Claim `cell_index` for the current candidate. A correct claim
    /// fills the cell; either way the candidate is consumed. Returns
    /// whether the claim was correct.
    pub fn submit_move(&mut self, cell_index: usize) -> Result<bool, EngineError> {
        self.ensure_in_progress()?;
        let cell = self
            .grid
            .get(cell_index)
            .ok_or(EngineError::CellOutOfBounds {
                index: cell_index,
                cells: self.grid.len(),
            })?;
        if self.fill[cell_index].is_some() {
            return Err(EngineError::CellAlreadyFilled(cell_index));
        }
        let candidate = self
            .candidates
            .get(self.cursor)
            .ok_or(EngineError::CandidatesExhausted)?;

        let correct = matching::matches(candidate, cell);
        if correct {
            log::debug!("{} fills {cell}", candidate.name);
            self.fill[cell_index] = Some(candidate.id.clone());
            self.correct += 1;
        } else {
            log::debug!("{} does not satisfy {cell}", candidate.name);
            self.wrong += 1;
        }
        self.advance();
        Ok(correct)
    }

    /// Spend a skip to discard the current candidate. Skips still count
    /// against accuracy.
    pub fn skip(&mut self) -> Result<(), EngineError> {
        self.ensure_in_progress()?;
        if self.skips_remaining == 0 {
            return Err(EngineError::NoSkipsLeft);
        }
        self.skips_remaining -= 1;
        self.wrong += 1;
        self.advance();
        Ok(())
    }

    /// The caller's per-candidate timer ran out: an automatic wrong
    /// guess. The core owns no clock, so this is driven from outside.
    pub fn time_out(&mut self) -> Result<(), EngineError> {
        self.ensure_in_progress()?;
        self.wrong += 1;
        self.advance();
        Ok(())
    }

    /// One-time hint: the open cells the current candidate satisfies.
    /// Does not consume the candidate.
    pub fn wildcard(&mut self) -> Result<Vec<usize>, EngineError> {
        self.ensure_in_progress()?;
        if self.wildcard_used {
            return Err(EngineError::WildcardAlreadyUsed);
        }
        let candidate = self
            .candidates
            .get(self.cursor)
            .ok_or(EngineError::CandidatesExhausted)?;
        self.wildcard_used = true;
        Ok(self
            .grid
            .cells()
            .iter()
            .enumerate()
            .filter(|(index, cell)| {
                self.fill[*index].is_none() && matching::matches(candidate, cell)
            })
            .map(|(index, _)| index)
            .collect())
    }

    /// Abandon the session immediately.
    pub fn quit(&mut self) {
        if self.status == SessionStatus::InProgress {
            self.status = SessionStatus::Completed(CompletionReason::Quit);
        }
    }

    /// Percentage of attempts that were correct; 0 before any attempt.
    pub fn accuracy(&self) -> f64 {
        let attempts = self.correct + self.wrong;
        if attempts == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(attempts) * 100.0
        }
    }

    /// Score after `elapsed_seconds` of wall-clock play: 100 per
    /// correct answer, a small accuracy bonus, 200 for a full board,
    /// minus half a point per second past par (15s per cell). The
    /// client computes this independently, so the formula must not
    /// drift.
    pub fn score(&self, elapsed_seconds: f64) -> u32 {
        let par = self.grid.len() as f64 * SECONDS_PER_CELL;
        let overtime = (elapsed_seconds - par).max(0.0) * 0.5;
        let bonus = if self.grid_complete() {
            COMPLETION_BONUS
        } else {
            0.0
        };
        let raw = f64::from(self.correct) * 100.0 + self.accuracy() * 2.0 + bonus - overtime;
        raw.round().max(0.0) as u32
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::Completed(_) => Err(EngineError::SessionOver),
        }
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.grid_complete() {
            self.status = SessionStatus::Completed(CompletionReason::GridComplete);
        } else if self.cursor >= self.candidates.len() {
            self.status = SessionStatus::Completed(CompletionReason::CandidatesExhausted);
        }
    }
}

impl Display for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = self.fill.iter().filter(|owner| owner.is_some()).count();
        let candidate = self
            .current_candidate()
            .map_or_else(|| "-".to_string(), |player| player.name.clone());
        write!(
            f,
            "{}/{} filled, {} correct / {} wrong, up: {}",
            filled,
            self.grid.len(),
            self.correct,
            self.wrong,
            candidate
        )
    }
}
