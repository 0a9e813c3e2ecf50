use std::fmt::Debug;

use engine::{matching, GameSession};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

/// What a player does with the currently presented candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Claim this grid cell.
    Fill(usize),
    /// Spend a skip.
    Skip,
    /// Do nothing and let the clock run out.
    Wait,
}

pub trait Strategy: Debug {
    fn choose(&mut self, session: &GameSession) -> Choice;
}

/// Claims a random open cell, right or wrong.
#[derive(Debug, Default)]
pub struct RandomStrategy {
    rng: ThreadRng,
}

impl Strategy for RandomStrategy {
    fn choose(&mut self, session: &GameSession) -> Choice {
        let open: Vec<usize> = session.open_cells().collect();
        match open.choose(&mut self.rng) {
            Some(&index) => Choice::Fill(index),
            None => Choice::Wait,
        }
    }
}

/// Fills the first open cell the candidate actually satisfies, skips
/// while the budget lasts, and otherwise guesses at random (a wrong
/// guess and a timeout cost the same).
#[derive(Debug, Default)]
pub struct GreedyStrategy {
    rng: ThreadRng,
}

impl Strategy for GreedyStrategy {
    fn choose(&mut self, session: &GameSession) -> Choice {
        let Some(candidate) = session.current_candidate() else {
            return Choice::Wait;
        };
        let hit = session
            .open_cells()
            .find(|&index| matching::matches(candidate, &session.grid().cells()[index]));
        if let Some(index) = hit {
            log::trace!("{} has a home at cell {index}", candidate.name);
            return Choice::Fill(index);
        }
        if session.skips_remaining() > 0 {
            return Choice::Skip;
        }
        let open: Vec<usize> = session.open_cells().collect();
        match open.choose(&mut self.rng) {
            Some(&index) => Choice::Fill(index),
            None => Choice::Wait,
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::GameSession;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use types::{DataSource, Difficulty, GridSize, PlayerPool, PlayerRecord};

    use super::*;

    fn pool() -> PlayerPool {
        let players = (0..9)
            .map(|i| PlayerRecord {
                id: format!("p{i}"),
                name: format!("Player {i}"),
                nation: "India".to_string(),
                teams: vec!["Mumbai Indians".to_string()],
                trophies: vec![],
            })
            .collect();
        PlayerPool::new(DataSource::Overall, players)
    }

    #[test]
    fn greedy_fills_a_matching_open_cell() {
        let session = GameSession::with_rng(
            &pool(),
            GridSize::Three,
            Difficulty::Easy,
            &mut StdRng::seed_from_u64(1),
        )
        .expect("pool is non-empty");

        // Every cell is "Mumbai Indians", so greedy must claim one.
        let mut strategy = GreedyStrategy::default();
        assert!(matches!(strategy.choose(&session), Choice::Fill(_)));
    }

    #[test]
    fn random_waits_only_on_a_full_board() {
        let mut session = GameSession::with_rng(
            &pool(),
            GridSize::Three,
            Difficulty::Easy,
            &mut StdRng::seed_from_u64(2),
        )
        .expect("pool is non-empty");
        let mut strategy = RandomStrategy::default();
        assert!(matches!(strategy.choose(&session), Choice::Fill(_)));

        for index in 0..9 {
            session.submit_move(index).expect("every candidate matches");
        }
        assert!(matches!(strategy.choose(&session), Choice::Wait));
    }
}
