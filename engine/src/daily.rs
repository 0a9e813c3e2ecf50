use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use types::{Difficulty, GridSize, PlayerPool};

use crate::{error::EngineError, session::GameSession};

/// Seed for a given date's shared board. FNV-1a over the ISO date:
/// everyone must derive the identical seed across hosts and builds, so
/// no process-keyed hasher can be used here.
pub fn daily_seed(date: NaiveDate) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in date.to_string().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// The daily challenge: one 3x3 normal board per date, identical for
/// every caller. Storing the result and enforcing one attempt per user
/// stays with the surrounding layer.
pub fn daily_session(pool: &PlayerPool, date: NaiveDate) -> Result<GameSession, EngineError> {
    let mut rng = StdRng::seed_from_u64(daily_seed(date));
    GameSession::with_rng(pool, GridSize::Three, Difficulty::Normal, &mut rng)
}

#[cfg(test)]
mod tests {
    use types::{DataSource, PlayerRecord};

    use super::*;

    fn pool() -> PlayerPool {
        let nations = ["India", "Australia", "England", "South Africa"];
        let teams = [
            "Mumbai Indians",
            "Chennai Super Kings",
            "Gujarat Titans",
            "Rajasthan Royals",
        ];
        let players = (0..12)
            .map(|i| PlayerRecord {
                id: format!("p{i}"),
                name: format!("Player {i}"),
                nation: nations[i % 4].to_string(),
                teams: vec![teams[i / 3].to_string()],
                trophies: vec![],
            })
            .collect();
        PlayerPool::new(DataSource::Overall, players)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid ISO date")
    }

    #[test]
    fn same_date_yields_the_same_board_and_queue() {
        let pool = pool();
        let a = daily_session(&pool, date("2026-08-04")).expect("non-empty pool");
        let b = daily_session(&pool, date("2026-08-04")).expect("non-empty pool");
        assert_eq!(a.grid(), b.grid());
        assert_eq!(
            a.current_candidate().map(|p| &p.id),
            b.current_candidate().map(|p| &p.id)
        );
    }

    #[test]
    fn different_dates_yield_different_seeds() {
        assert_ne!(daily_seed(date("2026-08-04")), daily_seed(date("2026-08-05")));
    }
}
