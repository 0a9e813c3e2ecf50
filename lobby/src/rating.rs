use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::GameMode;
use uuid::Uuid;

/// Rating every player starts a season with.
pub const DEFAULT_RATING: f64 = 1200.0;

pub const K_FACTOR: f64 = 32.0;

/// Logistic expectation of a win for a player rated `rating` against
/// `opponent`. Symmetric: the two sides' expectations sum to 1.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Standard ELO step; `actual` is 1.0 for a win, 0.0 for a loss.
pub fn update_rating(rating: f64, expected: f64, actual: f64, k: f64) -> f64 {
    rating + k * (actual - expected)
}

/// One side's end-of-game report, produced by its local session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub score: f64,
    pub elapsed_seconds: f64,
    pub accuracy: f64,
}

/// Whether result `a` beats result `b`: higher score wins, and a tied
/// score goes to the faster-or-equal side.
pub fn beats(a: &PlayerResult, b: &PlayerResult) -> bool {
    a.score > b.score || (a.score == b.score && a.elapsed_seconds <= b.elapsed_seconds)
}

/// Per-season aggregate row for one user, materialized lazily: a user
/// with no row yet is simply `SeasonRating::new`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonRating {
    pub user_id: Uuid,
    pub season_id: i64,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,
    pub accuracy_sum: f64,
    pub time_sum: f64,
    pub win_streak: u32,
    pub best_streak: u32,
}

impl SeasonRating {
    pub fn new(user_id: Uuid, season_id: i64) -> Self {
        Self {
            user_id,
            season_id,
            rating: DEFAULT_RATING,
            wins: 0,
            losses: 0,
            total_games: 0,
            accuracy_sum: 0.0,
            time_sum: 0.0,
            win_streak: 0,
            best_streak: 0,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.total_games) * 100.0
        }
    }

    pub fn average_accuracy(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            self.accuracy_sum / f64::from(self.total_games)
        }
    }

    pub fn average_time(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            self.time_sum / f64::from(self.total_games)
        }
    }

    pub fn tier(&self) -> RatingTier {
        RatingTier::for_rating(self.rating)
    }

    fn record_win(&mut self) {
        self.wins += 1;
        self.win_streak += 1;
        self.best_streak = self.best_streak.max(self.win_streak);
    }

    fn record_loss(&mut self) {
        self.losses += 1;
        self.win_streak = 0;
    }

    fn record_game(&mut self, result: &PlayerResult) {
        self.total_games += 1;
        self.accuracy_sum += result.accuracy;
        self.time_sum += result.elapsed_seconds;
    }
}

/// Finished rated match, appended to history. `rating_delta` is the
/// magnitude; the sign is applied per viewer at read time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub host_id: Uuid,
    pub guest_id: Uuid,
    pub winner_id: Uuid,
    pub host_result: PlayerResult,
    pub guest_result: PlayerResult,
    pub rating_delta: f64,
    pub mode: GameMode,
    pub season_id: i64,
    pub played_at: DateTime<Utc>,
}

/// Signed rating change as shown to `viewer`.
pub fn viewer_delta(record: &MatchRecord, viewer: Uuid) -> f64 {
    if record.winner_id == viewer {
        record.rating_delta
    } else {
        -record.rating_delta
    }
}

/// Apply a finished rated match to both season rows as one unit; the
/// caller persists both rows or neither. Both new ratings derive from
/// the pre-match values, so with equal starting ratings the deltas are
/// equal and opposite.
pub fn settle_match(
    host: &mut SeasonRating,
    guest: &mut SeasonRating,
    host_result: PlayerResult,
    guest_result: PlayerResult,
) -> MatchRecord {
    debug_assert_eq!(host.season_id, guest.season_id);

    let host_won = beats(&host_result, &guest_result);
    let expected = expected_score(host.rating, guest.rating);
    let actual = if host_won { 1.0 } else { 0.0 };
    let new_host = update_rating(host.rating, expected, actual, K_FACTOR);
    let new_guest = update_rating(guest.rating, 1.0 - expected, 1.0 - actual, K_FACTOR);
    let delta = ((new_host - host.rating) * 10.0).round() / 10.0;

    host.rating = new_host;
    guest.rating = new_guest;
    if host_won {
        host.record_win();
        guest.record_loss();
    } else {
        guest.record_win();
        host.record_loss();
    }
    host.record_game(&host_result);
    guest.record_game(&guest_result);

    let record = MatchRecord {
        host_id: host.user_id,
        guest_id: guest.user_id,
        winner_id: if host_won { host.user_id } else { guest.user_id },
        host_result,
        guest_result,
        rating_delta: delta.abs(),
        mode: GameMode::Rated,
        season_id: host.season_id,
        played_at: Utc::now(),
    };
    log::info!(
        "rated match settled: {} beat {} (±{:.1})",
        record.winner_id,
        if host_won { guest.user_id } else { host.user_id },
        record.rating_delta
    );
    record
}

/// Solo and daily games touch the aggregates but never the rating.
pub fn record_unrated(row: &mut SeasonRating, result: &PlayerResult) {
    row.record_game(result);
}

/// Display tier for a rating, from the season leaderboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingTier {
    Beginner,
    Amateur,
    Pro,
    Elite,
    Legend,
}

impl RatingTier {
    pub fn for_rating(rating: f64) -> Self {
        if rating < 1000.0 {
            RatingTier::Beginner
        } else if rating < 1200.0 {
            RatingTier::Amateur
        } else if rating < 1400.0 {
            RatingTier::Pro
        } else if rating < 1600.0 {
            RatingTier::Elite
        } else {
            RatingTier::Legend
        }
    }
}

impl Display for RatingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingTier::Beginner => write!(f, "Beginner"),
            RatingTier::Amateur => write!(f, "Amateur"),
            RatingTier::Pro => write!(f, "Pro"),
            RatingTier::Elite => write!(f, "Elite"),
            RatingTier::Legend => write!(f, "Legend"),
        }
    }
}
