use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::{DataSource, Difficulty, GridSize};
use uuid::Uuid;

/// Widest allowed rating gap between paired opponents.
pub const RATING_WINDOW: f64 = 300.0;

/// A queued request to be paired with an opponent. At most one live
/// ticket per user; re-enqueueing replaces the old one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub user_id: Uuid,
    pub rating: f64,
    pub source: DataSource,
    pub grid_size: GridSize,
    pub difficulty: Difficulty,
    pub joined_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(
        user_id: Uuid,
        rating: f64,
        source: DataSource,
        grid_size: GridSize,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            user_id,
            rating,
            source,
            grid_size,
            difficulty,
            joined_at: Utc::now(),
        }
    }

    /// Opponents must want the same game and sit within the rating
    /// window.
    fn compatible_with(&self, other: &Ticket) -> bool {
        self.source == other.source
            && self.grid_size == other.grid_size
            && self.difficulty == other.difficulty
            && (self.rating - other.rating).abs() <= RATING_WINDOW
    }
}

/// The shared matchmaking queue. All find-or-insert work happens under
/// one mutex, so two concurrent enqueues can never both claim the same
/// waiting ticket. Timing out a search (and falling back to solo) is
/// the caller's job; tickets wait here until paired or cancelled.
#[derive(Debug, Default)]
pub struct Matchmaker {
    tickets: Mutex<Vec<Ticket>>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `ticket`, replacing any earlier ticket from the same
    /// user. Returns the partner's (removed) ticket when a compatible
    /// opponent was already waiting; the caller then opens the room
    /// and notifies both sides. `None` means "still searching".
    pub fn enqueue(&self, ticket: Ticket) -> Option<Ticket> {
        let mut tickets = self.lock();
        tickets.retain(|queued| queued.user_id != ticket.user_id);

        let partner_index = tickets
            .iter()
            .enumerate()
            .filter(|(_, queued)| queued.compatible_with(&ticket))
            .min_by(|(_, a), (_, b)| {
                let gap_a = (a.rating - ticket.rating).abs();
                let gap_b = (b.rating - ticket.rating).abs();
                gap_a.total_cmp(&gap_b)
            })
            .map(|(index, _)| index);

        match partner_index {
            Some(index) => {
                let partner = tickets.remove(index);
                log::info!(
                    "paired {} ({:.0}) with {} ({:.0})",
                    ticket.user_id,
                    ticket.rating,
                    partner.user_id,
                    partner.rating
                );
                Some(partner)
            }
            None => {
                log::debug!("no opponent for {} yet; queued", ticket.user_id);
                tickets.push(ticket);
                None
            }
        }
    }

    /// Drop the user's ticket if present. Safe to call repeatedly.
    pub fn cancel(&self, user_id: Uuid) {
        self.lock().retain(|queued| queued.user_id != user_id);
    }

    pub fn waiting(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Ticket>> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
