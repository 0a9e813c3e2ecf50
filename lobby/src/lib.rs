pub mod error;
pub mod matchmaker;
pub mod rating;
pub mod room;

pub use error::LobbyError;
pub use matchmaker::{Matchmaker, Ticket, RATING_WINDOW};
pub use rating::{
    expected_score, record_unrated, settle_match, update_rating, viewer_delta, MatchRecord,
    PlayerResult, RatingTier, SeasonRating, DEFAULT_RATING, K_FACTOR,
};
pub use room::{MatchReports, Room, RoomCode, RoomRegistry, RoomStatus};
