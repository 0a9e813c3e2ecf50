use engine::{CompletionReason, GameSession, SessionStatus};
use lobby::{
    settle_match, LobbyError, MatchRecord, Matchmaker, PlayerResult, RoomRegistry, SeasonRating,
    Ticket,
};
use rand::Rng;
use strategies::{Choice, Strategy};
use types::{Difficulty, GameMode, GridSize, PlayerPool};

/// Outcome of one driven session, in the shape the lobby expects a
/// client to report.
#[derive(Clone, Debug)]
pub struct SessionReport {
    pub score: u32,
    pub elapsed_seconds: f64,
    pub accuracy: f64,
    pub correct: u32,
    pub wrong: u32,
    pub reason: CompletionReason,
}

impl SessionReport {
    pub fn player_result(&self) -> PlayerResult {
        PlayerResult {
            score: f64::from(self.score),
            elapsed_seconds: self.elapsed_seconds,
            accuracy: self.accuracy,
        }
    }
}

/// Drive `session` to completion with `strategy`, charging a fixed
/// simulated duration per presented candidate in place of the real
/// per-candidate timer.
pub fn run_session(
    session: &mut GameSession,
    strategy: &mut dyn Strategy,
    seconds_per_turn: f64,
) -> SessionReport {
    let mut elapsed = 0.0;
    loop {
        if let SessionStatus::Completed(reason) = session.status() {
            return SessionReport {
                score: session.score(elapsed),
                elapsed_seconds: elapsed,
                accuracy: session.accuracy(),
                correct: session.correct(),
                wrong: session.wrong(),
                reason,
            };
        }
        elapsed += seconds_per_turn;
        log::debug!("{session}");
        match strategy.choose(session) {
            Choice::Fill(index) => {
                if let Err(err) = session.submit_move(index) {
                    log::warn!("rejected move on cell {index}: {err}");
                    let _ = session.time_out();
                }
            }
            Choice::Skip => {
                if let Err(err) = session.skip() {
                    log::debug!("skip rejected ({err}); timing out instead");
                    let _ = session.time_out();
                }
            }
            Choice::Wait => {
                if let Err(err) = session.time_out() {
                    log::warn!("timeout rejected: {err}");
                }
            }
        }
    }
}

/// The full rated flow: both users enqueue, the matchmaker pairs them,
/// the paired room runs one local session per seat, and both reported
/// results settle the two season rows together. `Ok(None)` means the
/// tickets were not pairable (rating gap or mismatched parameters),
/// the same "still searching" a live caller would time out of.
#[allow(clippy::too_many_arguments)]
pub fn run_rated_match(
    pool: &PlayerPool,
    grid_size: GridSize,
    difficulty: Difficulty,
    host_row: &mut SeasonRating,
    guest_row: &mut SeasonRating,
    host_strategy: &mut dyn Strategy,
    guest_strategy: &mut dyn Strategy,
    seconds_per_turn: f64,
    rng: &mut impl Rng,
) -> Result<Option<MatchRecord>, LobbyError> {
    let matchmaker = Matchmaker::new();
    let rooms = RoomRegistry::new();

    let waiting = matchmaker.enqueue(Ticket::new(
        host_row.user_id,
        host_row.rating,
        pool.source(),
        grid_size,
        difficulty,
    ));
    debug_assert!(waiting.is_none());
    let Some(partner) = matchmaker.enqueue(Ticket::new(
        guest_row.user_id,
        guest_row.rating,
        pool.source(),
        grid_size,
        difficulty,
    )) else {
        log::info!(
            "no pairing for {} vs {} ({:.0} vs {:.0})",
            host_row.user_id,
            guest_row.user_id,
            host_row.rating,
            guest_row.rating
        );
        matchmaker.cancel(host_row.user_id);
        return Ok(None);
    };

    let session = GameSession::with_rng(pool, grid_size, difficulty, rng)?;
    let code = rooms.open_matched(
        partner.user_id,
        guest_row.user_id,
        GameMode::Rated,
        session,
        rng,
    );

    let mut host_session = rooms.session(&code)?;
    let mut guest_session = rooms.session(&code)?;
    let host_report = run_session(&mut host_session, host_strategy, seconds_per_turn);
    let guest_report = run_session(&mut guest_session, guest_strategy, seconds_per_turn);

    rooms.submit_result(&code, host_row.user_id, host_report.player_result())?;
    let Some(reports) = rooms.submit_result(&code, guest_row.user_id, guest_report.player_result())?
    else {
        log::warn!("rated room {code} produced no paired results");
        return Ok(None);
    };
    debug_assert_eq!(reports.host.0, host_row.user_id);

    let record = settle_match(host_row, guest_row, reports.host.1, reports.guest.1);
    rooms.remove(&code);
    Ok(Some(record))
}
