use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use engine::GameSession;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use types::{DataSource, Difficulty, GameMode, GridSize, PlayerPool};
use uuid::Uuid;

use crate::{error::LobbyError, rating::PlayerResult};

const CODE_DIGITS: usize = 6;

/// Opaque 6-digit room key, shared out of band between friends.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomCode(String);

impl RoomCode {
    fn random(rng: &mut impl Rng) -> Self {
        let digits = (0..CODE_DIGITS)
            .map(|_| char::from(b'0' + rng.gen_range(0..10)))
            .collect();
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for RoomCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Waiting,
    Active,
    Finished,
}

/// A two-seat game room. The session stored here is the canonical
/// board; each seat plays its own local copy and reports a
/// `PlayerResult` back when done.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub code: RoomCode,
    pub host_id: Uuid,
    pub guest_id: Option<Uuid>,
    pub mode: GameMode,
    pub source: DataSource,
    pub status: RoomStatus,
    pub session: Option<GameSession>,
    pub results: HashMap<Uuid, PlayerResult>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn has_seat(&self, user_id: Uuid) -> bool {
        self.host_id == user_id || self.guest_id == Some(user_id)
    }
}

/// Both seats' reports, paired for rating settlement.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchReports {
    pub host: (Uuid, PlayerResult),
    pub guest: (Uuid, PlayerResult),
}

/// The shared room table. Like the matchmaking queue, every operation
/// runs under one mutex so seat assignment and result collection stay
/// consistent across concurrent handlers.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomCode, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty Waiting room for a host. Code generation retries
    /// until it finds an unused code.
    pub fn create(
        &self,
        host_id: Uuid,
        source: DataSource,
        mode: GameMode,
        rng: &mut impl Rng,
    ) -> RoomCode {
        let mut rooms = self.lock();
        let code = loop {
            let code = RoomCode::random(rng);
            if !rooms.contains_key(&code) {
                break code;
            }
        };
        log::info!("room {code} opened by {host_id} ({mode})");
        rooms.insert(
            code.clone(),
            Room {
                code: code.clone(),
                host_id,
                guest_id: None,
                mode,
                source,
                status: RoomStatus::Waiting,
                session: None,
                results: HashMap::new(),
                created_at: Utc::now(),
            },
        );
        code
    }

    /// Matchmaking shortcut: both seats already bound and the game
    /// generated, so the room starts out Active.
    pub fn open_matched(
        &self,
        host_id: Uuid,
        guest_id: Uuid,
        mode: GameMode,
        session: GameSession,
        rng: &mut impl Rng,
    ) -> RoomCode {
        let mut rooms = self.lock();
        let code = loop {
            let code = RoomCode::random(rng);
            if !rooms.contains_key(&code) {
                break code;
            }
        };
        log::info!("room {code} opened for paired match {host_id} vs {guest_id}");
        rooms.insert(
            code.clone(),
            Room {
                code: code.clone(),
                host_id,
                guest_id: Some(guest_id),
                mode,
                source: session.source(),
                status: RoomStatus::Active,
                session: Some(session),
                results: HashMap::new(),
                created_at: Utc::now(),
            },
        );
        code
    }

    /// Take the guest seat. Re-joining by either seated player is a
    /// no-op; a third player is turned away.
    pub fn join(&self, code: &RoomCode, user_id: Uuid) -> Result<Room, LobbyError> {
        let mut rooms = self.lock();
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.clone()))?;
        if room.has_seat(user_id) {
            return Ok(room.clone());
        }
        if room.guest_id.is_some() {
            return Err(LobbyError::RoomFull(code.clone()));
        }
        room.guest_id = Some(user_id);
        log::info!("{user_id} joined room {code}");
        Ok(room.clone())
    }

    /// Host-only: generate the shared board and activate the room.
    /// Returns the caller's local copy of the session.
    pub fn start(
        &self,
        code: &RoomCode,
        requester: Uuid,
        size: GridSize,
        difficulty: Difficulty,
        pool: &PlayerPool,
        rng: &mut impl Rng,
    ) -> Result<GameSession, LobbyError> {
        let mut rooms = self.lock();
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.clone()))?;
        if room.host_id != requester {
            return Err(LobbyError::NotHost(code.clone()));
        }
        let session = GameSession::with_rng(pool, size, difficulty, rng)?;
        room.session = Some(session.clone());
        room.status = RoomStatus::Active;
        log::info!("room {code} started on a {size} {difficulty} board");
        Ok(session)
    }

    /// A joiner's local copy of the shared board.
    pub fn session(&self, code: &RoomCode) -> Result<GameSession, LobbyError> {
        let rooms = self.lock();
        let room = rooms
            .get(code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.clone()))?;
        room.session
            .clone()
            .ok_or_else(|| LobbyError::RoomNotStarted(code.clone()))
    }

    /// Record one seat's end-of-game report. Once both seats have
    /// reported, the room is Finished; rated rooms hand the paired
    /// results back for settlement, anything else finishes unscored.
    pub fn submit_result(
        &self,
        code: &RoomCode,
        user_id: Uuid,
        result: PlayerResult,
    ) -> Result<Option<MatchReports>, LobbyError> {
        let mut rooms = self.lock();
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.clone()))?;
        if !room.has_seat(user_id) {
            return Err(LobbyError::NotInRoom(code.clone()));
        }
        room.results.insert(user_id, result);

        let Some(guest_id) = room.guest_id else {
            return Ok(None);
        };
        if room.status == RoomStatus::Finished {
            return Ok(None);
        }
        let both_in =
            room.results.contains_key(&room.host_id) && room.results.contains_key(&guest_id);
        if !both_in {
            return Ok(None);
        }
        room.status = RoomStatus::Finished;
        log::info!("room {code} finished");
        if room.mode != GameMode::Rated {
            return Ok(None);
        }
        Ok(Some(MatchReports {
            host: (room.host_id, room.results[&room.host_id].clone()),
            guest: (guest_id, room.results[&guest_id].clone()),
        }))
    }

    /// Snapshot of a room for the caller to render or persist.
    pub fn get(&self, code: &RoomCode) -> Option<Room> {
        self.lock().get(code).cloned()
    }

    /// Drop a finished or abandoned room.
    pub fn remove(&self, code: &RoomCode) -> Option<Room> {
        self.lock().remove(code)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RoomCode, Room>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use types::PlayerRecord;

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

    fn result(score: f64) -> PlayerResult {
        PlayerResult {
            score,
            elapsed_seconds: 60.0,
            accuracy: 75.0,
        }
    }

    #[test]
    fn codes_are_six_digits() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let code = RoomCode::random(&mut rng);
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn unknown_room_is_not_found() {
        let registry = RoomRegistry::new();
        let missing = RoomCode::from("000000");
        assert_eq!(
            registry.join(&missing, Uuid::new_v4()).err(),
            Some(LobbyError::RoomNotFound(missing))
        );
    }

    #[test]
    fn first_joiner_takes_the_guest_seat_and_a_third_is_turned_away() {
        let registry = RoomRegistry::new();
        let mut rng = StdRng::seed_from_u64(2);
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let code = registry.create(host, DataSource::Overall, GameMode::Friends, &mut rng);

        let room = registry.join(&code, guest).expect("guest seat is open");
        assert_eq!(room.guest_id, Some(guest));

        assert_eq!(
            registry.join(&code, Uuid::new_v4()).err(),
            Some(LobbyError::RoomFull(code.clone()))
        );

        // Re-joins by seated players are no-ops.
        assert!(registry.join(&code, host).is_ok());
        assert!(registry.join(&code, guest).is_ok());
        assert_eq!(registry.get(&code).map(|room| room.guest_id), Some(Some(guest)));
    }

    #[test]
    fn only_the_host_starts_the_game() {
        let registry = RoomRegistry::new();
        let mut rng = StdRng::seed_from_u64(3);
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let code = registry.create(host, DataSource::Overall, GameMode::Friends, &mut rng);
        registry.join(&code, guest).expect("guest seat is open");

        assert_eq!(
            registry
                .start(&code, guest, GridSize::Three, Difficulty::Easy, &pool(), &mut rng)
                .err(),
            Some(LobbyError::NotHost(code.clone()))
        );
        assert_eq!(
            registry.session(&code).err(),
            Some(LobbyError::RoomNotStarted(code.clone()))
        );

        let session = registry
            .start(&code, host, GridSize::Three, Difficulty::Easy, &pool(), &mut rng)
            .expect("host may start");
        assert_eq!(registry.get(&code).map(|room| room.status), Some(RoomStatus::Active));

        // Both seats see the same board.
        let guest_copy = registry.session(&code).expect("room is active");
        assert_eq!(guest_copy.grid(), session.grid());
    }

    #[test]
    fn rated_rooms_hand_back_paired_results() {
        let registry = RoomRegistry::new();
        let mut rng = StdRng::seed_from_u64(4);
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let session = GameSession::with_rng(&pool(), GridSize::Three, Difficulty::Easy, &mut rng)
            .expect("pool is non-empty");
        let code = registry.open_matched(host, guest, GameMode::Rated, session, &mut rng);

        assert_eq!(
            registry.submit_result(&code, host, result(700.0)),
            Ok(None)
        );
        let reports = registry
            .submit_result(&code, guest, result(500.0))
            .expect("room exists")
            .expect("both results are in");
        assert_eq!(reports.host.0, host);
        assert_eq!(reports.guest.0, guest);
        assert_eq!(registry.get(&code).map(|room| room.status), Some(RoomStatus::Finished));
    }

    #[test]
    fn friends_rooms_finish_unscored() {
        let registry = RoomRegistry::new();
        let mut rng = StdRng::seed_from_u64(5);
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let code = registry.create(host, DataSource::Overall, GameMode::Friends, &mut rng);
        registry.join(&code, guest).expect("guest seat is open");
        registry
            .start(&code, host, GridSize::Three, Difficulty::Easy, &pool(), &mut rng)
            .expect("host may start");

        assert_eq!(registry.submit_result(&code, host, result(700.0)), Ok(None));
        assert_eq!(registry.submit_result(&code, guest, result(500.0)), Ok(None));
        assert_eq!(registry.get(&code).map(|room| room.status), Some(RoomStatus::Finished));
    }

    #[test]
    fn outsiders_may_not_report_results() {
        let registry = RoomRegistry::new();
        let mut rng = StdRng::seed_from_u64(6);
        let code = registry.create(Uuid::new_v4(), DataSource::Overall, GameMode::Friends, &mut rng);
        assert_eq!(
            registry.submit_result(&code, Uuid::new_v4(), result(100.0)),
            Err(LobbyError::NotInRoom(code))
        );
    }
}
