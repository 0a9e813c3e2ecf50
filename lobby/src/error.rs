use thiserror::Error;

use crate::room::RoomCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LobbyError {
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    #[error("room {0} already has two players")]
    RoomFull(RoomCode),

    #[error("only the host can start room {0}")]
    NotHost(RoomCode),

    #[error("room {0} has no active game yet")]
    RoomNotStarted(RoomCode),

    #[error("user is not seated in room {0}")]
    NotInRoom(RoomCode),

    #[error(transparent)]
    Engine(#[from] engine::EngineError),
}
