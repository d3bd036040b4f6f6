//! Engine error kinds.
//!
//! Every rejected action is reported with a reason and leaves the room state
//! untouched. `EmptyCatalog` is the only configuration-time failure: it stops
//! a round from ever being created.

use super::player::ParticipantId;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("it is not {0}'s turn")]
    NotYourTurn(ParticipantId),
    #[error("a duel is already open")]
    DuelAlreadyOpen,
    #[error("no duel is open")]
    NoDuelOpen,
    #[error("the draw pile is exhausted")]
    DeckExhausted,
    #[error("{0} is not a valid participant for this action")]
    InvalidParticipant(ParticipantId),
    #[error("the interrupt window is closed")]
    InterruptWindowClosed,
    #[error("{0} has no card to take")]
    EmptyPile(ParticipantId),
    #[error("settlement does not sum to zero (sum = {sum})")]
    NonZeroSumSettlement { sum: i64 },
    #[error("topic catalog is empty")]
    EmptyCatalog,
    #[error("at least 2 seated players are required, found {seated}")]
    NotEnoughPlayers { seated: usize },
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("room {0} already exists")]
    RoomExists(String),
    #[error("no free room id is left")]
    RoomIdsExhausted,
    #[error("room {0} is full")]
    RoomFull(String),
    #[error("seat {0} is already taken")]
    SeatTaken(u8),
    #[error("no game is running in this room")]
    GameNotStarted,
    #[error("room {0} is already playing a game")]
    GameInProgress(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
