//! Rooms.
//!
//! A room collects players, their ready flags and seats, and, once a game
//! starts, the running `Table`. All mutable room data sits behind one mutex,
//! which is the per-room critical section every table action runs inside.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, ParticipantId, Result, Roster, SeatedPlayer};
use crate::settlement::{Settlement, Wallet};
use crate::table::Table;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// A custom id must be exactly four ASCII digits.
    #[must_use]
    pub fn parse_custom(id: &str) -> Option<Self> {
        (id.len() == 4 && id.bytes().all(|b| b.is_ascii_digit())).then(|| Self(id.to_string()))
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    #[default]
    WordTransit,
    Poker,
    TenAndAHalf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayer {
    pub participant: ParticipantId,
    pub name: String,
    pub ready: bool,
    pub seat: Option<u8>,
}

pub(crate) struct RoomInner {
    pub(crate) players: Vec<LobbyPlayer>,
    pub(crate) game: GameKind,
    pub(crate) in_game: bool,
    pub(crate) table: Option<Table>,
}

pub struct Room {
    id: RoomId,
    owner: ParticipantId,
    created_at_ms: u64,
    is_long: bool,
    inner: Mutex<RoomInner>,
}

/// Serializable room summary for listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub owner: ParticipantId,
    pub players: Vec<LobbyPlayer>,
    pub game: GameKind,
    pub in_game: bool,
    pub is_long: bool,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        owner: ParticipantId,
        owner_name: impl Into<String>,
        created_at_ms: u64,
        is_long: bool,
    ) -> Self {
        let first = LobbyPlayer {
            participant: owner.clone(),
            name: owner_name.into(),
            ready: false,
            seat: None,
        };
        Self {
            id,
            owner,
            created_at_ms,
            is_long,
            inner: Mutex::new(RoomInner {
                players: vec![first],
                game: GameKind::default(),
                in_game: false,
                table: None,
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    #[must_use]
    pub fn owner(&self) -> &ParticipantId {
        &self.owner
    }

    #[must_use]
    pub fn is_long(&self) -> bool {
        self.is_long
    }

    #[must_use]
    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    #[must_use]
    pub fn summary(&self) -> RoomSummary {
        let inner = self.inner.lock();
        RoomSummary {
            id: self.id.clone(),
            owner: self.owner.clone(),
            players: inner.players.clone(),
            game: inner.game,
            in_game: inner.in_game,
            is_long: self.is_long,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.inner.lock().players.len()
    }

    #[must_use]
    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.inner
            .lock()
            .players
            .iter()
            .any(|p| &p.participant == participant)
    }

    /// Add a player. Joining twice is a no-op.
    pub(crate) fn join(
        &self,
        participant: ParticipantId,
        name: impl Into<String>,
        max_players: usize,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.players.iter().any(|p| p.participant == participant) {
            return Ok(());
        }
        if inner.players.len() >= max_players {
            return Err(EngineError::RoomFull(self.id.0.clone()));
        }
        inner.players.push(LobbyPlayer {
            participant,
            name: name.into(),
            ready: false,
            seat: None,
        });
        Ok(())
    }

    /// Remove a player. Returns how many remain.
    pub(crate) fn remove(&self, participant: &ParticipantId) -> usize {
        let mut inner = self.inner.lock();
        inner.players.retain(|p| &p.participant != participant);
        inner.players.len()
    }

    /// Flip a player's ready flag and return the new value.
    pub fn toggle_ready(&self, participant: &ParticipantId) -> Result<bool> {
        let mut inner = self.inner.lock();
        let player = inner
            .players
            .iter_mut()
            .find(|p| &p.participant == participant)
            .ok_or_else(|| EngineError::InvalidParticipant(participant.clone()))?;
        player.ready = !player.ready;
        Ok(player.ready)
    }

    /// Sit a player at `seat`. Moving to another free seat is allowed.
    pub fn take_seat(&self, participant: &ParticipantId, seat: u8) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner
            .players
            .iter()
            .any(|p| p.seat == Some(seat) && &p.participant != participant)
        {
            return Err(EngineError::SeatTaken(seat));
        }
        let player = inner
            .players
            .iter_mut()
            .find(|p| &p.participant == participant)
            .ok_or_else(|| EngineError::InvalidParticipant(participant.clone()))?;
        player.seat = Some(seat);
        Ok(())
    }

    pub fn select_game(&self, game: GameKind) {
        self.inner.lock().game = game;
    }

    #[must_use]
    pub fn selected_game(&self) -> GameKind {
        self.inner.lock().game
    }

    #[must_use]
    pub fn in_game(&self) -> bool {
        self.inner.lock().in_game
    }

    /// Seated players ordered by seat number.
    pub fn roster(&self) -> Result<Roster> {
        let inner = self.inner.lock();
        Self::roster_of(&inner.players)
    }

    fn roster_of(players: &[LobbyPlayer]) -> Result<Roster> {
        let mut seated: Vec<&LobbyPlayer> = players.iter().filter(|p| p.seat.is_some()).collect();
        seated.sort_by_key(|p| p.seat);
        Roster::new(
            seated
                .into_iter()
                .map(|p| SeatedPlayer::new(p.participant.clone(), p.name.clone()))
                .collect(),
        )
    }

    /// Mark the room as playing, building the table with `start` for
    /// Word Transit. The placeholder games run without a table.
    /// A running game must be finished or settled first.
    pub(crate) fn begin(&self, start: impl FnOnce(Roster) -> Result<Table>) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.in_game {
            return Err(EngineError::GameInProgress(self.id.0.clone()));
        }
        let roster = Self::roster_of(&inner.players)?;
        inner.table = match inner.game {
            GameKind::WordTransit => Some(start(roster)?),
            GameKind::Poker | GameKind::TenAndAHalf => None,
        };
        inner.in_game = true;
        tracing::info!(room = %self.id, game = ?inner.game, "game started");
        Ok(())
    }

    /// Run one table action inside the room's critical section.
    pub fn with_table<T>(&self, action: impl FnOnce(&mut Table) -> Result<T>) -> Result<T> {
        let mut inner = self.inner.lock();
        let table = inner.table.as_mut().ok_or(EngineError::GameNotStarted)?;
        action(table)
    }

    /// Settle the running Word Transit round into `wallet` and end the game.
    pub fn finish(&self, wallet: &mut dyn Wallet) -> Result<Settlement> {
        let mut inner = self.inner.lock();
        let table = inner.table.as_ref().ok_or(EngineError::GameNotStarted)?;
        let settlement = table.compute_settlement()?;
        wallet.apply(settlement.transfers())?;
        inner.table = None;
        inner.in_game = false;
        tracing::info!(room = %self.id, "round finished and settled");
        Ok(settlement)
    }

    /// Apply a hand-entered result (poker, ten-and-a-half) and end the game.
    pub fn submit_manual(&self, settlement: &Settlement, wallet: &mut dyn Wallet) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.in_game {
            return Err(EngineError::GameNotStarted);
        }
        for (participant, _) in settlement.transfers() {
            if !inner.players.iter().any(|p| &p.participant == participant) {
                return Err(EngineError::InvalidParticipant(participant.clone()));
            }
        }
        wallet.apply(settlement.transfers())?;
        inner.table = None;
        inner.in_game = false;
        Ok(())
    }
}
