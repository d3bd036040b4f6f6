//! Lobby: rooms, seating, and game start.
//!
//! ## Key Types
//!
//! - `Lobby`: the room service (create, join, leave, seat, start, cleanup)
//! - `Room`: one room's players and its running `Table`, behind one mutex
//! - `RoomStore`: where rooms live; `InMemoryRoomStore` is the default

pub mod room;
pub mod store;

pub use room::{GameKind, LobbyPlayer, Room, RoomId, RoomSummary};
pub use store::{InMemoryRoomStore, RoomStore};

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cards::{Language, TopicCatalog};
use crate::core::{Clock, EngineConfig, EngineError, GameRng, LobbyConfig, ParticipantId, Result};
use crate::table::Table;

/// Random ids are drawn from this range.
const ROOM_ID_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;

/// Random picks before falling back to a sweep of the range.
const RANDOM_ID_ATTEMPTS: usize = 64;

pub struct Lobby<S: RoomStore = InMemoryRoomStore> {
    store: S,
    config: LobbyConfig,
    engine: EngineConfig,
    catalog: TopicCatalog,
    language: Language,
    clock: Arc<dyn Clock>,
    rng: Mutex<GameRng>,
}

impl<S: RoomStore> Lobby<S> {
    pub fn new(
        store: S,
        config: LobbyConfig,
        engine: EngineConfig,
        catalog: TopicCatalog,
        clock: Arc<dyn Clock>,
        rng: GameRng,
    ) -> Result<Self> {
        config.validate()?;
        engine.validate()?;
        Ok(Self {
            store,
            config,
            engine,
            catalog,
            language: Language::default(),
            clock,
            rng: Mutex::new(rng),
        })
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn room(&self, id: &RoomId) -> Result<Arc<Room>> {
        self.store
            .get(id)
            .ok_or_else(|| EngineError::RoomNotFound(id.0.clone()))
    }

    #[must_use]
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.store.list().iter().map(|r| r.summary()).collect()
    }

    /// Create a room owned by `owner`, who joins it immediately.
    ///
    /// A valid four-digit `custom_id` is used as given and must be free.
    /// Anything else falls back to a random free id.
    pub fn create_room(
        &self,
        owner: ParticipantId,
        owner_name: &str,
        custom_id: Option<&str>,
        is_long: bool,
    ) -> Result<Arc<Room>> {
        let room = match custom_id.and_then(RoomId::parse_custom) {
            Some(id) => self
                .store
                .create(Room::new(id, owner, owner_name, self.clock.now_ms(), is_long))?,
            None => self.create_with_random_id(owner, owner_name, is_long)?,
        };
        info!(room = %room.id(), owner = %room.owner(), is_long, "room created");
        Ok(room)
    }

    /// Try a bounded number of random ids, then sweep the whole range in
    /// order. An id taken between the check and the insert is skipped.
    fn create_with_random_id(
        &self,
        owner: ParticipantId,
        owner_name: &str,
        is_long: bool,
    ) -> Result<Arc<Room>> {
        let random: Vec<u32> = {
            let mut rng = self.rng.lock();
            (0..RANDOM_ID_ATTEMPTS)
                .map(|_| rng.gen_range_u32(ROOM_ID_RANGE))
                .collect()
        };
        let now = self.clock.now_ms();
        for n in random.into_iter().chain(ROOM_ID_RANGE) {
            let id = RoomId(n.to_string());
            if self.store.contains(&id) {
                continue;
            }
            match self
                .store
                .create(Room::new(id, owner.clone(), owner_name, now, is_long))
            {
                Err(EngineError::RoomExists(taken)) => {
                    debug!(room = %taken, "room id taken concurrently, retrying");
                }
                result => return result,
            }
        }
        warn!("every room id is in use");
        Err(EngineError::RoomIdsExhausted)
    }

    pub fn join_room(&self, id: &RoomId, participant: ParticipantId, name: &str) -> Result<Arc<Room>> {
        let room = self.room(id)?;
        room.join(participant.clone(), name, self.config.max_players)?;
        info!(room = %id, %participant, "player joined");
        Ok(room)
    }

    /// Remove a player. Returns `true` when the room was torn down, which
    /// happens when the owner leaves or nobody is left.
    pub fn leave_room(&self, id: &RoomId, participant: &ParticipantId) -> Result<bool> {
        let room = self.room(id)?;
        let remaining = room.remove(participant);
        if room.owner() == participant || remaining == 0 {
            self.store.delete(id);
            info!(room = %id, %participant, "room closed");
            return Ok(true);
        }
        info!(room = %id, %participant, "player left");
        Ok(false)
    }

    pub fn toggle_ready(&self, id: &RoomId, participant: &ParticipantId) -> Result<bool> {
        self.room(id)?.toggle_ready(participant)
    }

    pub fn take_seat(&self, id: &RoomId, participant: &ParticipantId, seat: u8) -> Result<()> {
        self.room(id)?.take_seat(participant, seat)
    }

    pub fn select_game(&self, id: &RoomId, game: GameKind) -> Result<()> {
        self.room(id)?.select_game(game);
        Ok(())
    }

    /// Start the selected game with everyone currently seated.
    pub fn start_game(&self, id: &RoomId) -> Result<Arc<Room>> {
        let room = self.room(id)?;
        let seed = self.rng.lock().gen_range_u32(0..=u32::MAX);
        let rng = GameRng::new(u64::from(seed)).for_context(&id.0);
        room.begin(|roster| {
            Table::start(
                roster,
                &self.catalog,
                self.engine.clone(),
                self.language,
                &rng,
                Arc::clone(&self.clock),
            )
        })?;
        Ok(room)
    }

    /// Drop every room older than the timeout unless it is flagged long-lived.
    /// Returns the ids removed.
    pub fn cleanup_expired(&self) -> Vec<RoomId> {
        let now = self.clock.now_ms();
        let timeout_ms = self.config.room_timeout_secs.saturating_mul(1000);
        let expired: Vec<RoomId> = self
            .store
            .list()
            .iter()
            .filter(|r| !r.is_long() && now.saturating_sub(r.created_at_ms()) > timeout_ms)
            .map(|r| r.id().clone())
            .collect();
        for id in &expired {
            self.store.delete(id);
            info!(room = %id, "room expired");
        }
        expired
    }
}
