//! # word-transit
//!
//! Rule engine for Word Transit, a card-matching party game, plus the room
//! and coin scaffolding its tables run in.
//!
//! ## Design Principles
//!
//! 1. **One Critical Section per Room**: every table action is a single
//!    validate-then-mutate transition. A rejected action changes nothing.
//!
//! 2. **No Sleeping**: duel and steal countdowns are stored deadlines read
//!    against a `Clock`. Expiry never triggers anything by itself.
//!
//! 3. **Deterministic by Seed**: deck faces, rule pairs, and shuffles come
//!    from `GameRng`, so a seed replays a round exactly.
//!
//! ## Modules
//!
//! - `core`: seats, participants, RNG, clocks, configuration, errors
//! - `cards`: cards, roles, topic catalog, deck building
//! - `rules`: the duel predicate
//! - `table`: round state, duels, interrupt windows, public view
//! - `settlement`: zero-sum ledgers and the wallet
//! - `lobby`: rooms, seating, game start, room store

pub mod core;
pub mod cards;
pub mod rules;
pub mod table;
pub mod settlement;
pub mod lobby;

// Re-export commonly used types
pub use crate::core::{
    Clock, ManualClock, SystemClock,
    EngineConfig, LobbyConfig,
    EngineError, Result,
    GameRng,
    ParticipantId, Roster, Seat, SeatMap, SeatedPlayer,
};

pub use crate::cards::{
    Card, CardId, CategoryCard, DeckBuilder, DrawPile, Language, Role, RoleCatalog, RoleId,
    RuleCard, Topic, TopicCatalog,
};

pub use crate::rules::{find_any_duel_pair, should_duel};

pub use crate::table::{
    CancelReport, DrawOutcome, DrawResult, DuelContext, DuelOutcome, Flip, InterruptWindow,
    PublicTable, StealRecord, Table, TieFlip, WindowState,
};

pub use crate::settlement::{InMemoryWallet, Settlement, Wallet};

pub use crate::lobby::{GameKind, InMemoryRoomStore, Lobby, LobbyPlayer, Room, RoomId, RoomStore};
