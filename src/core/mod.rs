//! Core engine types: seats, identities, RNG, configuration, clock, errors.
//!
//! These are shared by every other module and carry no game rules.

pub mod clock;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, LobbyConfig};
pub use error::{EngineError, Result};
pub use player::{ParticipantId, Roster, Seat, SeatMap, SeatedPlayer};
pub use rng::GameRng;
