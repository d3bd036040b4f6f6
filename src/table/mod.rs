//! Table state, duels, and the steal window.
//!
//! ## Key Types
//!
//! - `Table`: one round's state and its actions (`draw`, `settle_by_loser`,
//!   `tie_flip_each_once`, `steal`, `cancel_interrupt_window`,
//!   `compute_settlement`)
//! - `DuelContext`: the single open duel and its reward buffer
//! - `InterruptWindow`: the steal window opened by each draw
//! - `PublicTable`: what the shared view shows

pub mod duel;
pub mod interrupt;
pub mod state;

pub use duel::{DuelContext, DuelOutcome, Flip, TieFlip};
pub use interrupt::{CancelReport, InterruptWindow, StealRecord, WindowState};
pub use state::{DrawOutcome, DrawResult, PublicCard, PublicDuel, PublicSeat, PublicTable, Table};
