//! Settlement: turning a finished round into coin transfers.
//!
//! - `Settlement`: zero-sum transfer ledger (score-based or hand-entered)
//! - `Wallet`: the balance store that applies a ledger

pub mod ledger;
pub mod wallet;

pub use ledger::Settlement;
pub use wallet::{InMemoryWallet, Wallet};
