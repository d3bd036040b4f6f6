//! Wallet collaborator.
//!
//! Applies settlement transfers to coin balances. The wallet checks zero sum
//! again on its own and refuses anything else without touching a balance.

use rustc_hash::FxHashMap;

use crate::core::{EngineError, LobbyConfig, ParticipantId, Result};

pub trait Wallet {
    /// Apply `balance[p] += transfer[p]` for every entry, or nothing at all.
    fn apply(&mut self, transfers: &[(ParticipantId, i64)]) -> Result<()>;

    fn balance(&self, participant: &ParticipantId) -> i64;
}

/// Process-local wallet. Accounts open lazily with the starting balance.
#[derive(Clone, Debug, Default)]
pub struct InMemoryWallet {
    balances: FxHashMap<ParticipantId, i64>,
    starting_coins: i64,
}

impl InMemoryWallet {
    #[must_use]
    pub fn new(config: &LobbyConfig) -> Self {
        Self {
            balances: FxHashMap::default(),
            starting_coins: config.starting_coins,
        }
    }

    /// Open an account if it does not exist yet.
    pub fn open_account(&mut self, participant: &ParticipantId) {
        self.balances
            .entry(participant.clone())
            .or_insert(self.starting_coins);
    }

    #[must_use]
    pub fn has_account(&self, participant: &ParticipantId) -> bool {
        self.balances.contains_key(participant)
    }
}

impl Wallet for InMemoryWallet {
    fn apply(&mut self, transfers: &[(ParticipantId, i64)]) -> Result<()> {
        let sum: i64 = transfers.iter().map(|(_, t)| t).sum();
        if sum != 0 {
            tracing::warn!(sum, "wallet rejected non-zero-sum transfers");
            return Err(EngineError::NonZeroSumSettlement { sum });
        }
        for (participant, amount) in transfers {
            *self
                .balances
                .entry(participant.clone())
                .or_insert(self.starting_coins) += amount;
        }
        tracing::info!(entries = transfers.len(), "transfers applied");
        Ok(())
    }

    fn balance(&self, participant: &ParticipantId) -> i64 {
        self.balances.get(participant).copied().unwrap_or(0)
    }
}
