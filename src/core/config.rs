//! Engine and lobby configuration.
//!
//! Both structs have working defaults, `with_*` builders, and can be read
//! from TOML. Missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Round rules: deck sizing, countdown windows, settlement unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Category cards per seated player.
    pub cards_per_player: usize,

    /// Upper bound on rule cards. The actual count is `clamp(n - 1, 1, max)`.
    pub max_rule_cards: usize,

    /// Attempts at drawing a fresh role pair before accepting fewer rule cards.
    pub rule_pair_attempts: usize,

    /// Duel countdown shown to players. Expiry never resolves a duel.
    pub duel_window_ms: u64,

    /// How long a steal stays possible after each draw.
    pub steal_window_ms: u64,

    /// Coins per captured card above or below the table mean.
    pub settlement_unit: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cards_per_player: 24,
            max_rule_cards: 3,
            rule_pair_attempts: 100,
            duel_window_ms: 5_000,
            steal_window_ms: 3_000,
            settlement_unit: 100,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cards_per_player(mut self, count: usize) -> Self {
        self.cards_per_player = count;
        self
    }

    #[must_use]
    pub fn with_max_rule_cards(mut self, count: usize) -> Self {
        self.max_rule_cards = count;
        self
    }

    /// Bound on role-pair draws. Running out builds fewer rule cards.
    #[must_use]
    pub fn with_rule_pair_attempts(mut self, attempts: usize) -> Self {
        self.rule_pair_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_duel_window_ms(mut self, ms: u64) -> Self {
        self.duel_window_ms = ms;
        self
    }

    #[must_use]
    pub fn with_steal_window_ms(mut self, ms: u64) -> Self {
        self.steal_window_ms = ms;
        self
    }

    #[must_use]
    pub fn with_settlement_unit(mut self, unit: i64) -> Self {
        self.settlement_unit = unit;
        self
    }

    /// Number of rule cards requested for `seat_count` players.
    #[must_use]
    pub fn rule_card_count(&self, seat_count: usize) -> usize {
        seat_count
            .saturating_sub(1)
            .clamp(1, self.max_rule_cards.max(1))
    }

    pub fn validate(&self) -> Result<()> {
        if self.cards_per_player == 0 {
            return Err(EngineError::config("cards_per_player must be positive"));
        }
        if self.settlement_unit <= 0 {
            return Err(EngineError::config("settlement_unit must be positive"));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| EngineError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Room limits and wallet opening balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    pub max_players: usize,
    pub starting_coins: i64,
    /// Idle lifetime of a room not flagged `is_long`.
    pub room_timeout_secs: u64,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            max_players: 8,
            starting_coins: 20_000,
            room_timeout_secs: 300,
        }
    }
}

impl LobbyConfig {
    #[must_use]
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    #[must_use]
    pub fn with_room_timeout_secs(mut self, secs: u64) -> Self {
        self.room_timeout_secs = secs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_players < 2 {
            return Err(EngineError::config("max_players must be at least 2"));
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| EngineError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
