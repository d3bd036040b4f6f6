//! Interrupt (steal) window.
//!
//! Every draw opens a fresh window that replaces the previous one. While it
//! is open, anyone may take another player's top card for one side point.
//! The first successful steal closes it; so does an explicit cancel or the
//! deadline passing.

use serde::{Deserialize, Serialize};

use crate::cards::CategoryCard;
use crate::core::{ParticipantId, Seat};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowState {
    Open,
    Stolen { target: Seat, stealer: Seat },
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptWindow {
    /// Seat whose draw opened the window.
    pub drawer: Seat,
    pub deadline_ms: u64,
    pub state: WindowState,
}

impl InterruptWindow {
    pub(crate) fn open(drawer: Seat, deadline_ms: u64) -> Self {
        Self {
            drawer,
            deadline_ms,
            state: WindowState::Open,
        }
    }

    #[must_use]
    pub fn is_open(&self, now_ms: u64) -> bool {
        self.state == WindowState::Open && now_ms < self.deadline_ms
    }

    #[must_use]
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        if self.is_open(now_ms) {
            self.deadline_ms - now_ms
        } else {
            0
        }
    }

    pub(crate) fn record_steal(&mut self, target: Seat, stealer: Seat) {
        self.state = WindowState::Stolen { target, stealer };
    }

    pub(crate) fn cancel(&mut self) {
        self.state = WindowState::Cancelled;
    }
}

/// A successful steal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealRecord {
    pub target: ParticipantId,
    pub stealer: ParticipantId,
    /// The removed top card. It is discarded, not captured.
    pub card: CategoryCard,
    pub stealer_points: u32,
}

/// Result of closing a window early.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReport {
    /// A pairing that should be duelling right now. The cancel still happened.
    pub missed_duel: Option<(ParticipantId, ParticipantId)>,
}
