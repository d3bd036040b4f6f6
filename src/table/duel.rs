//! Duel context.
//!
//! A duel is either absent or open. An open duel holds the two seats and
//! the reward buffer: the top cards at the moment the duel opened plus every
//! card flipped during tie escalation. Its deadline only drives the
//! countdown shown to players; nothing happens when it passes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardId, CategoryCard, RuleCard};
use crate::core::{ParticipantId, Seat};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelContext {
    a: Seat,
    b: Seat,
    reward: SmallVec<[CategoryCard; 4]>,
    /// Pot cards stolen off a pile while the duel was open. They stay in the
    /// pot but are never captured.
    #[serde(default)]
    forfeited: SmallVec<[CardId; 2]>,
    deadline_ms: u64,
}

impl DuelContext {
    pub(crate) fn open(
        a: Seat,
        b: Seat,
        seed: impl IntoIterator<Item = CategoryCard>,
        deadline_ms: u64,
    ) -> Self {
        Self {
            a,
            b,
            reward: seed.into_iter().collect(),
            forfeited: SmallVec::new(),
            deadline_ms,
        }
    }

    #[must_use]
    pub fn participants(&self) -> (Seat, Seat) {
        (self.a, self.b)
    }

    #[must_use]
    pub fn involves(&self, seat: Seat) -> bool {
        seat == self.a || seat == self.b
    }

    /// The other participant, or `None` if `seat` is not in this duel.
    #[must_use]
    pub fn opponent_of(&self, seat: Seat) -> Option<Seat> {
        if seat == self.a {
            Some(self.b)
        } else if seat == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    #[must_use]
    pub fn reward(&self) -> &[CategoryCard] {
        &self.reward
    }

    #[must_use]
    pub fn holds(&self, card: CardId) -> bool {
        self.reward.iter().any(|c| c.id == card)
    }

    pub(crate) fn push_reward(&mut self, card: CategoryCard) {
        self.reward.push(card);
    }

    pub(crate) fn reset_deadline(&mut self, deadline_ms: u64) {
        self.deadline_ms = deadline_ms;
    }

    /// Mark a pot card as stolen. Returns `false` if the pot does not hold it.
    pub(crate) fn forfeit(&mut self, card: CardId) -> bool {
        if !self.holds(card) || self.forfeited.contains(&card) {
            return false;
        }
        self.forfeited.push(card);
        true
    }

    #[must_use]
    pub fn forfeited(&self) -> &[CardId] {
        &self.forfeited
    }

    /// The capturable pot: every reward card not stolen.
    pub(crate) fn into_reward(self) -> Vec<CategoryCard> {
        let forfeited = self.forfeited;
        self.reward
            .into_iter()
            .filter(|c| !forfeited.contains(&c.id))
            .collect()
    }

    #[must_use]
    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    #[must_use]
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.deadline_ms.saturating_sub(now_ms)
    }

    /// Countdown has run out; the duel still needs a loser declared.
    #[must_use]
    pub fn is_stale(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms
    }
}

/// Result of declaring a loser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub winner: ParticipantId,
    pub loser: ParticipantId,
    /// Cards added to the winner's captured set, in order.
    pub captured: Vec<CategoryCard>,
    /// Older pile cards cleared off both piles without being captured.
    pub discarded: usize,
}

/// One participant's flip during tie escalation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flip {
    pub participant: ParticipantId,
    /// `None` when the pile ran out before a category card turned up.
    pub card: Option<CategoryCard>,
}

/// Result of a tie escalation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieFlip {
    pub flips: Vec<Flip>,
    /// Rule cards turned up along the way, in draw order. The last one is active.
    pub rules_drawn: Vec<RuleCard>,
    /// Whether the new top cards still call for a duel. Informational only.
    pub still_matching: bool,
    pub reward_size: usize,
}
