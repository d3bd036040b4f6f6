//! Zero-sum settlement ledgers.
//!
//! Word Transit settles on captured-card counts: each player receives
//! `round((score - mean) * unit)`, rounded half to even, and whatever
//! rounding leaves over is booked to the first seat. The placeholder games
//! submit their transfers by hand and are only checked for zero sum.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, ParticipantId, Result};

/// Signed coin transfers that sum to zero, in seat order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    transfers: Vec<(ParticipantId, i64)>,
}

impl Settlement {
    /// Transfers from scores listed in seat order.
    ///
    /// ```
    /// use word_transit::core::ParticipantId;
    /// use word_transit::settlement::Settlement;
    ///
    /// let scores = [(ParticipantId::new("a"), 3), (ParticipantId::new("b"), 1)];
    /// let settlement = Settlement::from_scores(&scores, 100).unwrap();
    /// assert_eq!(settlement.get(&"a".into()), Some(100));
    /// assert_eq!(settlement.get(&"b".into()), Some(-100));
    /// ```
    pub fn from_scores(scores: &[(ParticipantId, usize)], unit: i64) -> Result<Self> {
        if unit <= 0 {
            return Err(EngineError::config("settlement unit must be positive"));
        }
        if scores.is_empty() {
            return Ok(Self {
                transfers: Vec::new(),
            });
        }
        let overflow = || EngineError::config("settlement unit too large for these scores");
        let n = i64::try_from(scores.len()).map_err(|_| overflow())?;
        let total = scores
            .iter()
            .try_fold(0i64, |acc, (_, s)| {
                i64::try_from(*s).ok().and_then(|s| acc.checked_add(s))
            })
            .ok_or_else(overflow)?;

        let mut transfers = scores
            .iter()
            .map(|(p, s)| {
                // (score - total / n) * unit, kept exact as a fraction over n.
                let numerator = i64::try_from(*s)
                    .ok()
                    .and_then(|s| s.checked_mul(n))
                    .and_then(|v| v.checked_sub(total))
                    .and_then(|v| v.checked_mul(unit))
                    .ok_or_else(overflow)?;
                Ok((p.clone(), div_round_half_even(numerator, n)))
            })
            .collect::<Result<Vec<(ParticipantId, i64)>>>()?;

        let residual = transfers
            .iter()
            .try_fold(0i64, |acc, (_, t)| acc.checked_sub(*t))
            .ok_or_else(overflow)?;
        if residual != 0 {
            tracing::debug!(residual, "rounding residual booked to first seat");
            transfers[0].1 = transfers[0].1.checked_add(residual).ok_or_else(overflow)?;
        }
        Ok(Self { transfers })
    }

    /// Hand-entered transfers. Rejected unless they sum to zero.
    pub fn manual(transfers: Vec<(ParticipantId, i64)>) -> Result<Self> {
        let sum: i64 = transfers.iter().map(|(_, t)| t).sum();
        if sum != 0 {
            return Err(EngineError::NonZeroSumSettlement { sum });
        }
        Ok(Self { transfers })
    }

    /// One winner takes `amount` from one loser.
    pub fn head_to_head(winner: ParticipantId, loser: ParticipantId, amount: i64) -> Result<Self> {
        if winner == loser {
            return Err(EngineError::InvalidParticipant(loser));
        }
        Self::manual(vec![(winner, amount), (loser, -amount)])
    }

    #[must_use]
    pub fn transfers(&self) -> &[(ParticipantId, i64)] {
        &self.transfers
    }

    #[must_use]
    pub fn get(&self, participant: &ParticipantId) -> Option<i64> {
        self.transfers
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, t)| *t)
    }

    #[must_use]
    pub fn sum(&self) -> i64 {
        self.transfers.iter().map(|(_, t)| t).sum()
    }
}

/// `num / den` rounded half to even. `den` must be positive.
fn div_round_half_even(num: i64, den: i64) -> i64 {
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    match (2 * r).cmp(&den) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => {
            if q.rem_euclid(2) == 0 {
                q
            } else {
                q + 1
            }
        }
    }
}
