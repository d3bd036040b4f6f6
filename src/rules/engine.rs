//! Duel predicate and pair scan.
//!
//! Both functions are pure: they read top cards and the active rule and
//! never mutate anything, so callers may run them as often as they like.

use crate::cards::{CategoryCard, RuleCard};
use crate::core::Seat;

/// Decide whether two top cards must duel under the active rule.
///
/// Same role always duels. An active rule additionally forces its exact
/// unordered role pair to duel. A missing top card never duels.
#[must_use]
pub fn should_duel(
    top_a: Option<&CategoryCard>,
    top_b: Option<&CategoryCard>,
    active_rule: Option<&RuleCard>,
) -> bool {
    let (Some(a), Some(b)) = (top_a, top_b) else {
        return false;
    };
    if a.role == b.role {
        return true;
    }
    active_rule.is_some_and(|rule| rule.forces(a.role, b.role))
}

/// Scan seat pairs `(i, j)`, `i < j`, in seat order and return the first pair
/// that must duel.
///
/// `tops` holds each seat's top card, indexed by seat.
#[must_use]
pub fn find_any_duel_pair(
    tops: &[Option<&CategoryCard>],
    active_rule: Option<&RuleCard>,
) -> Option<(Seat, Seat)> {
    for i in 0..tops.len() {
        for j in (i + 1)..tops.len() {
            if should_duel(tops[i], tops[j], active_rule) {
                return Some((Seat::new(i as u8), Seat::new(j as u8)));
            }
        }
    }
    None
}
