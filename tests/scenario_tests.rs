//! Round scenarios.
//!
//! Each test seats a roster over a hand-built pile and drives the table
//! through the public actions only.

use std::sync::Arc;

use word_transit::cards::{Card, CardId, CategoryCard, DrawPile, Language, RoleId, RuleCard};
use word_transit::core::{
    EngineConfig, EngineError, ManualClock, ParticipantId, Roster, Seat, SeatedPlayer,
};
use word_transit::settlement::Settlement;
use word_transit::table::{DrawOutcome, Table};

fn pid(s: &str) -> ParticipantId {
    ParticipantId::new(s)
}

fn cat(id: u32, role: u8) -> Card {
    CategoryCard::new(CardId::new(id), RoleId::new(role), "城市", "City").into()
}

fn rule(id: u32, a: u8, b: u8) -> Card {
    RuleCard::new(CardId::new(id), RoleId::new(a), RoleId::new(b)).into()
}

/// Seat `p0..p{n-1}` over `cards` listed top first.
fn table(n: usize, mut cards: Vec<Card>) -> (Table, Arc<ManualClock>) {
    let roster = Roster::new(
        (0..n)
            .map(|i| SeatedPlayer::new(format!("p{}", i), format!("P{}", i)))
            .collect(),
    )
    .unwrap();
    cards.reverse();
    let clock = Arc::new(ManualClock::new(10_000));
    let table = Table::with_deck(
        roster,
        DrawPile::from_cards(cards),
        EngineConfig::default(),
        Language::Native,
        clock.clone(),
    );
    (table, clock)
}

fn ids(cards: &[CategoryCard]) -> Vec<u32> {
    cards.iter().map(|c| c.id.0).collect()
}

/// Two same-role draws open a duel seeded with both cards.
#[test]
fn test_same_role_opens_duel() {
    let (mut t, _) = table(2, vec![cat(1, 0), cat(2, 0), cat(3, 1)]);

    let first = t.draw(&pid("p0")).unwrap();
    assert_eq!(first.outcome, DrawOutcome::TurnPassed { next: pid("p1") });

    let second = t.draw(&pid("p1")).unwrap();
    assert_eq!(
        second.outcome,
        DrawOutcome::DuelOpened {
            a: pid("p0"),
            b: pid("p1")
        }
    );

    let duel = t.duel().unwrap();
    assert_eq!(ids(duel.reward()), vec![1, 2]);
    assert_eq!(duel.deadline_ms(), 15_000);
}

/// A tie flip walks past rule cards, which take effect, and grows the pot.
#[test]
fn test_tie_flip_applies_rule_cards() {
    let (mut t, _) = table(
        2,
        vec![cat(1, 0), cat(2, 0), rule(3, 1, 2), cat(4, 1), cat(5, 2)],
    );
    t.draw(&pid("p0")).unwrap();
    t.draw(&pid("p1")).unwrap();
    assert_eq!(t.duel().map(|d| d.reward().len()), Some(2));

    let tie = t.tie_flip_each_once().unwrap();
    assert_eq!(tie.rules_drawn.len(), 1);
    assert_eq!(t.active_rule().map(|r| r.id), Some(CardId::new(3)));
    assert_eq!(tie.reward_size, 4);
    assert_eq!(t.pile(Seat::new(0)).len(), 2);
    assert_eq!(t.pile(Seat::new(1)).len(), 2);
    // r1 vs r2 is now forced by the new rule.
    assert!(tie.still_matching);
    assert!(t.duel().is_some());
}

/// The winner takes the pot and both tops; both piles are cleared.
#[test]
fn test_settle_by_loser_clears_both_piles() {
    let (mut t, _) = table(
        3,
        vec![cat(1, 0), cat(2, 3), cat(3, 0), cat(4, 1), cat(5, 2)],
    );
    t.draw(&pid("p0")).unwrap();
    t.draw(&pid("p1")).unwrap();
    let opened = t.draw(&pid("p2")).unwrap();
    assert_eq!(
        opened.outcome,
        DrawOutcome::DuelOpened {
            a: pid("p0"),
            b: pid("p2")
        }
    );
    t.tie_flip_each_once().unwrap();

    let outcome = t.settle_by_loser(&pid("p0")).unwrap();
    assert_eq!(outcome.winner, pid("p2"));
    assert_eq!(ids(&outcome.captured), vec![1, 3, 4, 5]);
    assert_eq!(outcome.discarded, 0);

    assert!(t.duel().is_none());
    assert!(t.pile(Seat::new(0)).is_empty());
    assert!(t.pile(Seat::new(2)).is_empty());
    assert_eq!(t.pile(Seat::new(1)).len(), 1);
    assert_eq!(t.captured(Seat::new(2)).len(), 4);
    // Turn goes to the seat after the winner.
    assert_eq!(t.turn_holder(), &pid("p0"));
}

#[test]
fn test_settle_rejects_outsiders() {
    let (mut t, _) = table(3, vec![cat(1, 0), cat(2, 0), cat(3, 1)]);
    assert_eq!(t.settle_by_loser(&pid("p0")), Err(EngineError::NoDuelOpen));

    t.draw(&pid("p0")).unwrap();
    t.draw(&pid("p1")).unwrap();
    assert_eq!(
        t.settle_by_loser(&pid("p2")),
        Err(EngineError::InvalidParticipant(pid("p2")))
    );
    assert!(t.duel().is_some());
}

/// Captured counts 3 and 1 at 100 a card settle to +100 / -100.
#[test]
fn test_settlement_from_captured_counts() {
    let s = Settlement::from_scores(&[(pid("a"), 3), (pid("b"), 1)], 100).unwrap();
    assert_eq!(s.transfers(), &[(pid("a"), 100), (pid("b"), -100)]);
}

#[test]
fn test_round_settlement_after_duel() {
    let (mut t, _) = table(2, vec![cat(1, 0), cat(2, 0)]);
    t.draw(&pid("p0")).unwrap();
    t.draw(&pid("p1")).unwrap();
    assert_eq!(t.compute_settlement().err(), Some(EngineError::DuelAlreadyOpen));

    t.settle_by_loser(&pid("p1")).unwrap();
    let s = t.compute_settlement().unwrap();
    assert_eq!(s.get(&pid("p0")), Some(100));
    assert_eq!(s.get(&pid("p1")), Some(-100));
}

/// Stealing after the window deadline is rejected and changes nothing.
#[test]
fn test_late_steal_rejected() {
    let (mut t, clock) = table(2, vec![cat(1, 0), cat(2, 1), cat(3, 2)]);
    t.draw(&pid("p0")).unwrap();
    t.draw(&pid("p1")).unwrap();

    clock.advance(3_000);
    assert_eq!(
        t.steal(&pid("p0"), &pid("p1")),
        Err(EngineError::InterruptWindowClosed)
    );
    assert_eq!(t.pile(Seat::new(0)).len(), 1);
    assert_eq!(t.steal_points(Seat::new(1)), 0);
}

#[test]
fn test_steal_inside_window() {
    let (mut t, clock) = table(2, vec![cat(1, 0), cat(2, 1), cat(3, 2)]);
    t.draw(&pid("p0")).unwrap();
    t.draw(&pid("p1")).unwrap();

    clock.advance(2_999);
    let record = t.steal(&pid("p0"), &pid("p1")).unwrap();
    assert_eq!(record.card.id, CardId::new(1));
    assert_eq!(record.stealer_points, 1);
    assert!(t.pile(Seat::new(0)).is_empty());

    // One steal per window.
    assert_eq!(
        t.steal(&pid("p1"), &pid("p0")),
        Err(EngineError::InterruptWindowClosed)
    );
}

#[test]
fn test_cancel_reports_missed_duel() {
    let (mut t, _) = table(2, vec![cat(1, 0), cat(2, 1)]);
    t.draw(&pid("p0")).unwrap();
    let report = t.cancel_interrupt_window().unwrap();
    assert!(report.missed_duel.is_none());
    assert_eq!(
        t.cancel_interrupt_window(),
        Err(EngineError::InterruptWindowClosed)
    );
}

#[test]
fn test_public_view_serializes() {
    let (mut t, clock) = table(2, vec![cat(1, 0), cat(2, 0)]);
    t.draw(&pid("p0")).unwrap();
    t.draw(&pid("p1")).unwrap();
    clock.advance(1_000);

    let view = t.public_view();
    assert_eq!(view.seats.len(), 2);
    assert_eq!(view.seats[0].top.as_ref().map(|c| c.topic.as_str()), Some("城市"));
    let duel = view.duel.as_ref().unwrap();
    assert_eq!(duel.remaining_ms, 4_000);
    assert!(!duel.stale);
    assert!(view.round_over);

    let json = serde_json::to_string(&view).unwrap();
    let back: word_transit::table::PublicTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, view);
}
