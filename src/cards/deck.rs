//! Deck construction and the shared draw pile.
//!
//! For `n` seated players the deck holds `cards_per_player * n` category
//! cards (role and topic drawn independently and uniformly per card,
//! duplicates allowed) plus `clamp(n - 1, 1, max_rule_cards)` rule cards with
//! pairwise distinct role pairs. Pair selection gives up after a bounded
//! number of attempts, so a tiny role catalog yields fewer rule cards rather
//! than looping.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::{normalize, Card, CardId, CategoryCard, RoleId, RuleCard};
use super::catalog::TopicCatalog;
use super::roles::RoleCatalog;
use crate::core::{EngineConfig, EngineError, GameRng, Result};

/// Shared face-down pile. Cards are drawn from the top (end).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPile {
    cards: Vector<Card>,
}

impl DrawPile {
    /// Build a pile from cards listed bottom to top.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

/// Builds shuffled decks from a topic catalog.
#[derive(Clone, Debug)]
pub struct DeckBuilder {
    catalog: TopicCatalog,
    config: EngineConfig,
}

impl DeckBuilder {
    #[must_use]
    pub fn new(catalog: TopicCatalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Build and shuffle the deck for `roles.len() - 1` seated players.
    pub fn build(&self, roles: &RoleCatalog, rng: &GameRng) -> Result<DrawPile> {
        if self.catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        let role_ids = roles.ids();
        if role_ids.len() < 3 {
            return Err(EngineError::NotEnoughPlayers {
                seated: role_ids.len().saturating_sub(1),
            });
        }
        let seat_count = role_ids.len() - 1;

        let mut faces = rng.for_context("faces");
        let mut next_id = 0u32;
        let mut alloc = || {
            let id = CardId::new(next_id);
            next_id += 1;
            id
        };

        let category_count = self.config.cards_per_player * seat_count;
        let mut cards: Vec<Card> = Vec::with_capacity(category_count + self.config.max_rule_cards);
        for _ in 0..category_count {
            let role = role_ids[faces.gen_range_usize(0..role_ids.len())];
            let topic = &self.catalog.topics()[faces.gen_range_usize(0..self.catalog.len())];
            cards.push(Card::Category(CategoryCard::new(
                alloc(),
                role,
                topic.native.clone(),
                topic.foreign.clone(),
            )));
        }

        let wanted = self.config.rule_card_count(seat_count);
        let mut pairs: Vec<(RoleId, RoleId)> = Vec::with_capacity(wanted);
        let mut seen: FxHashSet<(RoleId, RoleId)> = FxHashSet::default();
        let mut attempts = 0;
        while pairs.len() < wanted && attempts < self.config.rule_pair_attempts {
            attempts += 1;
            let Some((&a, &b)) = faces.choose_two(&role_ids) else {
                break;
            };
            let pair = normalize(a, b);
            if seen.insert(pair) {
                pairs.push(pair);
            }
        }
        if pairs.len() < wanted {
            tracing::warn!(
                wanted,
                built = pairs.len(),
                "role pairs exhausted, building fewer rule cards"
            );
        }
        for (a, b) in pairs {
            cards.push(Card::Rule(RuleCard::new(alloc(), a, b)));
        }

        rng.for_context("shuffle").shuffle(&mut cards);
        tracing::debug!(seat_count, deck_size = cards.len(), "deck built");
        Ok(DrawPile::from_cards(cards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Topic;

    fn catalog() -> TopicCatalog {
        TopicCatalog::new(vec![
            Topic::new("水果", "Fruit"),
            Topic::new("交通工具", "Transport"),
            Topic::new("乐器", "Instrument"),
        ])
        .unwrap()
    }

    fn build(n: usize, seed: u64) -> DrawPile {
        DeckBuilder::new(catalog(), EngineConfig::default())
            .build(&RoleCatalog::generate(n), &GameRng::new(seed))
            .unwrap()
    }

    #[test]
    fn test_deck_size() {
        assert_eq!(build(2, 1).len(), 48 + 1);
        assert_eq!(build(3, 1).len(), 72 + 2);
        assert_eq!(build(6, 1).len(), 144 + 3);
    }

    #[test]
    fn test_rule_pairs_distinct() {
        let deck = build(5, 9);
        let pairs: Vec<_> = deck
            .iter()
            .filter_map(|c| match c {
                Card::Rule(r) => Some(r.forced_pair()),
                Card::Category(_) => None,
            })
            .collect();
        assert_eq!(pairs.len(), 3);
        let unique: FxHashSet<_> = pairs.iter().copied().collect();
        assert_eq!(unique.len(), 3);
        assert!(pairs.iter().all(|(a, b)| a != b));
    }

    fn rule_count(deck: &DrawPile) -> usize {
        deck.iter().filter(|c| c.is_rule()).count()
    }

    #[test]
    fn test_exhausted_pair_attempts_build_fewer_rules() {
        let roles = RoleCatalog::generate(4);

        let none = DeckBuilder::new(catalog(), EngineConfig::default().with_rule_pair_attempts(0))
            .build(&roles, &GameRng::new(12))
            .unwrap();
        assert_eq!(rule_count(&none), 0);
        assert_eq!(none.len(), 24 * 4);

        let one = DeckBuilder::new(catalog(), EngineConfig::default().with_rule_pair_attempts(1))
            .build(&roles, &GameRng::new(12))
            .unwrap();
        let built = rule_count(&one);
        assert_eq!(built, 1);
        assert!(built < EngineConfig::default().rule_card_count(4));
        assert_eq!(one.len(), 24 * 4 + built);
    }

    #[test]
    fn test_card_ids_unique() {
        let deck = build(4, 3);
        let ids: FxHashSet<_> = deck.iter().map(Card::id).collect();
        assert_eq!(ids.len(), deck.len());
    }

    #[test]
    fn test_roles_within_catalog() {
        let deck = build(3, 5);
        for card in deck.iter() {
            if let Card::Category(c) = card {
                assert!(c.role.0 <= 3);
            }
        }
    }

    #[test]
    fn test_same_seed_same_deck() {
        assert_eq!(build(3, 77), build(3, 77));
        assert_ne!(build(3, 77), build(3, 78));
    }

    #[test]
    fn test_too_few_roles_rejected() {
        let result = DeckBuilder::new(catalog(), EngineConfig::default())
            .build(&RoleCatalog::generate(1), &GameRng::new(0));
        assert_eq!(result, Err(EngineError::NotEnoughPlayers { seated: 1 }));
    }

    #[test]
    fn test_draw_from_top() {
        let mut pile = DrawPile::from_cards(vec![
            RuleCard::new(CardId::new(0), RoleId::new(0), RoleId::new(1)).into(),
            CategoryCard::new(CardId::new(1), RoleId::new(0), "a", "a").into(),
        ]);
        assert_eq!(pile.draw().map(|c| c.id()), Some(CardId::new(1)));
        assert_eq!(pile.draw().map(|c| c.id()), Some(CardId::new(0)));
        assert!(pile.draw().is_none());
        assert!(pile.is_empty());
    }
}
