//! Card types.
//!
//! A deck mixes two kinds of card:
//! - `CategoryCard`: a role (who the card belongs to) and a topic in two
//!   languages. Duels are decided by comparing roles.
//! - `RuleCard`: names an unordered role pair that must duel while the rule
//!   is active, on top of the always-on same-role rule.

use serde::{Deserialize, Serialize};

/// Unique identity of a physical card within one deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Role key such as `r0`, `r1`, ... Generated per round for `n + 1` roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u8);

impl RoleId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Stable textual key, e.g. `r3`.
    #[must_use]
    pub fn key(self) -> String {
        format!("r{}", self.0)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Which of the two label sets to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Native,
    Foreign,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryCard {
    pub id: CardId,
    pub role: RoleId,
    pub topic_native: String,
    pub topic_foreign: String,
}

impl CategoryCard {
    pub fn new(
        id: CardId,
        role: RoleId,
        topic_native: impl Into<String>,
        topic_foreign: impl Into<String>,
    ) -> Self {
        Self {
            id,
            role,
            topic_native: topic_native.into(),
            topic_foreign: topic_foreign.into(),
        }
    }

    #[must_use]
    pub fn topic(&self, language: Language) -> &str {
        match language {
            Language::Native => &self.topic_native,
            Language::Foreign => &self.topic_foreign,
        }
    }
}

/// Unordered role pair forced to duel while this rule is active.
///
/// The pair is stored normalized (smaller role first), so `{a, b}` and
/// `{b, a}` compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleCard {
    pub id: CardId,
    forced_pair: (RoleId, RoleId),
}

impl RuleCard {
    #[must_use]
    pub fn new(id: CardId, a: RoleId, b: RoleId) -> Self {
        Self {
            id,
            forced_pair: normalize(a, b),
        }
    }

    #[must_use]
    pub fn forced_pair(&self) -> (RoleId, RoleId) {
        self.forced_pair
    }

    /// True when `{a, b}` is exactly this rule's pair.
    #[must_use]
    pub fn forces(&self, a: RoleId, b: RoleId) -> bool {
        normalize(a, b) == self.forced_pair
    }
}

pub(crate) fn normalize(a: RoleId, b: RoleId) -> (RoleId, RoleId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    Category(CategoryCard),
    Rule(RuleCard),
}

impl Card {
    #[must_use]
    pub fn id(&self) -> CardId {
        match self {
            Card::Category(c) => c.id,
            Card::Rule(r) => r.id,
        }
    }

    #[must_use]
    pub fn is_rule(&self) -> bool {
        matches!(self, Card::Rule(_))
    }

    #[must_use]
    pub fn as_category(&self) -> Option<&CategoryCard> {
        match self {
            Card::Category(c) => Some(c),
            Card::Rule(_) => None,
        }
    }
}

impl From<CategoryCard> for Card {
    fn from(card: CategoryCard) -> Self {
        Card::Category(card)
    }
}

impl From<RuleCard> for Card {
    fn from(card: RuleCard) -> Self {
        Card::Rule(card)
    }
}
