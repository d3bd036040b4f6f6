//! Card system: card types, roles, topics, and deck construction.
//!
//! ## Key Types
//!
//! - `Card`: either a `CategoryCard` (role + topic) or a `RuleCard` (forced role pair)
//! - `RoleCatalog`: the `n + 1` roles of a round with their labels
//! - `TopicCatalog`: shared native/foreign topic pairs
//! - `DeckBuilder` / `DrawPile`: the shuffled shared pile

pub mod card;
pub mod catalog;
pub mod deck;
pub mod roles;

pub use card::{Card, CardId, CategoryCard, Language, RoleId, RuleCard};
pub use catalog::{Topic, TopicCatalog};
pub use deck::{DeckBuilder, DrawPile};
pub use roles::{Role, RoleCatalog};
