//! Role generation.
//!
//! A round with `n` seated players uses `n + 1` roles, so at least one role
//! never belongs to a live seat. Labels come from a fixed pool in both
//! languages and wrap around when the pool runs out.

use serde::{Deserialize, Serialize};

use super::card::{Language, RoleId};

const NATIVE_NAMES: [&str; 11] = [
    "孙行者", "者行孙", "行者孙", "牛魔王", "白骨精", "铁扇公主", "沙和尚", "猪悟能", "红孩儿",
    "金角大王", "银角大王",
];

const FOREIGN_NAMES: [&str; 11] = [
    "Amy", "Jim", "Bob", "Eve", "Lily", "Max", "Zoe", "Tom", "Ada", "Ivy", "Jay",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub native: String,
    pub foreign: String,
}

impl Role {
    #[must_use]
    pub fn label(&self, language: Language) -> &str {
        match language {
            Language::Native => &self.native,
            Language::Foreign => &self.foreign,
        }
    }
}

/// The roles in play for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCatalog {
    roles: Vec<Role>,
}

impl RoleCatalog {
    /// Generate `seat_count + 1` roles. Same input, same catalog.
    ///
    /// ```
    /// use word_transit::cards::RoleCatalog;
    ///
    /// let roles = RoleCatalog::generate(2);
    /// assert_eq!(roles.len(), 3);
    /// assert_eq!(roles.ids()[2].key(), "r2");
    /// ```
    #[must_use]
    pub fn generate(seat_count: usize) -> Self {
        let roles = (0..=seat_count)
            .map(|i| Role {
                id: RoleId::new(i as u8),
                native: NATIVE_NAMES[i % NATIVE_NAMES.len()].to_string(),
                foreign: FOREIGN_NAMES[i % FOREIGN_NAMES.len()].to_string(),
            })
            .collect();
        Self { roles }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<RoleId> {
        self.roles.iter().map(|r| r.id).collect()
    }

    #[must_use]
    pub fn get(&self, id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    /// Display label; falls back to the role key for unknown roles.
    #[must_use]
    pub fn label(&self, id: RoleId, language: Language) -> String {
        self.get(id)
            .map(|r| r.label(language).to_string())
            .unwrap_or_else(|| id.key())
    }
}
