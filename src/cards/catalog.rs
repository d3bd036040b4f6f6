//! Topic catalog.
//!
//! Topics are native/foreign label pairs loaded once per process and shared
//! read-only between rooms. Records use the `category`/`en` column names of
//! the source data as aliases.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic {
    #[serde(alias = "category")]
    pub native: String,
    #[serde(alias = "en")]
    pub foreign: String,
}

impl Topic {
    pub fn new(native: impl Into<String>, foreign: impl Into<String>) -> Self {
        Self {
            native: native.into(),
            foreign: foreign.into(),
        }
    }
}

/// Non-empty, immutable list of topics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicCatalog {
    topics: Arc<[Topic]>,
}

impl TopicCatalog {
    /// Build a catalog. Empty input is a configuration error.
    pub fn new(topics: Vec<Topic>) -> Result<Self> {
        let topics: Vec<Topic> = topics
            .into_iter()
            .filter(|t| !t.native.trim().is_empty() && !t.foreign.trim().is_empty())
            .collect();
        if topics.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        Ok(Self {
            topics: topics.into(),
        })
    }

    /// Load from a JSON array of `{native, foreign}` (or `{category, en}`) records.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let topics: Vec<Topic> =
            serde_json::from_str(text).map_err(|e| EngineError::config(e.to_string()))?;
        Self::new(topics)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }
}
