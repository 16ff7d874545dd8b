//! Load/save boundary for the whole card collection.

use std::sync::Arc;

use crate::{error::StoreError, kv::KeyValueStore, models::Card};

/// Fixed key the card collection is stored under.
pub const STORAGE_KEY: &str = "leetcode-flashcards";

/// Persists the full card collection as one JSON document.
///
/// There are no partial writes: every save replaces the whole collection.
#[derive(Debug, Clone)]
pub struct CardStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl CardStore {
    /// Card store using the application's fixed key.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    /// Card store using a custom key.
    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the full card collection.
    ///
    /// A missing document, or one that no longer parses, yields an empty
    /// collection as on first run. Only backend failures are errors.
    pub fn load(&self) -> Result<Vec<Card>, StoreError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            tracing::debug!(key = %self.key, "No stored card collection, starting empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Card>>(&raw) {
            Ok(cards) => {
                tracing::debug!(key = %self.key, count = cards.len(), "Loaded card collection");
                Ok(cards)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Stored card collection is unreadable, starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Persist the full card collection, replacing what was stored.
    pub fn save(&self, cards: &[Card]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(cards)?;
        self.backend.set(&self.key, &raw)?;
        tracing::debug!(key = %self.key, count = cards.len(), "Saved card collection");
        Ok(())
    }
}
