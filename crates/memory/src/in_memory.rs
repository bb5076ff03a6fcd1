//! In-memory store: keyed public and per-user private entries.
//!
//! A lookup returns the value of the first remembered key that occurs in the
//! input text. When no key matches, the answer falls back to the
//! formatting store's text so lookups stay total.

use async_trait::async_trait;
use parley_core::memory::MemoryStore;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::formatting::FormattingMemory;

#[derive(Debug, Default)]
struct Entries {
    public: BTreeMap<String, String>,
    private: HashMap<String, BTreeMap<String, String>>,
}

/// An in-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a value visible to every user.
    pub async fn remember_public(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().await.public.insert(key.into(), value.into());
    }

    /// Remember a value visible only to `user_id`.
    pub async fn remember_private(
        &self,
        user_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.entries
            .write()
            .await
            .private
            .entry(user_id.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Total number of remembered entries across both scopes.
    pub async fn count(&self) -> usize {
        let entries = self.entries.read().await;
        entries.public.len() + entries.private.values().map(BTreeMap::len).sum::<usize>()
    }

    // Keys are scanned in sorted order so a lookup is deterministic.
    fn find(map: &BTreeMap<String, String>, input: &str) -> Option<String> {
        map.iter()
            .find(|(key, _)| input.contains(key.as_str()))
            .map(|(_, value)| value.clone())
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    fn name(&self) -> &str { "in_memory" }

    async fn retrieve_public_memory(&self, input: &str) -> String {
        let entries = self.entries.read().await;
        match Self::find(&entries.public, input) {
            Some(value) => {
                debug!("Public memory hit");
                value
            }
            None => FormattingMemory::public_text(input),
        }
    }

    async fn retrieve_private_memory(&self, user_id: &str, input: &str) -> String {
        let entries = self.entries.read().await;
        let hit = entries
            .private
            .get(user_id)
            .and_then(|map| Self::find(map, input));
        match hit {
            Some(value) => {
                debug!(user_id, "Private memory hit");
                value
            }
            None => FormattingMemory::private_text(user_id, input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn public_hit_returns_value() {
        let mem = InMemoryStore::new();
        mem.remember_public("color", "The sky is blue").await;

        assert_eq!(
            mem.retrieve_public_memory("memory about color").await,
            "The sky is blue"
        );
    }

    #[tokio::test]
    async fn miss_falls_back_to_formatting() {
        let mem = InMemoryStore::new();
        mem.remember_public("color", "The sky is blue").await;

        assert_eq!(
            mem.retrieve_public_memory("memory about dogs").await,
            "Public memory for: memory about dogs"
        );
    }

    #[tokio::test]
    async fn private_entries_are_per_user() {
        let mem = InMemoryStore::new();
        mem.remember_private("u1", "birthday", "May 4th").await;

        assert_eq!(
            mem.retrieve_private_memory("u1", "private memory birthday").await,
            "May 4th"
        );
        assert_eq!(
            mem.retrieve_private_memory("u2", "private memory birthday").await,
            "Private memory for user u2: private memory birthday"
        );
    }

    #[tokio::test]
    async fn private_entries_do_not_leak_into_public() {
        let mem = InMemoryStore::new();
        mem.remember_private("u1", "secret", "hidden").await;

        assert_eq!(
            mem.retrieve_public_memory("memory secret").await,
            "Public memory for: memory secret"
        );
        assert_eq!(mem.count().await, 1);
    }
}
