//! Memory store trait: scoped text lookups for memory tasks.
//!
//! Lookups are total: a store always answers with some text. A store that
//! can fail internally must degrade to a textual answer on its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which half of the store a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryScope {
    /// Shared across all users
    Public,
    /// Visible to a single user only
    Private,
}

/// The core MemoryStore trait.
///
/// Implementations: formatting stand-in, keyed in-memory store.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// The store name (e.g., "formatting", "in_memory").
    fn name(&self) -> &str;

    /// Look up public memory related to `input`.
    async fn retrieve_public_memory(&self, input: &str) -> String;

    /// Look up memory private to `user_id` related to `input`.
    async fn retrieve_private_memory(&self, user_id: &str, input: &str) -> String;

    /// Scope-dispatching convenience wrapper.
    async fn retrieve(&self, scope: MemoryScope, user_id: &str, input: &str) -> String {
        match scope {
            MemoryScope::Public => self.retrieve_public_memory(input).await,
            MemoryScope::Private => self.retrieve_private_memory(user_id, input).await,
        }
    }
}
