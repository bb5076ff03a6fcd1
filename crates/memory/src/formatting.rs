//! Formatting memory: the default stand-in store.
//!
//! Nothing is stored; every lookup answers with a description of what was
//! asked for. This keeps memory tasks end-to-end testable until a real
//! store is plugged in.

use async_trait::async_trait;
use parley_core::memory::MemoryStore;
use tracing::info;

/// A memory store that formats the lookup instead of searching anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingMemory;

impl FormattingMemory {
    pub fn public_text(input: &str) -> String {
        format!("Public memory for: {input}")
    }

    pub fn private_text(user_id: &str, input: &str) -> String {
        format!("Private memory for user {user_id}: {input}")
    }
}

#[async_trait]
impl MemoryStore for FormattingMemory {
    fn name(&self) -> &str { "formatting" }

    async fn retrieve_public_memory(&self, input: &str) -> String {
        info!("Retrieving public memory for: {input}");
        Self::public_text(input)
    }

    async fn retrieve_private_memory(&self, user_id: &str, input: &str) -> String {
        info!(user_id, "Retrieving private memory");
        Self::private_text(user_id, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::memory::MemoryScope;

    #[tokio::test]
    async fn public_lookup_formats_input() {
        let mem = FormattingMemory;
        assert_eq!(
            mem.retrieve_public_memory("memory of cats").await,
            "Public memory for: memory of cats"
        );
    }

    #[tokio::test]
    async fn private_lookup_names_user() {
        let mem = FormattingMemory;
        assert_eq!(
            mem.retrieve_private_memory("u1", "private memory").await,
            "Private memory for user u1: private memory"
        );
    }

    #[tokio::test]
    async fn retrieve_dispatches_on_scope() {
        let mem = FormattingMemory;
        assert!(mem.retrieve(MemoryScope::Public, "u1", "x").await.starts_with("Public"));
        assert!(mem.retrieve(MemoryScope::Private, "u1", "x").await.starts_with("Private"));
    }
}
