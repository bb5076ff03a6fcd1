//! Responder trait: the direct-response collaborator of the dispatcher.
//!
//! Messages that do not need task orchestration are answered by a
//! `Responder` in a single call. In production this is the chat client
//! backed by a remote completion service.

use async_trait::async_trait;
use crate::error::RemoteServiceError;

#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply for `input`.
    async fn respond(&self, input: &str) -> std::result::Result<String, RemoteServiceError>;
}
