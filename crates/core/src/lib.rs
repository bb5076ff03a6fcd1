//! # Parley Core
//!
//! Domain types, traits, and error definitions for the Parley console agent.
//! This crate has no framework dependencies: it defines the seams that the
//! other crates implement against.
//!
//! Every collaborator of the dispatch pipeline is a trait here
//! (`Responder`, `MemoryStore`, `Provider`, `Channel`), so the pipeline can
//! be tested with deterministic substitutes and no network or file access.

pub mod error;
pub mod message;
pub mod provider;
pub mod responder;
pub mod channel;
pub mod memory;

// Re-export key types at crate root for ergonomics
pub use error::{DispatchError, ProviderError, RemoteServiceError, Result};
pub use message::{Message, Role, Conversation};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use responder::Responder;
pub use channel::{Channel, ChannelMessage, ChannelId};
pub use memory::{MemoryScope, MemoryStore};
