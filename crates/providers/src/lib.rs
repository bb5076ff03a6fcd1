//! Completion providers and the chat client for Parley.
//!
//! Providers implement `parley_core::Provider`. The chat client wraps one
//! and implements `parley_core::Responder`, which is what the dispatcher
//! talks to for direct replies.

pub mod chat_client;
pub mod openai_compat;
pub mod router;

pub use chat_client::ChatClient;
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
