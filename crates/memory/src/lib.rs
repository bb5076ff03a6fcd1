//! Memory store implementations for Parley.
//!
//! Both stores are process-local; there is no persistence.

pub mod formatting;
pub mod in_memory;

pub use formatting::FormattingMemory;
pub use in_memory::InMemoryStore;
