//! Text channels for Parley.
//!
//! Parley talks to a single local user over the terminal:
//! - **Console**: stdin/stdout chat with paste detection

pub mod console;

pub use console::{coalesce_lines, read_line_blocking, ConsoleChannel};
