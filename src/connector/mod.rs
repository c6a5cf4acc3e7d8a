//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Chat completion (OpenAI-compatible HTTP, scripted offline client)
//! - Credential storage (JSON file, in-memory)
//! - Composition root wiring both into the use cases

pub mod adapter;
pub mod container;

pub use adapter::*;
pub use container::*;
