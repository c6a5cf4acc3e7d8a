//! # Domain Layer
//!
//! Lookup models, credentials, and the prompt builder.
//! This layer is independent of external frameworks and infrastructure.

pub mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
