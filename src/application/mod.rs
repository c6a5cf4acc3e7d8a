//! # Application Layer
//!
//! Ports and the use cases that drive a wine lookup and manage credentials.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
