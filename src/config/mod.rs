//! Runtime configuration from the environment.

pub mod types;
pub mod loader;

pub use types::*;
