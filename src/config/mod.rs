//! Configuration module for mctex
//!
//! Provides types and loading for `mctex.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
