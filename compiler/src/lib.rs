//! Sieve compiles entity filters into dialect-specific, parameterized SQL
//! constraints.
//!
//! - `data` - schema catalog, dialects, filters and the statement sink
//! - `core` - CLI, configuration and application wiring
//! - `utils` - shared helpers

pub mod app;
pub mod core;
pub mod data;
pub mod utils;
