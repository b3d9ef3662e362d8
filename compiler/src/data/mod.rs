//! Constraint compilation layer
//!
//! - `schema` - entity schemas and the catalog they are resolved from
//! - `sql` - dialect strategies for quoting, markers and full-text predicates
//! - `statement` - the sink that collects fragments and parameter bindings
//! - `filters` - field and free-text filters, plus JSON request parsing
//! - `error` - error type shared by all of the above
//!
//! ## Emission
//!
//! Filters are configured against a schema and emitted into a statement in
//! turn. Each emission either appends exactly one fragment with its bindings
//! or fails and leaves the statement untouched.

pub mod error;
pub mod filters;
pub mod schema;
pub mod sql;
pub mod statement;

pub use error::{FilterError, FilterResult};
