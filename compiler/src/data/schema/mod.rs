//! Entity schema metadata
//!
//! Read-only description of the fields a filter may constrain. Filters hold
//! references into a schema; they never copy or mutate it.

mod catalog;
mod types;

pub use catalog::Catalog;
pub use types::{Entity, EntitySchema, FieldKind, SchemaField};
