//! Constraint filters
//!
//! A filter knows how to emit one group of constraints into a [`Statement`].
//! Two kinds exist: [`FieldFilter`] emits comparison predicates per field, and
//! [`FreeTextFilter`] emits a full-text search group merged with its own
//! comparison predicates.
//!
//! ## Usage
//!
//! ```
//! use sieve_compiler::data::filters::{AppendConstraints, Criterion, FieldFilter, FreeTextFilter};
//! use sieve_compiler::data::schema::{EntitySchema, FieldKind, SchemaField};
//! use sieve_compiler::data::sql::MssqlDialect;
//! use sieve_compiler::data::statement::{Statement, Value};
//!
//! let schema = EntitySchema::new("Widget", "widgets", vec![
//!     SchemaField::new("Name", "name", FieldKind::Text),
//!     SchemaField::new("Age", "age", FieldKind::Integer),
//! ]);
//!
//! let mut statement = Statement::new(&MssqlDialect);
//!
//! let mut adults = FieldFilter::new(&schema);
//! adults.set_criterion("Age", Criterion::GreaterOrEqual(Value::Integer(18))).unwrap();
//! adults.append_constraints(&mut statement).unwrap();
//!
//! let mut search = FreeTextFilter::new(&schema);
//! search.set_terms("widget").add_all_text_fields();
//! search.append_constraints(&mut statement).unwrap();
//!
//! assert_eq!(
//!     statement.where_clause().unwrap(),
//!     "([age] >= @p1) AND (FREETEXT([name], @p2))"
//! );
//! ```

mod field_filter;
mod field_set;
mod free_text;
mod parser;
mod types;

#[cfg(test)]
mod tests;

pub use field_filter::FieldFilter;
pub use field_set::FieldSet;
pub use free_text::FreeTextFilter;
pub use parser::{ParsedRequest, compile_request, parse_request};
pub use types::{Criterion, MatchMode};

use crate::data::error::FilterResult;
use crate::data::schema::EntitySchema;
use crate::data::statement::Statement;

/// Emits a filter's constraints into a statement
///
/// Emission is all-or-nothing: on error the statement is left untouched.
/// A filter emits at most once; later calls fail with `AlreadyEmitted`.
pub trait AppendConstraints {
    fn append_constraints(&mut self, statement: &mut Statement<'_>) -> FilterResult<()>;
}

/// Closed set of filter kinds
#[derive(Debug, Clone)]
pub enum Filter<'s> {
    Field(FieldFilter<'s>),
    FreeText(FreeTextFilter<'s>),
}

impl<'s> Filter<'s> {
    pub fn schema(&self) -> &'s EntitySchema {
        match self {
            Self::Field(f) => f.schema(),
            Self::FreeText(f) => f.schema(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Field(_) => "field",
            Self::FreeText(_) => "free_text",
        }
    }

    pub fn is_emitted(&self) -> bool {
        match self {
            Self::Field(f) => f.is_emitted(),
            Self::FreeText(f) => f.is_emitted(),
        }
    }
}

impl AppendConstraints for Filter<'_> {
    fn append_constraints(&mut self, statement: &mut Statement<'_>) -> FilterResult<()> {
        tracing::trace!(kind = self.kind(), "Appending filter constraints");
        match self {
            Self::Field(f) => f.append_constraints(statement),
            Self::FreeText(f) => f.append_constraints(statement),
        }
    }
}

impl<'s> From<FieldFilter<'s>> for Filter<'s> {
    fn from(f: FieldFilter<'s>) -> Self {
        Self::Field(f)
    }
}

impl<'s> From<FreeTextFilter<'s>> for Filter<'s> {
    fn from(f: FreeTextFilter<'s>) -> Self {
        Self::FreeText(f)
    }
}
