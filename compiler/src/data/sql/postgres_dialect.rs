//! PostgreSQL SQL dialect implementation

use super::SqlDialect;
use super::dialect::quote_with;
use crate::data::statement::ParameterName;

/// PostgreSQL SQL dialect
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn format_native_name(&self, name: &str) -> String {
        quote_with(name, '"', '"')
    }

    fn format_parameter_marker(&self, param: &ParameterName) -> String {
        format!("${}", param.ordinal())
    }

    fn free_text_predicate(&self, column: &str, marker: &str) -> String {
        format!("to_tsvector({}) @@ plainto_tsquery({})", column, marker)
    }

    fn native_free_text(&self) -> bool {
        true
    }
}
