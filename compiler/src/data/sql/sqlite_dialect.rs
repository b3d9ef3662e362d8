//! SQLite SQL dialect implementation

use super::SqlDialect;
use super::dialect::quote_with;
use crate::data::statement::ParameterName;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn format_native_name(&self, name: &str) -> String {
        quote_with(name, '"', '"')
    }

    fn format_parameter_marker(&self, param: &ParameterName) -> String {
        // Numbered markers so a value can be referenced more than once
        format!("?{}", param.ordinal())
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        // SQLite has no boolean type, booleans are stored as integers
        if value { "1" } else { "0" }
    }
}
