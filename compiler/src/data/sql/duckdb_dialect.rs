//! DuckDB SQL dialect implementation

use super::SqlDialect;
use super::dialect::quote_with;
use crate::data::statement::ParameterName;

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn format_native_name(&self, name: &str) -> String {
        quote_with(name, '"', '"')
    }

    fn format_parameter_marker(&self, param: &ParameterName) -> String {
        format!("${}", param.ordinal())
    }
}
