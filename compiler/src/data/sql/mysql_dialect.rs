//! MySQL SQL dialect implementation

use super::SqlDialect;
use super::dialect::quote_with;
use crate::data::statement::ParameterName;

/// MySQL SQL dialect
///
/// Uses named `@` markers, so drivers must bind by name. Full-text search
/// renders the default `FREETEXT` form, which needs a stored function of that
/// name wrapping `MATCH ... AGAINST`.
pub struct MysqlDialect;

impl SqlDialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn format_native_name(&self, name: &str) -> String {
        quote_with(name, '`', '`')
    }

    fn format_parameter_marker(&self, param: &ParameterName) -> String {
        format!("@{}", param.name())
    }

    fn like_escape_clause(&self) -> &'static str {
        " ESCAPE '\\\\'"
    }
}
