//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

use crate::data::statement::ParameterName;

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Identifier quoting ("col" vs `col` vs [col])
/// - Parameter markers (? vs $1 vs @p1)
/// - Full-text search predicates
///
/// Dialects are stateless and shared; filters only ever read from them.
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    fn and_keyword(&self) -> &'static str {
        "AND"
    }

    fn or_keyword(&self) -> &'static str {
        "OR"
    }

    fn not_keyword(&self) -> &'static str {
        "NOT"
    }

    /// Quote a storage-level identifier (column or table name)
    ///
    /// - SQLite/PostgreSQL/DuckDB: `"name"`
    /// - MySQL/ClickHouse: `` `name` ``
    /// - SQL Server: `[name]`
    fn format_native_name(&self, name: &str) -> String;

    /// Generate the marker a driver binds the given parameter to
    ///
    /// - SQLite: `?1`, `?2`, ...
    /// - PostgreSQL/DuckDB: `$1`, `$2`, ...
    /// - SQL Server/MySQL: `@p1`, `@p2`, ...
    /// - ClickHouse: `{p1:String}`
    ///
    /// Markers must be reusable: the same parameter may appear several times
    /// in one statement.
    fn format_parameter_marker(&self, param: &ParameterName) -> String;

    /// Full-text match of one column against a bound search string
    ///
    /// - Default: `FREETEXT(col, marker)`
    /// - PostgreSQL: `to_tsvector(col) @@ plainto_tsquery(marker)`
    ///
    /// Only SQL Server ships `FREETEXT`. Elsewhere the default form expects a
    /// user-defined function of that name; see [`SqlDialect::native_free_text`].
    fn free_text_predicate(&self, column: &str, marker: &str) -> String {
        format!("FREETEXT({}, {})", column, marker)
    }

    /// Whether [`SqlDialect::free_text_predicate`] runs without a
    /// user-defined function
    fn native_free_text(&self) -> bool {
        false
    }

    /// Clause appended to `LIKE` so the pattern escape character is `\`
    ///
    /// - Default: ` ESCAPE '\'`
    /// - MySQL: ` ESCAPE '\\'` (backslash escapes inside string literals)
    /// - ClickHouse: empty, `\` is already its only escape character
    fn like_escape_clause(&self) -> &'static str {
        " ESCAPE '\\'"
    }

    /// Boolean literal
    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }
}

/// Quote an identifier by wrapping it and doubling any embedded closing quote
pub(crate) fn quote_with(name: &str, open: char, close: char) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(open);
    for c in name.chars() {
        if c == close {
            quoted.push(close);
        }
        quoted.push(c);
    }
    quoted.push(close);
    quoted
}
