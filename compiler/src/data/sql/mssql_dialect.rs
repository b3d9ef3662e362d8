//! SQL Server dialect implementation

use super::SqlDialect;
use super::dialect::quote_with;
use crate::data::statement::ParameterName;

/// SQL Server dialect
pub struct MssqlDialect;

impl SqlDialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn format_native_name(&self, name: &str) -> String {
        quote_with(name, '[', ']')
    }

    fn format_parameter_marker(&self, param: &ParameterName) -> String {
        format!("@{}", param.name())
    }

    fn native_free_text(&self) -> bool {
        true
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        // bit columns
        if value { "1" } else { "0" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::FieldKind;

    #[test]
    fn test_parameter_marker() {
        let dialect = MssqlDialect;
        let param = ParameterName::new("p7", 7, FieldKind::Text);
        assert_eq!(dialect.format_parameter_marker(&param), "@p7");
    }

    #[test]
    fn test_free_text_predicate() {
        let dialect = MssqlDialect;
        let column = dialect.format_native_name("Description");
        assert_eq!(
            dialect.free_text_predicate(&column, "@p1"),
            "FREETEXT([Description], @p1)"
        );
    }
}
