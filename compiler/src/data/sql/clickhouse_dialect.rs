//! ClickHouse SQL dialect implementation

use super::SqlDialect;
use super::dialect::quote_with;
use crate::data::schema::FieldKind;
use crate::data::statement::ParameterName;

/// ClickHouse SQL dialect
pub struct ClickhouseDialect;

impl ClickhouseDialect {
    /// ClickHouse type used in server-side parameter markers
    fn parameter_type(kind: FieldKind) -> &'static str {
        match kind {
            FieldKind::Text
            | FieldKind::FixedText
            | FieldKind::AnsiText
            | FieldKind::AnsiFixedText
            | FieldKind::Binary => "String",
            FieldKind::Integer => "Int64",
            FieldKind::Decimal => "Decimal128(9)",
            FieldKind::Float => "Float64",
            FieldKind::Boolean => "Bool",
            FieldKind::Date => "Date",
            FieldKind::DateTime => "DateTime64(6)",
            FieldKind::Guid => "UUID",
        }
    }
}

impl SqlDialect for ClickhouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn format_native_name(&self, name: &str) -> String {
        quote_with(name, '`', '`')
    }

    fn format_parameter_marker(&self, param: &ParameterName) -> String {
        format!(
            "{{{}:{}}}",
            param.name(),
            Self::parameter_type(param.kind())
        )
    }

    fn like_escape_clause(&self) -> &'static str {
        ""
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }
}
