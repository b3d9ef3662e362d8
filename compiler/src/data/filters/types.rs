//! Criterion definitions
//!
//! A criterion is the comparison a base filter applies to one field. Each has
//! a default predicate form; whether that form applies depends on the field's
//! declared kind.

use serde::{Deserialize, Serialize};

use crate::data::error::{FilterError, FilterResult};
use crate::data::schema::{FieldKind, SchemaField};
use crate::data::statement::{Emission, Value};
use crate::utils::sql::{contains_pattern, ends_with_pattern, starts_with_pattern};

/// How a filter joins its per-field predicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every predicate must hold (AND)
    #[default]
    All,
    /// Any predicate may hold (OR)
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Equals(Value),
    NotEquals(Value),
    GreaterThan(Value),
    GreaterOrEqual(Value),
    LessThan(Value),
    LessOrEqual(Value),
    Between(Value, Value),
    In(Vec<Value>),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    IsNull,
    IsNotNull,
}

impl Criterion {
    /// Short description used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equals(_) | Self::NotEquals(_) => "equality",
            Self::GreaterThan(_)
            | Self::GreaterOrEqual(_)
            | Self::LessThan(_)
            | Self::LessOrEqual(_) => "ordering",
            Self::Between(..) => "range",
            Self::In(_) => "membership",
            Self::Contains(_) | Self::StartsWith(_) | Self::EndsWith(_) => "pattern match",
            Self::IsNull | Self::IsNotNull => "null check",
        }
    }

    /// Check that `field` has a predicate form for this criterion
    pub fn check(&self, field: &SchemaField) -> FilterResult<()> {
        let kind = field.kind;
        let supported = match self {
            Self::IsNull | Self::IsNotNull => true,
            Self::Equals(v) | Self::NotEquals(v) => v.is_null() || kind.is_comparable(),
            Self::GreaterThan(v)
            | Self::GreaterOrEqual(v)
            | Self::LessThan(v)
            | Self::LessOrEqual(v) => {
                if v.is_null() {
                    return Err(unsupported(field, "NULL has no ordering"));
                }
                kind.is_ordered()
            }
            Self::Between(lo, hi) => {
                if lo.is_null() || hi.is_null() {
                    return Err(unsupported(field, "range bounds cannot be NULL"));
                }
                kind.is_ordered()
            }
            Self::In(values) => {
                if values.is_empty() {
                    return Err(unsupported(field, "IN list is empty"));
                }
                if values.iter().any(Value::is_null) {
                    return Err(unsupported(field, "IN list cannot contain NULL"));
                }
                kind.is_comparable()
            }
            Self::Contains(_) | Self::StartsWith(_) | Self::EndsWith(_) => kind.is_textual(),
        };

        if !supported {
            return Err(FilterError::unsupported_kind(&field.name, kind, self.label()));
        }
        match self.values().into_iter().find(|v| !v.fits(kind)) {
            Some(v) => Err(unsupported(
                field,
                &format!("{} value does not match field kind {}", v.type_name(), kind),
            )),
            None => Ok(()),
        }
    }

    /// Values bound under the field's kind; pattern text is always bound as text
    fn values(&self) -> Vec<&Value> {
        match self {
            Self::Equals(v)
            | Self::NotEquals(v)
            | Self::GreaterThan(v)
            | Self::GreaterOrEqual(v)
            | Self::LessThan(v)
            | Self::LessOrEqual(v) => vec![v],
            Self::Between(lo, hi) => vec![lo, hi],
            Self::In(values) => values.iter().collect(),
            Self::Contains(_)
            | Self::StartsWith(_)
            | Self::EndsWith(_)
            | Self::IsNull
            | Self::IsNotNull => Vec::new(),
        }
    }

    /// Render the predicate for `field`, binding values through `emission`
    ///
    /// Callers must have run [`Criterion::check`] first.
    pub(crate) fn render(&self, field: &SchemaField, emission: &mut Emission<'_, '_>) -> String {
        let dialect = emission.dialect();
        let col = dialect.format_native_name(&field.native_name);
        let kind = field.kind;

        match self {
            Self::Equals(Value::Null) | Self::IsNull => format!("{} IS NULL", col),
            Self::NotEquals(Value::Null) | Self::IsNotNull => format!("{} IS NOT NULL", col),
            Self::Equals(Value::Boolean(b)) if kind == FieldKind::Boolean => {
                format!("{} = {}", col, dialect.bool_literal(*b))
            }
            Self::NotEquals(Value::Boolean(b)) if kind == FieldKind::Boolean => {
                format!("{} <> {}", col, dialect.bool_literal(*b))
            }
            Self::Equals(v) => compare(&col, "=", kind, v, emission),
            Self::NotEquals(v) => compare(&col, "<>", kind, v, emission),
            Self::GreaterThan(v) => compare(&col, ">", kind, v, emission),
            Self::GreaterOrEqual(v) => compare(&col, ">=", kind, v, emission),
            Self::LessThan(v) => compare(&col, "<", kind, v, emission),
            Self::LessOrEqual(v) => compare(&col, "<=", kind, v, emission),
            Self::Between(lo, hi) => {
                let lo = emission.bind(kind, lo.clone());
                let hi = emission.bind(kind, hi.clone());
                format!("{} BETWEEN {} {} {}", col, lo, dialect.and_keyword(), hi)
            }
            Self::In(values) => {
                let markers: Vec<String> = values
                    .iter()
                    .map(|v| emission.bind(kind, v.clone()))
                    .collect();
                format!("{} IN ({})", col, markers.join(", "))
            }
            Self::Contains(s) => like(&col, contains_pattern(s), kind, emission),
            Self::StartsWith(s) => like(&col, starts_with_pattern(s), kind, emission),
            Self::EndsWith(s) => like(&col, ends_with_pattern(s), kind, emission),
        }
    }
}

fn compare(
    col: &str,
    op: &str,
    kind: FieldKind,
    value: &Value,
    emission: &mut Emission<'_, '_>,
) -> String {
    let marker = emission.bind(kind, value.clone());
    format!("{} {} {}", col, op, marker)
}

fn like(col: &str, pattern: String, kind: FieldKind, emission: &mut Emission<'_, '_>) -> String {
    let marker = emission.bind(kind, Value::Text(pattern));
    let escape = emission.dialect().like_escape_clause();
    format!("{} LIKE {}{}", col, marker, escape)
}

fn unsupported(field: &SchemaField, reason: &str) -> FilterError {
    FilterError::UnsupportedCriterion {
        field: field.name.clone(),
        reason: reason.to_string(),
    }
}
