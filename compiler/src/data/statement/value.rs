//! Parameter values

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::data::schema::FieldKind;

/// A value bound to a statement parameter
///
/// Serializes untagged, so a parameter list renders as plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    /// Exact decimal, kept in its textual form
    Decimal(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Boolean(_) => "boolean",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date_time",
            Self::Guid(_) => "guid",
        }
    }

    /// Whether this value can be bound under a parameter of `kind`
    ///
    /// NULL fits every kind. Integers also fit decimal and float columns.
    pub fn fits(&self, kind: FieldKind) -> bool {
        match self {
            Self::Null => true,
            Self::Text(_) => kind.is_textual(),
            Self::Integer(_) => {
                matches!(kind, FieldKind::Integer | FieldKind::Decimal | FieldKind::Float)
            }
            Self::Float(_) => kind == FieldKind::Float,
            Self::Decimal(_) => kind == FieldKind::Decimal,
            Self::Boolean(_) => kind == FieldKind::Boolean,
            Self::Date(_) => kind == FieldKind::Date,
            Self::DateTime(_) => kind == FieldKind::DateTime,
            Self::Guid(_) => kind == FieldKind::Guid,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON scalar into a value of the given field kind
    pub fn from_json(value: &serde_json::Value, kind: FieldKind) -> Result<Self, String> {
        use serde_json::Value as Json;

        if value.is_null() {
            return Ok(Self::Null);
        }

        let mismatch = || format!("expected a {} value, got {}", kind, value);

        match kind {
            FieldKind::Text
            | FieldKind::FixedText
            | FieldKind::AnsiText
            | FieldKind::AnsiFixedText => value
                .as_str()
                .map(|s| Self::Text(s.to_string()))
                .ok_or_else(mismatch),
            FieldKind::Integer => value.as_i64().map(Self::Integer).ok_or_else(mismatch),
            FieldKind::Float => value.as_f64().map(Self::Float).ok_or_else(mismatch),
            FieldKind::Decimal => match value {
                Json::Number(n) => Ok(Self::Decimal(n.to_string())),
                Json::String(s) if is_decimal_literal(s) => Ok(Self::Decimal(s.clone())),
                _ => Err(mismatch()),
            },
            FieldKind::Boolean => value.as_bool().map(Self::Boolean).ok_or_else(mismatch),
            FieldKind::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(Self::Date)
                .ok_or_else(mismatch),
            FieldKind::DateTime => value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| Self::DateTime(dt.with_timezone(&Utc)))
                .ok_or_else(mismatch),
            FieldKind::Guid => value
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .map(Self::Guid)
                .ok_or_else(mismatch),
            FieldKind::Binary => Err(format!("{} values cannot be bound from JSON", kind)),
        }
    }
}

fn is_decimal_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut parts = digits.splitn(2, '.');
    let int = parts.next().unwrap_or_default();
    let frac = parts.next();
    !int.is_empty()
        && int.chars().all(|c| c.is_ascii_digit())
        && frac.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Text(s) | Self::Decimal(s) => write!(f, "{}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Date(d) => write!(f, "{}", d),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Guid(g) => write!(f, "{}", g),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Uuid> for Value {
    fn from(g: Uuid) -> Self {
        Self::Guid(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_kind() {
        assert!(Value::Null.fits(FieldKind::Guid));
        assert!(Value::from("x").fits(FieldKind::AnsiFixedText));
        assert!(!Value::from("x").fits(FieldKind::Date));
        assert!(Value::Integer(3).fits(FieldKind::Float));
        assert!(!Value::Float(3.0).fits(FieldKind::Integer));
        assert!(!Value::Boolean(true).fits(FieldKind::Integer));
        assert_eq!(Value::Decimal("1.5".into()).type_name(), "decimal");
    }
    use serde_json::json;

    #[test]
    fn test_from_json_text() {
        assert_eq!(
            Value::from_json(&json!("widget"), FieldKind::AnsiText),
            Ok(Value::Text("widget".into()))
        );
        assert!(Value::from_json(&json!(3), FieldKind::Text).is_err());
    }

    #[test]
    fn test_from_json_null() {
        assert_eq!(Value::from_json(&json!(null), FieldKind::Integer), Ok(Value::Null));
    }

    #[test]
    fn test_from_json_date() {
        assert_eq!(
            Value::from_json(&json!("2024-02-29"), FieldKind::Date),
            Ok(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert!(Value::from_json(&json!("2023-02-29"), FieldKind::Date).is_err());
    }

    #[test]
    fn test_from_json_date_time_normalized_to_utc() {
        let value = Value::from_json(&json!("2024-01-01T02:00:00+02:00"), FieldKind::DateTime)
            .unwrap();
        assert_eq!(value.to_string(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_from_json_decimal() {
        assert_eq!(
            Value::from_json(&json!("12.50"), FieldKind::Decimal),
            Ok(Value::Decimal("12.50".into()))
        );
        assert!(Value::from_json(&json!("12."), FieldKind::Decimal).is_err());
        assert!(Value::from_json(&json!("abc"), FieldKind::Decimal).is_err());
    }

    #[test]
    fn test_from_json_guid() {
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(
            Value::from_json(&json!(id), FieldKind::Guid),
            Ok(Value::Guid(Uuid::parse_str(id).unwrap()))
        );
    }

    #[test]
    fn test_binary_not_bindable() {
        assert!(Value::from_json(&json!("AAEC"), FieldKind::Binary).is_err());
    }

    #[test]
    fn test_serialize_untagged() {
        let values = vec![Value::Text("a".into()), Value::Integer(3), Value::Null];
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"["a",3,null]"#);
    }
}
