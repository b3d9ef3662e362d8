//! Schema type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared value kind of an entity field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    FixedText,
    AnsiText,
    AnsiFixedText,
    Integer,
    Decimal,
    Float,
    Boolean,
    Date,
    DateTime,
    Guid,
    Binary,
}

impl FieldKind {
    /// True for every text variant, including fixed-length and ANSI text
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::FixedText | Self::AnsiText | Self::AnsiFixedText
        )
    }

    /// True for kinds that have a meaningful ordering (`<`, `BETWEEN`, ...)
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Self::Boolean | Self::Guid | Self::Binary)
    }

    /// True for kinds that can be compared with `=` / `IN`
    pub fn is_comparable(&self) -> bool {
        !matches!(self, Self::Binary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::FixedText => "fixed_text",
            Self::AnsiText => "ansi_text",
            Self::AnsiFixedText => "ansi_fixed_text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Guid => "guid",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entity attribute: logical name, storage-level name and declared kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemaField {
    pub name: String,
    pub native_name: String,
    pub kind: FieldKind,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, native_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            native_name: native_name.into(),
            kind,
        }
    }
}

/// Field list of one entity, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntitySchema {
    pub name: String,
    pub native_name: String,
    fields: Vec<SchemaField>,
}

impl EntitySchema {
    pub fn new(
        name: impl Into<String>,
        native_name: impl Into<String>,
        fields: Vec<SchemaField>,
    ) -> Self {
        Self {
            name: name.into(),
            native_name: native_name.into(),
            fields,
        }
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Look up a field by its logical name
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterate over the textual fields in declaration order
    pub fn text_fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|f| f.kind.is_textual())
    }
}

/// A Rust type whose rows are described by a static schema
///
/// Lets filters be bound to a concrete type instead of a schema value:
///
/// ```
/// use std::sync::LazyLock;
/// use sieve_compiler::data::schema::{Entity, EntitySchema, FieldKind, SchemaField};
///
/// struct Widget;
///
/// static WIDGET: LazyLock<EntitySchema> = LazyLock::new(|| {
///     EntitySchema::new("Widget", "widgets", vec![
///         SchemaField::new("Name", "name", FieldKind::Text),
///     ])
/// });
///
/// impl Entity for Widget {
///     fn schema() -> &'static EntitySchema {
///         &WIDGET
///     }
/// }
///
/// assert_eq!(Widget::schema().fields().len(), 1);
/// ```
pub trait Entity {
    fn schema() -> &'static EntitySchema;
}
