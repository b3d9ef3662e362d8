//! Error type for constraint compilation
//!
//! Every variant is a local precondition failure. None of them are transient,
//! so callers either abort query construction or substitute a default.

use thiserror::Error;

use super::schema::FieldKind;

/// Errors raised while configuring filters or emitting constraints
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// No entity schema could be bound to the filter
    #[error("No schema is bound for entity '{entity}'")]
    MissingSchema { entity: String },

    /// Free-text filter emitted without search terms
    #[error("No search terms were specified")]
    MissingSearchTerms,

    /// Free-text filter emitted with an empty field set
    #[error("No free-text fields were specified")]
    NoSearchableFields,

    /// The statement has no dialect to format SQL with
    #[error("No SQL dialect is available for this statement")]
    MissingDialect,

    /// A field's declared kind has no predicate form for the requested criterion
    #[error("Field '{field}' of kind {kind} cannot be used with {criterion}")]
    UnsupportedFieldKind {
        field: String,
        kind: FieldKind,
        criterion: &'static str,
    },

    /// A criterion is malformed (e.g. an empty IN list) or its value does not
    /// fit the field kind
    #[error("Unsupported criterion on field '{field}': {reason}")]
    UnsupportedCriterion { field: String, reason: String },

    /// Logical field name not present in the bound schema
    #[error("Entity '{entity}' has no field named '{field}'")]
    UnknownField { entity: String, field: String },

    /// Caller-chosen parameter name collides with one already in the statement
    #[error("Parameter name '{name}' is already in use")]
    DuplicateParameter { name: String },

    /// The filter already appended its constraints once
    #[error("Filter constraints were already appended")]
    AlreadyEmitted,

    /// Filter request could not be parsed
    #[error("Invalid filter request: {0}")]
    InvalidRequest(String),
}

impl FilterError {
    /// Create a missing schema error
    pub fn missing_schema(entity: impl Into<String>) -> Self {
        Self::MissingSchema {
            entity: entity.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Create an unsupported field kind error
    pub fn unsupported_kind(
        field: impl Into<String>,
        kind: FieldKind,
        criterion: &'static str,
    ) -> Self {
        Self::UnsupportedFieldKind {
            field: field.into(),
            kind,
            criterion,
        }
    }

    /// Stable machine-readable code, used by the CLI's JSON output
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSchema { .. } => "MISSING_SCHEMA",
            Self::MissingSearchTerms => "MISSING_SEARCH_TERMS",
            Self::NoSearchableFields => "NO_SEARCHABLE_FIELDS",
            Self::MissingDialect => "MISSING_DIALECT",
            Self::UnsupportedFieldKind { .. } => "UNSUPPORTED_FIELD_KIND",
            Self::UnsupportedCriterion { .. } => "UNSUPPORTED_CRITERION",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::DuplicateParameter { .. } => "DUPLICATE_PARAMETER",
            Self::AlreadyEmitted => "ALREADY_EMITTED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

pub type FilterResult<T> = Result<T, FilterError>;
