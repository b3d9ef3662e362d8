//! Statement sink
//!
//! A `Statement` accumulates the constraint fragments and parameter bindings
//! that filters contribute to one query. The caller owns it and lends it to
//! each filter in turn with `&mut`.
//!
//! Filters write through an [`Emission`]: bindings and names it allocates are
//! only kept once the emission commits its fragment, so a failed filter leaves
//! the statement exactly as it found it.

mod params;
mod value;

use serde::Serialize;

pub use params::{DEFAULT_PARAMETER_PREFIX, ParameterBinding, ParameterName, ParameterRegistry};
pub use value::Value;

use crate::data::error::{FilterError, FilterResult};
use crate::data::schema::{EntitySchema, FieldKind};
use crate::data::sql::SqlDialect;
use params::RegistryCheckpoint;

pub struct Statement<'d> {
    dialect: Option<&'d dyn SqlDialect>,
    registry: ParameterRegistry,
    fragments: Vec<String>,
    parameters: Vec<ParameterBinding>,
}

/// Finished query text plus its parameter list, in marker order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub parameters: Vec<ParameterBinding>,
}

impl<'d> Statement<'d> {
    pub fn new(dialect: &'d dyn SqlDialect) -> Self {
        Self {
            dialect: Some(dialect),
            registry: ParameterRegistry::default(),
            fragments: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// A statement with no dialect; emitting into it fails with `MissingDialect`
    pub fn detached() -> Self {
        Self {
            dialect: None,
            registry: ParameterRegistry::default(),
            fragments: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Use a different prefix for parameter names generated from now on
    ///
    /// Names bound earlier stay reserved.
    pub fn with_parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.registry.set_prefix(prefix);
        self
    }

    pub fn set_dialect(&mut self, dialect: &'d dyn SqlDialect) {
        self.dialect = Some(dialect);
    }

    pub fn dialect(&self) -> FilterResult<&'d dyn SqlDialect> {
        self.dialect.ok_or(FilterError::MissingDialect)
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn parameters(&self) -> &[ParameterBinding] {
        &self.parameters
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.parameters.is_empty()
    }

    /// Bind a value under a freshly allocated name
    pub fn bind(&mut self, kind: FieldKind, value: Value) -> ParameterName {
        let name = self.registry.allocate_unique_name();
        self.push_binding(name, kind, value)
    }

    /// Bind a value under a caller-chosen name, e.g. for SQL written by hand
    pub fn bind_named(
        &mut self,
        name: &str,
        kind: FieldKind,
        value: Value,
    ) -> FilterResult<ParameterName> {
        self.registry.reserve(name)?;
        Ok(self.push_binding(name.to_string(), kind, value))
    }

    /// Append a hand-written constraint fragment
    pub fn push_fragment(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    /// Start writing one constraint group
    pub fn begin(&mut self) -> FilterResult<Emission<'_, 'd>> {
        let dialect = self.dialect()?;
        let checkpoint = self.registry.checkpoint();
        Ok(Emission {
            statement: self,
            dialect,
            checkpoint,
            allocated: Vec::new(),
            pending: Vec::new(),
            committed: false,
        })
    }

    /// Combine all fragments into one constraint expression
    ///
    /// A single fragment is returned as is. Several fragments are each
    /// parenthesized and joined with AND, so OR groups keep their scope.
    pub fn where_clause(&self) -> FilterResult<String> {
        match self.fragments.as_slice() {
            [] => Ok(String::new()),
            [only] => Ok(only.clone()),
            many => {
                let dialect = self.dialect()?;
                let joiner = format!(" {} ", dialect.and_keyword());
                Ok(many
                    .iter()
                    .map(|f| format!("({})", f))
                    .collect::<Vec<_>>()
                    .join(&joiner))
            }
        }
    }

    /// `SELECT * FROM <table> [WHERE <constraints>]`
    pub fn select_from(&self, schema: &EntitySchema) -> FilterResult<String> {
        let dialect = self.dialect()?;
        let table = dialect.format_native_name(&schema.native_name);
        let clause = self.where_clause()?;
        if clause.is_empty() {
            Ok(format!("SELECT * FROM {}", table))
        } else {
            Ok(format!("SELECT * FROM {} WHERE {}", table, clause))
        }
    }

    /// Finalize into the constraint expression and its parameters
    pub fn finish(self) -> FilterResult<CompiledQuery> {
        let sql = self.where_clause()?;
        Ok(CompiledQuery {
            sql,
            parameters: self.parameters,
        })
    }

    /// Finalize into a full SELECT over `schema`'s table
    pub fn finish_select(self, schema: &EntitySchema) -> FilterResult<CompiledQuery> {
        let sql = self.select_from(schema)?;
        Ok(CompiledQuery {
            sql,
            parameters: self.parameters,
        })
    }

    fn push_binding(&mut self, name: String, kind: FieldKind, value: Value) -> ParameterName {
        let param = ParameterName::new(name.clone(), self.parameters.len() + 1, kind);
        self.parameters.push(ParameterBinding { name, kind, value });
        param
    }
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("dialect", &self.dialect.map(|d| d.name()))
            .field("fragments", &self.fragments)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// One filter's in-progress contribution to a statement
///
/// Dropping an emission without calling [`Emission::commit`] discards its
/// bindings and returns its parameter names to the registry.
pub struct Emission<'s, 'd> {
    statement: &'s mut Statement<'d>,
    dialect: &'d dyn SqlDialect,
    checkpoint: RegistryCheckpoint,
    allocated: Vec<String>,
    pending: Vec<ParameterBinding>,
    committed: bool,
}

impl<'d> Emission<'_, 'd> {
    pub fn dialect(&self) -> &'d dyn SqlDialect {
        self.dialect
    }

    /// Bind a value and return its formatted marker
    pub fn bind(&mut self, kind: FieldKind, value: Value) -> String {
        let name = self.statement.registry.allocate_unique_name();
        self.allocated.push(name.clone());
        let ordinal = self.statement.parameters.len() + self.pending.len() + 1;
        let param = ParameterName::new(name.clone(), ordinal, kind);
        self.pending.push(ParameterBinding { name, kind, value });
        self.dialect.format_parameter_marker(&param)
    }

    /// Append the group and its bindings to the statement
    ///
    /// An empty fragment commits nothing.
    pub fn commit(mut self, fragment: String) {
        if fragment.is_empty() {
            return;
        }
        tracing::debug!(
            fragment = %fragment,
            parameters = self.pending.len(),
            "Appending constraint group"
        );
        self.statement.fragments.push(fragment);
        self.statement.parameters.append(&mut self.pending);
        self.committed = true;
    }
}

impl Drop for Emission<'_, '_> {
    fn drop(&mut self) {
        if !self.committed {
            self.statement
                .registry
                .rollback(self.checkpoint, &self.allocated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::{Backend, MssqlDialect, PostgresDialect};

    #[test]
    fn test_detached_statement_has_no_dialect() {
        let statement = Statement::detached();
        assert_eq!(statement.dialect().err(), Some(FilterError::MissingDialect));
    }

    #[test]
    fn test_detached_statement_cannot_begin() {
        let mut statement = Statement::detached();
        assert!(matches!(statement.begin(), Err(FilterError::MissingDialect)));
        assert!(statement.is_empty());
    }

    #[test]
    fn test_emission_commit() {
        let mut statement = Statement::new(&PostgresDialect);
        let mut emission = statement.begin().unwrap();
        let marker = emission.bind(FieldKind::Integer, Value::Integer(3));
        emission.commit(format!("\"age\" = {}", marker));

        assert_eq!(statement.fragments(), ["\"age\" = $1"]);
        assert_eq!(statement.parameters().len(), 1);
        assert_eq!(statement.parameters()[0].name, "p1");
    }

    #[test]
    fn test_dropped_emission_rolls_back() {
        let mut statement = Statement::new(&PostgresDialect);
        {
            let mut emission = statement.begin().unwrap();
            emission.bind(FieldKind::Text, Value::from("x"));
            emission.bind(FieldKind::Text, Value::from("y"));
        }
        assert!(statement.is_empty());
        assert_eq!(statement.registry().issued_count(), 0);
        assert_eq!(statement.bind(FieldKind::Text, "z".into()).name(), "p1");
    }

    #[test]
    fn test_empty_commit_keeps_nothing() {
        let mut statement = Statement::new(&PostgresDialect);
        let emission = statement.begin().unwrap();
        emission.commit(String::new());
        assert!(statement.is_empty());
    }

    #[test]
    fn test_ordinals_follow_existing_bindings() {
        let mut statement = Statement::new(&PostgresDialect);
        statement.bind(FieldKind::Integer, Value::Integer(1));
        let mut emission = statement.begin().unwrap();
        assert_eq!(emission.bind(FieldKind::Integer, Value::Integer(2)), "$2");
        assert_eq!(emission.bind(FieldKind::Integer, Value::Integer(3)), "$3");
    }

    #[test]
    fn test_bind_named_collision() {
        let mut statement = Statement::new(&MssqlDialect);
        statement.bind_named("p1", FieldKind::Text, "a".into()).unwrap();
        assert!(statement.bind_named("p1", FieldKind::Text, "b".into()).is_err());
        // generated names skip the hand-picked one
        assert_eq!(statement.bind(FieldKind::Text, "c".into()).name(), "p2");
    }

    #[test]
    fn test_where_clause_joins_groups() {
        let mut statement = Statement::new(&MssqlDialect);
        statement.push_fragment("[a] = @p1 OR [b] = @p2");
        statement.push_fragment("[c] IS NULL");
        assert_eq!(
            statement.where_clause().unwrap(),
            "([a] = @p1 OR [b] = @p2) AND ([c] IS NULL)"
        );
    }

    #[test]
    fn test_where_clause_single_group_verbatim() {
        let mut statement = Statement::new(&MssqlDialect);
        statement.push_fragment("[a] = @p1 OR [b] = @p2");
        assert_eq!(statement.where_clause().unwrap(), "[a] = @p1 OR [b] = @p2");
    }

    #[test]
    fn test_select_from() {
        let schema = EntitySchema::new("Widget", "widgets", vec![]);
        let mut statement = Statement::new(Backend::Sqlite.dialect());
        assert_eq!(statement.select_from(&schema).unwrap(), "SELECT * FROM \"widgets\"");
        statement.push_fragment("\"a\" = ?1");
        assert_eq!(
            statement.select_from(&schema).unwrap(),
            "SELECT * FROM \"widgets\" WHERE \"a\" = ?1"
        );
    }

    #[test]
    fn test_custom_prefix() {
        let mut statement = Statement::new(&MssqlDialect).with_parameter_prefix("arg");
        assert_eq!(statement.bind(FieldKind::Text, "x".into()).name(), "arg1");
    }

    #[test]
    fn test_prefix_change_after_bind_keeps_names_distinct() {
        let mut statement = Statement::new(&MssqlDialect);
        statement.bind(FieldKind::Text, "a".into());

        let mut statement = statement.with_parameter_prefix(DEFAULT_PARAMETER_PREFIX);
        statement.bind(FieldKind::Text, "b".into());
        let mut statement = statement.with_parameter_prefix("arg");
        statement.bind(FieldKind::Text, "c".into());

        let names: Vec<&str> = statement.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p1", "p2", "arg3"]);
        assert_eq!(statement.registry().issued_count(), 3);
    }
}
