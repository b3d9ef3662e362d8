//! Base constraint filter
//!
//! Emits one comparison predicate per constrained field, in field-set order,
//! joined by AND or OR depending on the match mode.

use rustc_hash::FxHashMap;

use super::AppendConstraints;
use super::field_set::FieldSet;
use super::types::{Criterion, MatchMode};
use crate::data::error::{FilterError, FilterResult};
use crate::data::schema::{Entity, EntitySchema, SchemaField};
use crate::data::statement::{Emission, Statement};

#[derive(Debug, Clone)]
pub struct FieldFilter<'s> {
    schema: &'s EntitySchema,
    fields: FieldSet<'s>,
    criteria: FxHashMap<&'s str, Criterion>,
    mode: MatchMode,
    emitted: bool,
}

impl<'s> FieldFilter<'s> {
    pub fn new(schema: &'s EntitySchema) -> Self {
        Self {
            schema,
            fields: FieldSet::new(),
            criteria: FxHashMap::default(),
            mode: MatchMode::default(),
            emitted: false,
        }
    }

    pub fn schema(&self) -> &'s EntitySchema {
        self.schema
    }

    pub fn fields(&self) -> &FieldSet<'s> {
        &self.fields
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MatchMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Resolve a logical field name against the bound schema
    pub fn resolve(&self, name: &str) -> FilterResult<&'s SchemaField> {
        self.schema
            .field(name)
            .ok_or_else(|| FilterError::unknown_field(&self.schema.name, name))
    }

    /// Add a field to the set without constraining it
    pub fn add_field(&mut self, name: &str) -> FilterResult<&mut Self> {
        let field = self.resolve(name)?;
        self.fields.add(field);
        Ok(self)
    }

    /// Constrain a field, replacing any criterion it already had
    pub fn set_criterion(&mut self, name: &str, criterion: Criterion) -> FilterResult<&mut Self> {
        let field = self.resolve(name)?;
        self.fields.add(field);
        self.criteria.insert(field.native_name.as_str(), criterion);
        Ok(self)
    }

    pub fn criterion(&self, name: &str) -> Option<&Criterion> {
        let field = self.schema.field(name)?;
        self.criteria.get(field.native_name.as_str())
    }

    /// True when emission would produce at least one predicate
    pub fn has_criteria(&self) -> bool {
        !self.criteria.is_empty()
    }

    pub fn is_emitted(&self) -> bool {
        self.emitted
    }

    /// Check every criterion against its field's kind
    pub(crate) fn validate(&self) -> FilterResult<()> {
        for field in &self.fields {
            if let Some(criterion) = self.criteria.get(field.native_name.as_str()) {
                criterion.check(field)?;
            }
        }
        Ok(())
    }

    /// Default emission, rendered into a buffer instead of the statement
    ///
    /// Returns an empty string when no field is constrained. Callers must
    /// have run [`FieldFilter::validate`] first.
    pub(crate) fn render(&self, emission: &mut Emission<'_, '_>) -> String {
        let predicates: Vec<String> = self
            .fields
            .iter()
            .filter_map(|field| {
                let criterion = self.criteria.get(field.native_name.as_str())?;
                let predicate = criterion.render(field, emission);
                tracing::trace!(field = %field.name, predicate = %predicate, "Rendered predicate");
                Some(predicate)
            })
            .collect();

        let keyword = match self.mode {
            MatchMode::All => emission.dialect().and_keyword(),
            MatchMode::Any => emission.dialect().or_keyword(),
        };
        predicates.join(&format!(" {} ", keyword))
    }
}

impl FieldFilter<'static> {
    /// Bind a filter to the schema of a concrete entity type
    pub fn for_entity<T: Entity>() -> Self {
        Self::new(T::schema())
    }
}

impl AppendConstraints for FieldFilter<'_> {
    fn append_constraints(&mut self, statement: &mut Statement<'_>) -> FilterResult<()> {
        if self.emitted {
            return Err(FilterError::AlreadyEmitted);
        }
        statement.dialect()?;
        self.validate()?;

        let mut emission = statement.begin()?;
        let group = self.render(&mut emission);
        emission.commit(group);

        self.emitted = true;
        Ok(())
    }
}
