//! Free-text search filter
//!
//! Replaces the default per-field comparisons with one full-text predicate per
//! searchable field, all matching the same bound search string. Ordinary
//! criteria configured on the embedded base filter still apply: when present,
//! the result is `(<base>) AND (<search group>)`.

use super::AppendConstraints;
use super::field_filter::FieldFilter;
use super::field_set::FieldSet;
use crate::data::error::{FilterError, FilterResult};
use crate::data::schema::{Entity, EntitySchema, FieldKind};
use crate::data::statement::{Statement, Value};

#[derive(Debug, Clone)]
pub struct FreeTextFilter<'s> {
    base: FieldFilter<'s>,
    search_fields: FieldSet<'s>,
    terms: Option<String>,
    emitted: bool,
}

impl<'s> FreeTextFilter<'s> {
    pub fn new(schema: &'s EntitySchema) -> Self {
        Self {
            base: FieldFilter::new(schema),
            search_fields: FieldSet::new(),
            terms: None,
            emitted: false,
        }
    }

    pub fn schema(&self) -> &'s EntitySchema {
        self.base.schema()
    }

    /// Ordinary criteria combined with the search group
    pub fn base(&self) -> &FieldFilter<'s> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut FieldFilter<'s> {
        &mut self.base
    }

    pub fn terms(&self) -> Option<&str> {
        self.terms.as_deref()
    }

    pub fn set_terms(&mut self, terms: impl Into<String>) -> &mut Self {
        self.terms = Some(terms.into());
        self
    }

    pub fn search_fields(&self) -> &FieldSet<'s> {
        &self.search_fields
    }

    pub fn is_emitted(&self) -> bool {
        self.emitted
    }

    /// Add a textual field to search
    pub fn add_field(&mut self, name: &str) -> FilterResult<&mut Self> {
        let field = self.base.resolve(name)?;
        if !field.kind.is_textual() {
            return Err(FilterError::unsupported_kind(
                &field.name,
                field.kind,
                "free-text search",
            ));
        }
        self.search_fields.add(field);
        Ok(self)
    }

    /// Add every textual field of the bound schema
    ///
    /// Fields already present are kept where they are, so calling this more
    /// than once changes nothing.
    pub fn add_all_text_fields(&mut self) -> &mut Self {
        let schema = self.base.schema();
        for field in schema.text_fields() {
            self.search_fields.add(field);
        }
        self
    }
}

impl FreeTextFilter<'static> {
    /// Bind a filter to the schema of a concrete entity type
    pub fn for_entity<T: Entity>() -> Self {
        Self::new(T::schema())
    }
}

impl AppendConstraints for FreeTextFilter<'_> {
    fn append_constraints(&mut self, statement: &mut Statement<'_>) -> FilterResult<()> {
        if self.emitted {
            return Err(FilterError::AlreadyEmitted);
        }
        let terms = match self.terms.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(FilterError::MissingSearchTerms),
        };
        let dialect = statement.dialect()?;
        if self.search_fields.is_empty() {
            return Err(FilterError::NoSearchableFields);
        }
        self.base.validate()?;
        if !dialect.native_free_text() {
            tracing::warn!(
                dialect = dialect.name(),
                "Dialect has no built-in full-text predicate, FREETEXT must be user-defined"
            );
        }

        let mut emission = statement.begin()?;
        let base = self.base.render(&mut emission);

        // One value, shared by every per-field predicate
        let marker = emission.bind(FieldKind::Text, Value::Text(terms.to_string()));
        let predicates: Vec<String> = self
            .search_fields
            .iter()
            .map(|field| {
                let col = dialect.format_native_name(&field.native_name);
                dialect.free_text_predicate(&col, &marker)
            })
            .collect();
        let group = predicates.join(&format!(" {} ", dialect.or_keyword()));

        let fragment = if base.is_empty() {
            group
        } else {
            format!("({}) {} ({})", base, dialect.and_keyword(), group)
        };
        tracing::debug!(
            fields = self.search_fields.len(),
            merged = !base.is_empty(),
            "Free-text constraints built"
        );
        emission.commit(fragment);

        self.emitted = true;
        Ok(())
    }
}
