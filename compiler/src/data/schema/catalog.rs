//! Entity catalog
//!
//! A named collection of entity schemas, loaded from JSON:
//!
//! ```json
//! {"entities": [{"name": "Widget", "native_name": "widgets",
//!   "fields": [{"name": "Name", "native_name": "name", "kind": "text"}]}]}
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::types::EntitySchema;
use crate::data::error::{FilterError, FilterResult};

#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    entities: Vec<EntitySchema>,
}

impl Catalog {
    pub fn new(entities: Vec<EntitySchema>) -> Self {
        Self { entities }
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json).context("Failed to parse schema catalog")?;
        catalog.check_unique()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading schema catalog");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        let catalog = Self::from_json(&content)
            .with_context(|| format!("Invalid schema file: {}", path.display()))?;
        tracing::debug!(entities = catalog.entities.len(), "Schema catalog loaded");
        Ok(catalog)
    }

    /// Resolve an entity schema by logical name
    pub fn entity(&self, name: &str) -> FilterResult<&EntitySchema> {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| FilterError::missing_schema(name))
    }

    pub fn entities(&self) -> &[EntitySchema] {
        &self.entities
    }

    fn check_unique(&self) -> Result<()> {
        for (i, entity) in self.entities.iter().enumerate() {
            if self.entities[..i].iter().any(|e| e.name == entity.name) {
                anyhow::bail!("Entity '{}' is declared more than once", entity.name);
            }
        }
        Ok(())
    }
}
