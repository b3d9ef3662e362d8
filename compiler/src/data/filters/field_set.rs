//! Ordered, duplicate-free set of schema field references

use crate::data::schema::SchemaField;

/// Fields that scope a filter, in the order they were added
///
/// Uniqueness is by native name. Emission walks the set in insertion order,
/// which keeps generated SQL deterministic.
#[derive(Debug, Clone, Default)]
pub struct FieldSet<'s> {
    fields: Vec<&'s SchemaField>,
}

impl<'s> FieldSet<'s> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append `field` unless a field with the same native name is present.
    /// Returns whether the set changed.
    pub fn add(&mut self, field: &'s SchemaField) -> bool {
        if self.contains(&field.native_name) {
            return false;
        }
        self.fields.push(field);
        true
    }

    pub fn contains(&self, native_name: &str) -> bool {
        self.fields.iter().any(|f| f.native_name == native_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'s SchemaField> + '_ {
        self.fields.iter().copied()
    }
}

impl<'a, 's> IntoIterator for &'a FieldSet<'s> {
    type Item = &'s SchemaField;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, &'s SchemaField>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter().copied()
    }
}
