//! Parameter naming and bindings

use rustc_hash::FxHashSet;
use serde::Serialize;

use super::value::Value;
use crate::data::error::{FilterError, FilterResult};
use crate::data::schema::FieldKind;

/// Default prefix for generated parameter names
pub const DEFAULT_PARAMETER_PREFIX: &str = "p";

/// Hands out parameter names that are unique within one statement
///
/// Names are the prefix followed by an increasing counter. Names reserved by
/// the caller are skipped, so generated and hand-picked names never collide.
#[derive(Debug)]
pub struct ParameterRegistry {
    prefix: String,
    counter: usize,
    issued: FxHashSet<String>,
}

/// Registry state to restore when an emission is abandoned
#[derive(Debug, Clone, Copy)]
pub(crate) struct RegistryCheckpoint {
    counter: usize,
}

impl ParameterRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
            issued: FxHashSet::default(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Use `prefix` for names allocated from now on
    ///
    /// Names already issued stay claimed and the counter keeps running, so a
    /// later allocation can never repeat an earlier name.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Allocate a name no other caller of this registry has received
    pub fn allocate_unique_name(&mut self) -> String {
        loop {
            self.counter += 1;
            let name = format!("{}{}", self.prefix, self.counter);
            if self.issued.insert(name.clone()) {
                tracing::trace!(name = %name, "Allocated parameter name");
                return name;
            }
        }
    }

    /// Claim a caller-chosen name
    pub fn reserve(&mut self, name: &str) -> FilterResult<()> {
        if !self.issued.insert(name.to_string()) {
            return Err(FilterError::DuplicateParameter {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_issued(&self, name: &str) -> bool {
        self.issued.contains(name)
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    pub(crate) fn checkpoint(&self) -> RegistryCheckpoint {
        RegistryCheckpoint {
            counter: self.counter,
        }
    }

    /// Forget names allocated since `checkpoint`
    pub(crate) fn rollback(&mut self, checkpoint: RegistryCheckpoint, allocated: &[String]) {
        for name in allocated {
            self.issued.remove(name);
        }
        self.counter = checkpoint.counter;
    }
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PARAMETER_PREFIX)
    }
}

/// A bound parameter as seen by a dialect when formatting its marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterName {
    name: String,
    ordinal: usize,
    kind: FieldKind,
}

impl ParameterName {
    pub fn new(name: impl Into<String>, ordinal: usize, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            ordinal,
            kind,
        }
    }

    /// Unique name within the statement
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based position in the statement's parameter list
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// (name, declared kind, value) triple appended to a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterBinding {
    pub name: String,
    pub kind: FieldKind,
    pub value: Value,
}
