//! Partial update requests and the conditional-update primitive
//!
//! An [`UpdateRequest`] is what a caller submits: a record id, the version the
//! caller last read, and a sparse map of field instructions. A
//! [`ConditionalUpdate`] is what a store executes: the same instructions split
//! into `set` and `remove`, scoped to a table, with the version increment
//! implied.
//!
//! ## Field semantics
//!
//! | Request entry | Effect |
//! |---------------|--------|
//! | `Set(value)` | field created or overwritten |
//! | `Remove` | field removed (no-op if absent) |
//! | not mentioned | field untouched |
//!
//! Falsy values (`0`, `""`, `false`) are ordinary `Set` values. Only the
//! explicit `Remove` instruction removes; a top-level `Value::Null` handed to
//! [`UpdateRequestBuilder::set`] is normalized to `Remove`.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::types::{now_millis, FieldName, RecordId, TableName, Version};
use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Instruction for a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Create or overwrite the field
    Set(Value),
    /// Remove the field
    Remove,
}

impl FieldUpdate {
    /// Build an instruction from an optional value; `None` and `Null` remove
    pub fn from_nullable(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldUpdate::Remove,
            Some(v) => FieldUpdate::Set(v),
        }
    }

    /// Check whether this instruction removes the field
    ///
    /// `Set(Null)` removes too, however the instruction was built.
    pub fn is_remove(&self) -> bool {
        matches!(self, FieldUpdate::Remove | FieldUpdate::Set(Value::Null))
    }
}

/// A caller's partial update, guarded by the version it last read
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    /// Record to update
    pub id: RecordId,
    /// Version the caller expects the record to be at
    pub expected_version: Version,
    /// Field instructions; fields not present are left unchanged
    pub updates: BTreeMap<FieldName, FieldUpdate>,
}

impl UpdateRequest {
    /// Create a request with no field instructions
    ///
    /// Applying it still bumps the version.
    pub fn new(id: RecordId, expected_version: Version) -> Self {
        Self {
            id,
            expected_version,
            updates: BTreeMap::new(),
        }
    }

    /// Start building a request from raw strings
    ///
    /// # Example
    ///
    /// ```
    /// use roster_core::{UpdateRequest, Value};
    ///
    /// let request = UpdateRequest::builder("p1", 3)
    ///     .set("title", "B")
    ///     .remove("draft")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.updates.len(), 2);
    /// ```
    pub fn builder(id: impl Into<String>, expected_version: u64) -> UpdateRequestBuilder {
        UpdateRequestBuilder::new(id, expected_version)
    }

    /// Add or replace an instruction for a field
    pub fn with_update(mut self, field: FieldName, update: FieldUpdate) -> Self {
        let update = match update {
            FieldUpdate::Set(Value::Null) => FieldUpdate::Remove,
            other => other,
        };
        self.updates.insert(field, update);
        self
    }

    /// Split into the store primitive's arguments for `table`
    pub fn into_conditional(self, table: TableName) -> ConditionalUpdate {
        let mut set = BTreeMap::new();
        let mut remove = BTreeSet::new();
        for (field, update) in self.updates {
            match update {
                FieldUpdate::Set(Value::Null) | FieldUpdate::Remove => {
                    remove.insert(field);
                }
                FieldUpdate::Set(value) => {
                    set.insert(field, value);
                }
            }
        }
        ConditionalUpdate {
            table,
            id: self.id,
            expected_version: self.expected_version,
            set,
            remove,
        }
    }
}

/// Builder for [`UpdateRequest`] that defers validation to [`build`](Self::build)
///
/// Later instructions for the same field replace earlier ones.
#[derive(Debug, Clone)]
pub struct UpdateRequestBuilder {
    id: String,
    expected_version: u64,
    updates: Vec<(String, FieldUpdate)>,
}

impl UpdateRequestBuilder {
    /// Create a builder
    pub fn new(id: impl Into<String>, expected_version: u64) -> Self {
        Self {
            id: id.into(),
            expected_version,
            updates: Vec::new(),
        }
    }

    /// Set a field to a value
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.updates
            .push((field.into(), FieldUpdate::from_nullable(Some(value.into()))));
        self
    }

    /// Remove a field
    pub fn remove(mut self, field: impl Into<String>) -> Self {
        self.updates.push((field.into(), FieldUpdate::Remove));
        self
    }

    /// Add a prepared instruction
    pub fn update(mut self, field: impl Into<String>, update: FieldUpdate) -> Self {
        self.updates.push((field.into(), update));
        self
    }

    /// Validate ids, field names and the expected version
    pub fn build(self) -> Result<UpdateRequest> {
        let id = RecordId::new(self.id)?;
        let expected_version = Version::new(self.expected_version);
        if !expected_version.is_valid() {
            return Err(Error::invalid("expectedVersion must be a positive integer"));
        }
        let mut request = UpdateRequest::new(id, expected_version);
        for (field, update) in self.updates {
            request = request.with_update(FieldName::new(field)?, update);
        }
        Ok(request)
    }
}

/// Arguments of the store's atomic conditional-write primitive
///
/// Semantics: if the record `table/id` exists and its version equals
/// `expected_version`, apply `set`, apply `remove`, and increment the version
/// by one, all as a single atomic step. Otherwise change nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalUpdate {
    /// Table holding the record
    pub table: TableName,
    /// Record key
    pub id: RecordId,
    /// Condition: `stored.version == expected_version`
    pub expected_version: Version,
    /// Fields to create or overwrite
    pub set: BTreeMap<FieldName, Value>,
    /// Fields to remove
    pub remove: BTreeSet<FieldName>,
}

impl ConditionalUpdate {
    /// Evaluate the condition against `current` and compute the post-image
    ///
    /// Pure: `current` is not modified. Stores call this while holding the
    /// record's write guard and publish the returned record only on `Ok`.
    pub fn apply_to(&self, current: &Record) -> Result<Record> {
        if current.version != self.expected_version {
            return Err(Error::Conflict {
                id: self.id.clone(),
                expected: self.expected_version,
                actual: current.version,
            });
        }

        let mut next = current.clone();
        for (field, value) in &self.set {
            if value.is_null() {
                next.fields.remove(field);
            } else {
                next.fields.insert(field.clone(), value.clone());
            }
        }
        for field in &self.remove {
            next.fields.remove(field);
        }
        next.version = current.version.next()?;
        next.updated_at = now_millis();
        Ok(next)
    }

    /// Error for a missing target record
    pub fn not_found(&self) -> Error {
        Error::NotFound {
            table: self.table.clone(),
            id: self.id.clone(),
        }
    }
}
