//! Table schemas
//!
//! A schema lists the fields callers may update, their value kind, and
//! whether they may be removed. Requests are checked against it before any
//! store call, so a rejected request never reaches the store.

use crate::error::{Error, Result};
use crate::types::{FieldName, TableName};
use crate::update::{FieldUpdate, UpdateRequest};
use crate::value::Value;
use std::collections::BTreeMap;

/// Kind of value a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any value
    Any,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::String`
    String,
    /// `Value::Bytes`
    Bytes,
    /// `Value::Array`
    Array,
    /// `Value::Object`
    Object,
}

impl FieldKind {
    /// Check a value against this kind. No coercion: `Int` does not satisfy `Float`.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldKind::Any, _)
                | (FieldKind::Bool, Value::Bool(_))
                | (FieldKind::Int, Value::Int(_))
                | (FieldKind::Float, Value::Float(_))
                | (FieldKind::String, Value::String(_))
                | (FieldKind::Bytes, Value::Bytes(_))
                | (FieldKind::Array, Value::Array(_))
                | (FieldKind::Object, Value::Object(_))
        )
    }
}

/// Constraints on one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Accepted value kind
    pub kind: FieldKind,
    /// Whether `Remove` is allowed
    pub removable: bool,
}

impl FieldSpec {
    /// Optional field of the given kind
    pub fn optional(kind: FieldKind) -> Self {
        Self {
            kind,
            removable: true,
        }
    }

    /// Field of the given kind that can be overwritten but never removed
    pub fn required(kind: FieldKind) -> Self {
        Self {
            kind,
            removable: false,
        }
    }
}

/// Schema of a table's updatable fields
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: TableName,
    fields: BTreeMap<FieldName, FieldSpec>,
    open: bool,
}

impl TableSchema {
    /// Closed schema with no fields yet
    pub fn new(name: TableName) -> Self {
        Self {
            name,
            fields: BTreeMap::new(),
            open: false,
        }
    }

    /// Open schema: any field name is accepted with [`FieldSpec::optional`]`(Any)`
    /// unless declared otherwise
    pub fn open(name: TableName) -> Self {
        Self {
            name,
            fields: BTreeMap::new(),
            open: true,
        }
    }

    /// Declare a field
    pub fn field(mut self, name: &str, spec: FieldSpec) -> Result<Self> {
        self.fields.insert(FieldName::new(name)?, spec);
        Ok(self)
    }

    /// Table this schema describes
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Whether undeclared fields are accepted
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Spec for a field, if it may be written
    pub fn spec(&self, field: &FieldName) -> Option<FieldSpec> {
        match self.fields.get(field) {
            Some(spec) => Some(*spec),
            None if self.open => Some(FieldSpec::optional(FieldKind::Any)),
            None => None,
        }
    }

    /// Check one instruction
    pub fn check(&self, field: &FieldName, update: &FieldUpdate) -> Result<()> {
        let spec = self.spec(field).ok_or_else(|| {
            Error::invalid(format!(
                "field '{}' is not updatable in table '{}'",
                field, self.name
            ))
        })?;
        match update {
            u if u.is_remove() => {
                if spec.removable {
                    Ok(())
                } else {
                    Err(Error::invalid(format!("field '{}' cannot be removed", field)))
                }
            }
            FieldUpdate::Set(value) if !spec.kind.accepts(value) => Err(Error::invalid(format!(
                "field '{}' expects {:?}, got {}",
                field,
                spec.kind,
                value.type_name()
            ))),
            _ => Ok(()),
        }
    }

    /// Check every instruction of a request
    pub fn validate(&self, request: &UpdateRequest) -> Result<()> {
        request
            .updates
            .iter()
            .try_for_each(|(field, update)| self.check(field, update))
    }

    /// Check the initial fields of a new record
    ///
    /// Every declared non-removable field must be present.
    pub fn validate_new(&self, fields: &BTreeMap<FieldName, Value>) -> Result<()> {
        for (field, value) in fields {
            self.check(field, &FieldUpdate::Set(value.clone()))?;
        }
        for (field, spec) in &self.fields {
            if !spec.removable && !fields.contains_key(field) {
                return Err(Error::invalid(format!("required field '{}' is missing", field)));
            }
        }
        Ok(())
    }
}
