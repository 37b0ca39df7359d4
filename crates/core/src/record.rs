//! Stored record type
//!
//! A record is an ordered map of fields plus the two store-managed fields,
//! `id` and `version`. The store-managed fields live outside the map, so the
//! map can never shadow them.

use crate::types::{now_millis, FieldName, RecordId, Timestamp, Version};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Immutable identifier
    pub id: RecordId,
    /// Concurrency token, 1 at creation
    pub version: Version,
    /// User fields
    pub fields: BTreeMap<FieldName, Value>,
    /// Last write time (milliseconds since epoch)
    pub updated_at: Timestamp,
}

impl Record {
    /// Create a record at [`Version::INITIAL`]
    pub fn new(id: RecordId, fields: BTreeMap<FieldName, Value>) -> Self {
        Self {
            id,
            version: Version::INITIAL,
            fields,
            updated_at: now_millis(),
        }
    }

    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Check whether a field is present
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Number of user fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no user fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_at_initial_version() {
        let record = Record::new(RecordId::new("p1").unwrap(), BTreeMap::new());
        assert_eq!(record.version, Version::INITIAL);
        assert!(record.is_empty());
        assert!(record.updated_at > 0);
    }

    #[test]
    fn test_field_lookup() {
        let mut fields = BTreeMap::new();
        fields.insert(FieldName::new("title").unwrap(), Value::from("A"));
        let record = Record::new(RecordId::new("p1").unwrap(), fields);

        assert_eq!(record.get("title"), Some(&Value::from("A")));
        assert!(record.contains("title"));
        assert!(!record.contains("draft"));
        assert_eq!(record.len(), 1);
    }
}
