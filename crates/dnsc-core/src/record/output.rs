use serde::{Deserialize, Serialize};
use std::fmt;

use super::{RecordKey, RecordSet, RecordType};

/// Presentation form of a record set
///
/// Produced by translating a [`RecordSet`] after an operation; never
/// persisted. Structured values are flattened to strings (see
/// [`super::RecordValues::flatten`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub id: Option<String>,
    pub domain: String,
    pub name: String,
    pub record_type: RecordType,
    pub ttl: Option<String>,
    pub values: Vec<String>,
}

impl DnsRecord {
    /// Translate a record set fetched for (or written to) `key`
    pub fn from_record_set(key: &RecordKey, record_set: &RecordSet) -> Self {
        Self {
            id: record_set.id.clone(),
            domain: key.domain.clone(),
            name: key.name.clone(),
            record_type: key.record_type,
            ttl: record_set.ttl.map(|ttl| ttl.to_string()),
            values: record_set.values.flatten(),
        }
    }

    /// Pretty-printed JSON rendering
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id.as_deref().unwrap_or_default())?;
        writeln!(f, "Domain: {}", self.domain)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "RecordType: {}", self.record_type)?;
        writeln!(f, "TTL: {}", self.ttl.as_deref().unwrap_or_default())?;
        write!(f, "Values: ")?;

        match self.values.as_slice() {
            [] => Ok(()),
            [single] => write!(f, "{single}"),
            many => {
                for value in many {
                    write!(f, "\n{value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of a set operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOperation {
    /// The record set did not exist and was created
    Created,
    /// The record set existed and was changed
    Updated,
    /// Nothing to do; no provider mutation happened
    Noop,
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOperation::Created => f.write_str("Created"),
            SetOperation::Updated => f.write_str("Updated"),
            SetOperation::Noop => f.write_str("Noop"),
        }
    }
}

/// Outcome of a delete operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteOperation {
    /// A value or the whole record set was removed
    Deleted,
    /// Nothing matched; no provider mutation happened
    Noop,
}

impl fmt::Display for DeleteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOperation::Deleted => f.write_str("Deleted"),
            DeleteOperation::Noop => f.write_str("Noop"),
        }
    }
}

/// Post-mutation record paired with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetResult {
    pub dns_record: DnsRecord,
    pub set_operation: SetOperation,
}
