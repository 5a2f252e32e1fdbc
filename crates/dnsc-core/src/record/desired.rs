use serde::{Deserialize, Serialize};

use super::{RecordKey, RecordType};
use crate::error::Result;

/// Caller-supplied target attributes for one operation
///
/// `record_type` is kept exactly as the caller wrote it; the engine parses
/// it (case-insensitively) and rejects unknown types with
/// [`crate::Error::InvalidArgument`].
///
/// `priority`, `weight` and `port` only matter for MX and SRV records and are
/// ignored for every other type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredState {
    pub domain: String,
    pub name: String,
    pub record_type: String,
    pub value: Option<String>,
    pub ttl: Option<u32>,
    pub priority: Option<u16>,
    pub weight: Option<u16>,
    pub port: Option<u16>,
}

impl DesiredState {
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            record_type: record_type.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Parse the record type and build the zone context
    pub fn key(&self) -> Result<RecordKey> {
        let record_type: RecordType = self.record_type.parse()?;
        Ok(RecordKey::new(&self.domain, &self.name, record_type))
    }
}
