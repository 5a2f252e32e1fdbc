// # Record Value Model
//
// Provider-agnostic representation of a record set's content. Every adapter
// translates its native shape into these types, and the engine reasons only
// about them.
//
// Element shape by record type:
//
// - CNAME: exactly one scalar
// - A, AAAA, NS, PTR: a set of scalars (order is irrelevant)
// - MX, SRV, CAA: a set of tuples
// - SOA: a single structured value
// - TXT: a set of buckets, each holding a set of strings

use serde::{Deserialize, Serialize};

use super::RecordType;

/// MX tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxValue {
    /// Lower is preferred
    pub preference: u16,
    /// Mail server host name
    pub exchange: String,
}

/// SRV tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvValue {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// CAA tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaValue {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

/// SOA content
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SoaValue {
    pub host: String,
    pub email: String,
    pub serial_number: u64,
    pub refresh_time: u64,
    pub retry_time: u64,
    pub expire_time: u64,
    pub minimum_ttl: u64,
}

/// One sub-record of a TXT record set
///
/// Providers may spread the TXT values of a single name over several
/// buckets. Comparisons look at the union of all buckets; removals prune at
/// bucket granularity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxtBucket {
    pub values: Vec<String>,
}

impl TxtBucket {
    /// Create a bucket from any iterable of strings
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Type-specific value collection of a record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "UPPERCASE")]
pub enum RecordValues {
    A(Vec<String>),
    Aaaa(Vec<String>),
    Caa(Vec<CaaValue>),
    Cname(String),
    Mx(Vec<MxValue>),
    Ns(Vec<String>),
    Ptr(Vec<String>),
    Soa(SoaValue),
    Srv(Vec<SrvValue>),
    Txt(Vec<TxtBucket>),
}

impl RecordValues {
    /// The record type these values belong to
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordValues::A(_) => RecordType::A,
            RecordValues::Aaaa(_) => RecordType::Aaaa,
            RecordValues::Caa(_) => RecordType::Caa,
            RecordValues::Cname(_) => RecordType::Cname,
            RecordValues::Mx(_) => RecordType::Mx,
            RecordValues::Ns(_) => RecordType::Ns,
            RecordValues::Ptr(_) => RecordType::Ptr,
            RecordValues::Soa(_) => RecordType::Soa,
            RecordValues::Srv(_) => RecordType::Srv,
            RecordValues::Txt(_) => RecordType::Txt,
        }
    }

    /// Number of values held, counting TXT values across all buckets
    pub fn len(&self) -> usize {
        match self {
            RecordValues::A(v)
            | RecordValues::Aaaa(v)
            | RecordValues::Ns(v)
            | RecordValues::Ptr(v) => v.len(),
            RecordValues::Caa(v) => v.len(),
            RecordValues::Cname(c) => usize::from(!c.is_empty()),
            RecordValues::Mx(v) => v.len(),
            RecordValues::Soa(s) => usize::from(*s != SoaValue::default()),
            RecordValues::Srv(v) => v.len(),
            RecordValues::Txt(buckets) => buckets.iter().map(|b| b.values.len()).sum(),
        }
    }

    /// Whether no value remains
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into display strings
    ///
    /// - A/AAAA/NS/PTR: the literals
    /// - CAA: `"{flags} {tag} {value}"`
    /// - CNAME: single-element list
    /// - MX: `"{preference} {exchange}"`
    /// - SOA: `"{host} {email} {serial} {refresh} {retry} {expire} {minimum_ttl}"`
    /// - SRV: `"{priority} {weight} {port} {target}"`
    /// - TXT: union of all bucket values, bucket order preserved
    pub fn flatten(&self) -> Vec<String> {
        match self {
            RecordValues::A(v)
            | RecordValues::Aaaa(v)
            | RecordValues::Ns(v)
            | RecordValues::Ptr(v) => v.clone(),
            RecordValues::Caa(v) => v
                .iter()
                .map(|c| format!("{} {} {}", c.flags, c.tag, c.value))
                .collect(),
            RecordValues::Cname(c) => vec![c.clone()],
            RecordValues::Mx(v) => v
                .iter()
                .map(|m| format!("{} {}", m.preference, m.exchange))
                .collect(),
            RecordValues::Soa(s) => vec![format!(
                "{} {} {} {} {} {} {}",
                s.host,
                s.email,
                s.serial_number,
                s.refresh_time,
                s.retry_time,
                s.expire_time,
                s.minimum_ttl
            )],
            RecordValues::Srv(v) => v
                .iter()
                .map(|s| format!("{} {} {} {}", s.priority, s.weight, s.port, s.target))
                .collect(),
            RecordValues::Txt(buckets) => buckets
                .iter()
                .flat_map(|b| b.values.iter().cloned())
                .collect(),
        }
    }
}

/// The complete provider-side state for one (domain, name, type) key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Provider-assigned identifier, present only once persisted
    pub id: Option<String>,
    /// Optimistic-concurrency token handed out by the provider (e.g. an ETag)
    pub version: Option<String>,
    /// Time-to-live in seconds; `None` means the provider has not set one
    pub ttl: Option<u32>,
    /// Full current value collection
    pub values: RecordValues,
}

impl RecordSet {
    /// Create an unpersisted record set
    pub fn new(ttl: Option<u32>, values: RecordValues) -> Self {
        Self {
            id: None,
            version: None,
            ttl,
            values,
        }
    }

    /// Attach a provider identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach a provider concurrency token
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Record type of this set
    pub fn record_type(&self) -> RecordType {
        self.values.record_type()
    }
}

/// Zone context identifying one record set at a provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Zone the record lives in (e.g. "example.com")
    pub domain: String,
    /// Record name within the zone (e.g. "www" or "@")
    pub name: String,
    /// Record type
    pub record_type: RecordType,
}

impl RecordKey {
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        record_type: RecordType,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            record_type,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} record {} in {}", self.record_type, self.name, self.domain)
    }
}
