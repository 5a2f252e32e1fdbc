//! Namecheap XML API types
//!
//! Namecheap keeps every record of a domain in one flat list of host
//! entries. These types parse the `getHosts`/`setHosts` responses and
//! convert between a slice of that list and [`RecordValues`].

use dnsc_core::{
    CaaValue, Error, MxValue, RecordKey, RecordType, RecordValues, Result, SrvValue, TxtBucket,
};
use serde::Deserialize;

/// Root `<ApiResponse>` element
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "@Status")]
    pub status: String,
    #[serde(rename = "Errors", default)]
    pub errors: Option<ApiErrors>,
    #[serde(rename = "CommandResponse", default)]
    pub command_response: Option<CommandResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrors {
    #[serde(rename = "Error", default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(rename = "@Number", default)]
    pub number: String,
    #[serde(rename = "$text", default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommandResponse {
    #[serde(rename = "DomainDNSGetHostsResult", default)]
    pub get_hosts: Option<GetHostsResult>,
    #[serde(rename = "DomainDNSSetHostsResult", default)]
    pub set_hosts: Option<SetHostsResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetHostsResult {
    #[serde(rename = "host", default)]
    pub hosts: Vec<Host>,
}

#[derive(Debug, Deserialize)]
pub struct SetHostsResult {
    #[serde(rename = "@IsSuccess", default)]
    pub is_success: bool,
}

/// One `<host>` element of a getHosts response
#[derive(Debug, Deserialize)]
pub struct Host {
    #[serde(rename = "@HostId", default)]
    pub host_id: Option<String>,
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@Type")]
    pub record_type: String,
    #[serde(rename = "@Address")]
    pub address: String,
    #[serde(rename = "@MXPref", default)]
    pub mx_pref: Option<u16>,
    #[serde(rename = "@TTL", default)]
    pub ttl: Option<u32>,
}

/// A host entry as read from, or written back to, Namecheap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub host_id: Option<String>,
    pub name: String,
    pub record_type: String,
    pub address: String,
    pub mx_pref: Option<u16>,
    pub ttl: Option<u32>,
}

impl From<Host> for HostEntry {
    fn from(host: Host) -> Self {
        Self {
            host_id: host.host_id,
            name: host.name,
            record_type: host.record_type,
            address: host.address,
            mx_pref: host.mx_pref,
            ttl: host.ttl,
        }
    }
}

impl HostEntry {
    fn new(key: &RecordKey, address: impl Into<String>, ttl: Option<u32>) -> Self {
        Self {
            host_id: None,
            name: key.name.clone(),
            record_type: key.record_type.as_str().to_string(),
            address: address.into(),
            mx_pref: None,
            ttl,
        }
    }

    /// Whether this entry belongs to the record set identified by `key`
    pub fn belongs_to(&self, key: &RecordKey) -> bool {
        self.name.eq_ignore_ascii_case(&key.name)
            && self.record_type.eq_ignore_ascii_case(key.record_type.as_str())
    }

    pub fn is_mx(&self) -> bool {
        self.record_type.eq_ignore_ascii_case("MX")
    }

    /// Same value within one key: address, plus preference for MX
    fn same_value(&self, other: &HostEntry) -> bool {
        self.address.eq_ignore_ascii_case(&other.address)
            && (!self.is_mx() || self.mx_pref == other.mx_pref)
    }
}

/// Carry stored TTLs over to the entries replacing them
///
/// A key reports the TTL of its first entry. While `ttl` still equals that
/// TTL, entries whose value is already stored keep their own TTL and only
/// new entries take `ttl`. A changed `ttl` applies to every entry.
pub fn keep_stored_ttls(stored: &[HostEntry], replacement: &mut [HostEntry], ttl: Option<u32>) {
    let reported = stored.first().and_then(|entry| entry.ttl);
    if ttl != reported {
        return;
    }

    for entry in replacement.iter_mut() {
        if let Some(existing) = stored.iter().find(|s| s.same_value(entry)) {
            entry.ttl = existing.ttl;
        }
    }
}

/// Split a zone into Namecheap's SLD and TLD
///
/// The first label is the SLD and the remainder the TLD, so
/// `example.co.uk` becomes (`example`, `co.uk`).
pub fn split_domain(domain: &str) -> Result<(&str, &str)> {
    let domain = domain.trim_end_matches('.');
    match domain.split_once('.') {
        Some((sld, tld)) if !sld.is_empty() && !tld.is_empty() => Ok((sld, tld)),
        _ => Err(Error::invalid_argument(format!(
            "Domain must have at least two labels: {:?}",
            domain
        ))),
    }
}

/// Build the value collection for `record_type` from its host entries
///
/// Returns `None` when no usable entry exists. Each TXT entry becomes its
/// own bucket.
pub fn entries_to_values(record_type: RecordType, entries: &[&HostEntry]) -> Option<RecordValues> {
    if entries.is_empty() {
        return None;
    }

    let addresses = || entries.iter().map(|e| e.address.clone()).collect::<Vec<_>>();

    let values = match record_type {
        RecordType::A => RecordValues::A(addresses()),
        RecordType::Aaaa => RecordValues::Aaaa(addresses()),
        RecordType::Ns => RecordValues::Ns(addresses()),
        RecordType::Ptr => RecordValues::Ptr(addresses()),
        RecordType::Cname => RecordValues::Cname(entries[0].address.clone()),
        RecordType::Mx => RecordValues::Mx(
            entries
                .iter()
                .map(|e| MxValue {
                    preference: e.mx_pref.unwrap_or(dnsc_core::diff::DEFAULT_MX_PREFERENCE),
                    exchange: e.address.clone(),
                })
                .collect(),
        ),
        RecordType::Txt => RecordValues::Txt(
            entries
                .iter()
                .map(|e| TxtBucket::new([e.address.as_str()]))
                .collect(),
        ),
        RecordType::Caa => {
            RecordValues::Caa(entries.iter().filter_map(|e| parse_caa(&e.address)).collect())
        }
        RecordType::Srv => {
            RecordValues::Srv(entries.iter().filter_map(|e| parse_srv(&e.address)).collect())
        }
        RecordType::Soa => return None,
    };

    if values.is_empty() {
        tracing::warn!("Ignoring unparseable Namecheap {} entries", record_type);
        return None;
    }

    Some(values)
}

/// Build the host entries for a value collection
pub fn values_to_entries(
    key: &RecordKey,
    ttl: Option<u32>,
    values: &RecordValues,
) -> Result<Vec<HostEntry>> {
    let entries = match values {
        RecordValues::A(list)
        | RecordValues::Aaaa(list)
        | RecordValues::Ns(list)
        | RecordValues::Ptr(list) => list
            .iter()
            .map(|address| HostEntry::new(key, address.as_str(), ttl))
            .collect(),
        RecordValues::Cname(target) => vec![HostEntry::new(key, target.as_str(), ttl)],
        RecordValues::Mx(list) => list
            .iter()
            .map(|mx| HostEntry {
                mx_pref: Some(mx.preference),
                ..HostEntry::new(key, mx.exchange.as_str(), ttl)
            })
            .collect(),
        RecordValues::Txt(buckets) => buckets
            .iter()
            .flat_map(|bucket| bucket.values.iter())
            .map(|value| HostEntry::new(key, value.as_str(), ttl))
            .collect(),
        RecordValues::Caa(_) | RecordValues::Soa(_) | RecordValues::Srv(_) => {
            return Err(Error::not_implemented(format!(
                "{} records are not implemented for namecheap",
                values.record_type()
            )));
        }
    };

    Ok(entries)
}

/// `0 issue "letsencrypt.org"` style CAA address
fn parse_caa(address: &str) -> Option<CaaValue> {
    let mut parts = address.splitn(3, char::is_whitespace);
    let flags = parts.next()?.parse().ok()?;
    let tag = parts.next()?.to_string();
    let value = parts.next()?.trim().trim_matches('"').to_string();
    Some(CaaValue { flags, tag, value })
}

/// `priority weight port target` style SRV address
fn parse_srv(address: &str) -> Option<SrvValue> {
    let mut parts = address.split_whitespace();
    let priority = parts.next()?.parse().ok()?;
    let weight = parts.next()?.parse().ok()?;
    let port = parts.next()?.parse().ok()?;
    let target = parts.next()?.to_string();
    Some(SrvValue {
        priority,
        weight,
        port,
        target,
    })
}
