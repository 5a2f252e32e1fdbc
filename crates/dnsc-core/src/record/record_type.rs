use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// DNS record type
///
/// Parsing is case-insensitive (`"cname"`, `"CNAME"` and `"CName"` are all
/// accepted); anything outside the enumeration is an
/// [`Error::InvalidArgument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Certificate Authority Authorization
    Caa,
    /// Canonical name (alias)
    Cname,
    /// Mail exchange
    Mx,
    /// Name server
    Ns,
    /// Pointer (reverse lookup)
    Ptr,
    /// Start of authority
    Soa,
    /// Service locator
    Srv,
    /// Text
    Txt,
}

impl RecordType {
    /// All known record types, in display order
    pub const ALL: [RecordType; 10] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Soa,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// Canonical upper-case mnemonic
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RecordType::ALL
            .into_iter()
            .find(|rt| rt.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "Unknown record type '{}'. Valid types: A, AAAA, CAA, CNAME, MX, NS, PTR, SOA, SRV, TXT",
                    s
                ))
            })
    }
}
