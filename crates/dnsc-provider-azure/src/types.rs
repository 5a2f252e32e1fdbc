//! Azure DNS REST types
//!
//! Azure stores each record type in its own typed field of the record set
//! `properties` object. These types mirror that shape and convert to and
//! from the provider-agnostic [`RecordValues`].

use dnsc_core::{
    CaaValue, MxValue, RecordSet, RecordType, RecordValues, SoaValue, SrvValue, TxtBucket,
};
use serde::{Deserialize, Serialize};

/// Azure record set (request and response body)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AzureRecordSet {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing)]
    pub etag: Option<String>,
    pub properties: RecordSetProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSetProperties {
    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    #[serde(rename = "ARecords", default, skip_serializing_if = "Vec::is_empty")]
    pub a_records: Vec<ARecord>,

    #[serde(rename = "AAAARecords", default, skip_serializing_if = "Vec::is_empty")]
    pub aaaa_records: Vec<AaaaRecord>,

    #[serde(rename = "caaRecords", default, skip_serializing_if = "Vec::is_empty")]
    pub caa_records: Vec<CaaRecord>,

    #[serde(rename = "CNAMERecord", default, skip_serializing_if = "Option::is_none")]
    pub cname_record: Option<CnameRecord>,

    #[serde(rename = "MXRecords", default, skip_serializing_if = "Vec::is_empty")]
    pub mx_records: Vec<MxRecord>,

    #[serde(rename = "NSRecords", default, skip_serializing_if = "Vec::is_empty")]
    pub ns_records: Vec<NsRecord>,

    #[serde(rename = "PTRRecords", default, skip_serializing_if = "Vec::is_empty")]
    pub ptr_records: Vec<PtrRecord>,

    #[serde(rename = "SOARecord", default, skip_serializing_if = "Option::is_none")]
    pub soa_record: Option<SoaRecord>,

    #[serde(rename = "SRVRecords", default, skip_serializing_if = "Vec::is_empty")]
    pub srv_records: Vec<SrvRecord>,

    #[serde(rename = "TXTRecords", default, skip_serializing_if = "Vec::is_empty")]
    pub txt_records: Vec<TxtRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ARecord {
    pub ipv4_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AaaaRecord {
    pub ipv6_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaaRecord {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CnameRecord {
    pub cname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsRecord {
    pub nsdname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtrRecord {
    pub ptrdname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoaRecord {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub serial_number: u64,
    #[serde(default)]
    pub refresh_time: u64,
    #[serde(default)]
    pub retry_time: u64,
    #[serde(default)]
    pub expire_time: u64,
    #[serde(rename = "minimumTTL", default)]
    pub minimum_ttl: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// One TXT sub-record; Azure may split a name's TXT values across several
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxtRecord {
    #[serde(default)]
    pub value: Vec<String>,
}

/// OAuth2 token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Resource manager error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl AzureRecordSet {
    /// Build the request body for `record_set`
    pub fn from_record_set(record_set: &RecordSet) -> Self {
        Self {
            id: None,
            etag: None,
            properties: RecordSetProperties::from_values(record_set.ttl, &record_set.values),
        }
    }

    /// Translate a response body for a record set of `record_type`
    pub fn into_record_set(self, record_type: RecordType) -> RecordSet {
        RecordSet {
            id: self.id,
            version: self.etag,
            ttl: self.properties.ttl,
            values: self.properties.into_values(record_type),
        }
    }
}

impl RecordSetProperties {
    pub fn from_values(ttl: Option<u32>, values: &RecordValues) -> Self {
        let mut properties = Self {
            ttl,
            ..Self::default()
        };

        match values {
            RecordValues::A(list) => {
                properties.a_records = list
                    .iter()
                    .map(|ip| ARecord {
                        ipv4_address: ip.clone(),
                    })
                    .collect();
            }
            RecordValues::Aaaa(list) => {
                properties.aaaa_records = list
                    .iter()
                    .map(|ip| AaaaRecord {
                        ipv6_address: ip.clone(),
                    })
                    .collect();
            }
            RecordValues::Caa(list) => {
                properties.caa_records = list
                    .iter()
                    .map(|caa| CaaRecord {
                        flags: caa.flags,
                        tag: caa.tag.clone(),
                        value: caa.value.clone(),
                    })
                    .collect();
            }
            RecordValues::Cname(cname) => {
                properties.cname_record = Some(CnameRecord {
                    cname: cname.clone(),
                });
            }
            RecordValues::Mx(list) => {
                properties.mx_records = list
                    .iter()
                    .map(|mx| MxRecord {
                        preference: mx.preference,
                        exchange: mx.exchange.clone(),
                    })
                    .collect();
            }
            RecordValues::Ns(list) => {
                properties.ns_records = list
                    .iter()
                    .map(|ns| NsRecord {
                        nsdname: ns.clone(),
                    })
                    .collect();
            }
            RecordValues::Ptr(list) => {
                properties.ptr_records = list
                    .iter()
                    .map(|ptr| PtrRecord {
                        ptrdname: ptr.clone(),
                    })
                    .collect();
            }
            RecordValues::Soa(soa) => {
                properties.soa_record = Some(SoaRecord {
                    host: soa.host.clone(),
                    email: soa.email.clone(),
                    serial_number: soa.serial_number,
                    refresh_time: soa.refresh_time,
                    retry_time: soa.retry_time,
                    expire_time: soa.expire_time,
                    minimum_ttl: soa.minimum_ttl,
                });
            }
            RecordValues::Srv(list) => {
                properties.srv_records = list
                    .iter()
                    .map(|srv| SrvRecord {
                        priority: srv.priority,
                        weight: srv.weight,
                        port: srv.port,
                        target: srv.target.clone(),
                    })
                    .collect();
            }
            RecordValues::Txt(buckets) => {
                properties.txt_records = buckets
                    .iter()
                    .map(|bucket| TxtRecord {
                        value: bucket.values.clone(),
                    })
                    .collect();
            }
        }

        properties
    }

    /// Read the typed field belonging to `record_type`; other fields are ignored
    pub fn into_values(self, record_type: RecordType) -> RecordValues {
        match record_type {
            RecordType::A => {
                RecordValues::A(self.a_records.into_iter().map(|r| r.ipv4_address).collect())
            }
            RecordType::Aaaa => RecordValues::Aaaa(
                self.aaaa_records
                    .into_iter()
                    .map(|r| r.ipv6_address)
                    .collect(),
            ),
            RecordType::Caa => RecordValues::Caa(
                self.caa_records
                    .into_iter()
                    .map(|r| CaaValue {
                        flags: r.flags,
                        tag: r.tag,
                        value: r.value,
                    })
                    .collect(),
            ),
            RecordType::Cname => {
                RecordValues::Cname(self.cname_record.map(|r| r.cname).unwrap_or_default())
            }
            RecordType::Mx => RecordValues::Mx(
                self.mx_records
                    .into_iter()
                    .map(|r| MxValue {
                        preference: r.preference,
                        exchange: r.exchange,
                    })
                    .collect(),
            ),
            RecordType::Ns => {
                RecordValues::Ns(self.ns_records.into_iter().map(|r| r.nsdname).collect())
            }
            RecordType::Ptr => {
                RecordValues::Ptr(self.ptr_records.into_iter().map(|r| r.ptrdname).collect())
            }
            RecordType::Soa => RecordValues::Soa(
                self.soa_record
                    .map(|r| SoaValue {
                        host: r.host,
                        email: r.email,
                        serial_number: r.serial_number,
                        refresh_time: r.refresh_time,
                        retry_time: r.retry_time,
                        expire_time: r.expire_time,
                        minimum_ttl: r.minimum_ttl,
                    })
                    .unwrap_or_default(),
            ),
            RecordType::Srv => RecordValues::Srv(
                self.srv_records
                    .into_iter()
                    .map(|r| SrvValue {
                        priority: r.priority,
                        weight: r.weight,
                        port: r.port,
                        target: r.target,
                    })
                    .collect(),
            ),
            RecordType::Txt => RecordValues::Txt(
                self.txt_records
                    .into_iter()
                    .map(|r| TxtBucket { values: r.value })
                    .collect(),
            ),
        }
    }
}
