//! Record Value Model
//!
//! - [`RecordType`]: the supported record type enumeration
//! - [`RecordSet`] / [`RecordValues`]: provider-agnostic record set content
//! - [`DesiredState`]: caller input for one operation
//! - [`DnsRecord`], [`SetOperation`], [`DeleteOperation`]: operation outputs

pub mod desired;
pub mod output;
pub mod record_type;
pub mod values;

pub use desired::DesiredState;
pub use output::{DeleteOperation, DnsRecord, SetOperation, SetResult};
pub use record_type::RecordType;
pub use values::{
    CaaValue, MxValue, RecordKey, RecordSet, RecordValues, SoaValue, SrvValue, TxtBucket,
};
