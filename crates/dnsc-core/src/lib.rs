// # dnsc-core
//
// Core library for provider-agnostic DNS record reconciliation.
//
// ## Architecture Overview
//
// This library turns "make this record look like X" requests into the
// minimal set of provider calls:
// - **RecordAdapter**: Trait for reading and writing record sets at one provider
// - **RecordEngine**: Get / Set / Delete with idempotent, minimal writes
// - **Record model**: Provider-agnostic record sets, including TXT buckets
// - **TtlPolicy**: When a TTL is written vs. preserved
// - **ProviderRegistry**: Plugin-based registry for provider adapters
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Diff logic is written once against the
//    record model, never against a provider's wire shape
// 2. **Minimal Writes**: A redundant set never reaches the network
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Explicit Configuration**: Nothing is read from ambient global state

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod record;
pub mod registry;
pub mod traits;
pub mod ttl;

// Re-export core types for convenience
pub use config::{
    AzureCloud, AzureConfig, DnscConfig, EngineConfig, FetchFailurePolicy, NamecheapConfig,
    ProviderConfig,
};
pub use diff::ValueComparison;
pub use engine::RecordEngine;
pub use error::{Error, Result};
pub use record::{
    CaaValue, DeleteOperation, DesiredState, DnsRecord, MxValue, RecordKey, RecordSet,
    RecordType, RecordValues, SetOperation, SetResult, SoaValue, SrvValue, TxtBucket,
};
pub use registry::ProviderRegistry;
pub use traits::{RecordAdapter, RecordAdapterFactory};
pub use ttl::{DEFAULT_TTL, TtlPolicy};
