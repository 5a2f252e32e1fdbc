// # Record Adapter Trait
//
// Defines the interface between the reconciliation engine and one DNS
// hosting provider.
//
// ## Implementations
//
// - Azure DNS (typed record-set fields): `dnsc-provider-azure` crate
// - Namecheap (flat host-entry list): `dnsc-provider-namecheap` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsc_core::{RecordAdapter, RecordKey, RecordType};
//
// async fn show(adapter: &dyn RecordAdapter) -> dnsc_core::Result<()> {
//     let key = RecordKey::new("example.com", "www", RecordType::Cname);
//
//     if let Some(record_set) = adapter.fetch(&key).await? {
//         println!("{:?}", record_set.values.flatten());
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::diff::ValueComparison;
use crate::record::{RecordKey, RecordSet, RecordType};

/// Trait for provider adapters
///
/// An adapter translates between the provider-agnostic [`RecordSet`] and one
/// provider's native record shape, and performs the provider calls. The
/// engine decides *whether* anything must change; adapters only read and
/// write what they are told to.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Contract
///
/// - `fetch` maps "not found" to `Ok(None)` and propagates every other
///   transport/auth failure.
/// - `create` is only called once the engine has established absence.
/// - `update` always receives the complete desired collection (full replace,
///   never a patch).
/// - `delete` removes the entire record set.
/// - Adapters never retry, rate-limit, paginate or cache record sets
///   between calls.
#[async_trait]
pub trait RecordAdapter: Send + Sync {
    /// Fetch the current record set for `key`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(RecordSet))`: the complete current value collection
    /// - `Ok(None)`: no record set exists for the key
    /// - `Err(Error)`: transport, authentication or response failure
    async fn fetch(&self, key: &RecordKey) -> Result<Option<RecordSet>, crate::Error>;

    /// Create a record set that does not exist yet
    ///
    /// Returns the record set as persisted by the provider.
    async fn create(&self, key: &RecordKey, record_set: &RecordSet)
    -> Result<RecordSet, crate::Error>;

    /// Replace an existing record set with `record_set`
    ///
    /// Returns the record set as persisted by the provider.
    async fn update(&self, key: &RecordKey, record_set: &RecordSet)
    -> Result<RecordSet, crate::Error>;

    /// Delete the whole record set for `key`
    async fn delete(&self, key: &RecordKey) -> Result<(), crate::Error>;

    /// Whether this adapter can create/update/delete records of `record_type`
    ///
    /// Reads are always attempted; only mutations are gated.
    fn supports_mutation(&self, record_type: RecordType) -> bool;

    /// How this provider compares record values
    fn value_comparison(&self) -> ValueComparison {
        ValueComparison::Exact
    }

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "azure", "namecheap")
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing adapters from configuration
pub trait RecordAdapterFactory: Send + Sync {
    /// Create a RecordAdapter instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this provider
    ///
    /// # Returns
    ///
    /// A boxed RecordAdapter trait object
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn RecordAdapter>, crate::Error>;
}
