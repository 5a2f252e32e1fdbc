//! Reconciliation engine
//!
//! The RecordEngine is responsible for:
//! - Fetching the current record set for a (domain, name, type) key
//! - Diffing it against the caller's desired state
//! - Issuing at most one mutating call to the adapter
//! - Classifying the outcome (Created / Updated / Deleted / Noop)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   DesiredState   ┌──────────────┐
//! │    caller    │ ───────────────▶ │ RecordEngine │
//! └──────────────┘                  └──────────────┘
//!                                           │
//!                 ┌─────────────────────────┼─────────────────────────┐
//!                 │                         │                         │
//!                 ▼                         ▼                         ▼
//!         ┌──────────────┐         ┌────────────────┐        ┌──────────────┐
//!         │ RecordAdapter│         │ diff / ttl     │        │ RecordAdapter│
//!         │ (fetch)      │         │ (in memory)    │        │ (mutate)     │
//!         └──────────────┘         └────────────────┘        └──────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! 1. Parse the record type (case-insensitive)
//! 2. For Set/Delete, check the adapter can mutate the type
//! 3. Fetch the current record set fresh (nothing is cached between calls)
//! 4. Apply the TTL policy and value diff in memory
//! 5. Write back only if something actually changed
//!
//! The engine performs no locking, retries or optimistic-concurrency checks
//! of its own. Callers needing atomicity across concurrent writers to the
//! same key must serialize calls externally.

use crate::config::{EngineConfig, FetchFailurePolicy};
use crate::diff::{self, Removal};
use crate::error::{Error, Result};
use crate::record::{
    DeleteOperation, DesiredState, DnsRecord, RecordKey, RecordSet, RecordType, SetOperation,
    SetResult,
};
use crate::traits::RecordAdapter;
use crate::ttl::TtlPolicy;
use tracing::{debug, info, warn};

/// Reconciliation engine over one provider adapter
///
/// ## Lifecycle
///
/// 1. Create with [`RecordEngine::new()`]
/// 2. Call [`get`](RecordEngine::get), [`set`](RecordEngine::set) or
///    [`delete`](RecordEngine::delete) as often as needed
///
/// Every call fetches fresh state; no record data outlives a call.
pub struct RecordEngine {
    /// Provider adapter
    adapter: Box<dyn RecordAdapter>,

    /// TTL write/preserve rule
    ttl_policy: TtlPolicy,

    /// Handling of fetch failures during Set/Delete
    fetch_failure: FetchFailurePolicy,
}

impl RecordEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `adapter`: Provider adapter for reads and writes
    /// - `config`: Engine settings (default TTL, fetch-failure policy)
    pub fn new(adapter: Box<dyn RecordAdapter>, config: EngineConfig) -> Self {
        Self {
            adapter,
            ttl_policy: TtlPolicy::new(config.default_ttl),
            fetch_failure: config.fetch_failure,
        }
    }

    /// Read one record set
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `record_type` is not a known type
    /// - [`Error::NotFound`] if the provider has no record set for the key
    /// - any provider error, unchanged
    pub async fn get(&self, domain: &str, name: &str, record_type: &str) -> Result<DnsRecord> {
        let record_type: RecordType = record_type.parse()?;
        let key = RecordKey::new(domain, name, record_type);

        debug!("Fetching {} from {}", key, self.adapter.provider_name());

        match self.adapter.fetch(&key).await? {
            Some(record_set) => Ok(DnsRecord::from_record_set(&key, &record_set)),
            None => Err(Error::not_found(key.to_string())),
        }
    }

    /// Ensure the desired value is present
    ///
    /// Creates the record set when absent, appends (or replaces, for CNAME)
    /// the value when present, and reconciles the TTL. Nothing is written
    /// when the value is already present and the TTL is unchanged.
    pub async fn set(&self, desired: &DesiredState) -> Result<SetResult> {
        let key = self.mutable_key(desired)?;
        if desired.value.is_none() {
            return Err(Error::invalid_argument(format!(
                "A value is required to set {key}"
            )));
        }

        let Some(mut record_set) = self.fetch_for_write(&key).await? else {
            let values = diff::initial_values(key.record_type, desired)?;
            let new_set = RecordSet::new(Some(self.ttl_policy.initial(desired.ttl)), values);

            let created = self.adapter.create(&key, &new_set).await?;
            info!("Created {} at {}", key, self.adapter.provider_name());

            return Ok(SetResult {
                dns_record: DnsRecord::from_record_set(&key, &created),
                set_operation: SetOperation::Created,
            });
        };

        let ttl_changed = self.ttl_policy.reconcile(&mut record_set.ttl, desired.ttl);
        let values_changed =
            diff::merge(&mut record_set.values, desired, self.adapter.value_comparison())?;

        if !(ttl_changed || values_changed) {
            debug!("{} already up to date, skipping write", key);
            return Ok(SetResult {
                dns_record: DnsRecord::from_record_set(&key, &record_set),
                set_operation: SetOperation::Noop,
            });
        }

        let updated = self.adapter.update(&key, &record_set).await?;
        info!(
            "Updated {} at {} (ttl changed: {}, values changed: {})",
            key,
            self.adapter.provider_name(),
            ttl_changed,
            values_changed
        );

        Ok(SetResult {
            dns_record: DnsRecord::from_record_set(&key, &updated),
            set_operation: SetOperation::Updated,
        })
    }

    /// Remove one value, or the whole record set when no value is given
    ///
    /// Deleting from a record set that does not exist, or deleting a value
    /// that is not present, is a [`DeleteOperation::Noop`], never an error.
    pub async fn delete(&self, desired: &DesiredState) -> Result<DeleteOperation> {
        let key = self.mutable_key(desired)?;

        let Some(mut record_set) = self.fetch_for_write(&key).await? else {
            debug!("{} does not exist, nothing to delete", key);
            return Ok(DeleteOperation::Noop);
        };

        let Some(value) = desired.value.as_deref() else {
            self.adapter.delete(&key).await?;
            info!("Deleted {} at {}", key, self.adapter.provider_name());
            return Ok(DeleteOperation::Deleted);
        };

        let removal = diff::remove(
            &mut record_set.values,
            desired,
            value,
            self.adapter.value_comparison(),
        )?;

        match removal {
            Removal::NotFound => {
                debug!("{} has no value {:?}, nothing to delete", key, value);
                Ok(DeleteOperation::Noop)
            }
            Removal::WholeSet => {
                self.adapter.delete(&key).await?;
                info!(
                    "Deleted {} at {} (last value {:?} removed)",
                    key,
                    self.adapter.provider_name(),
                    value
                );
                Ok(DeleteOperation::Deleted)
            }
            Removal::Removed => {
                self.adapter.update(&key, &record_set).await?;
                info!(
                    "Removed {:?} from {} at {}",
                    value,
                    key,
                    self.adapter.provider_name()
                );
                Ok(DeleteOperation::Deleted)
            }
        }
    }

    /// Parse the key and check the adapter can mutate its type
    fn mutable_key(&self, desired: &DesiredState) -> Result<RecordKey> {
        let key = desired.key()?;

        if !self.adapter.supports_mutation(key.record_type) {
            return Err(Error::not_implemented(format!(
                "{} records are not implemented for {}",
                key.record_type,
                self.adapter.provider_name()
            )));
        }

        Ok(key)
    }

    /// Fetch ahead of a write, folding failures into absence per policy
    async fn fetch_for_write(&self, key: &RecordKey) -> Result<Option<RecordSet>> {
        match self.adapter.fetch(key).await {
            Ok(found) => Ok(found),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => match self.fetch_failure {
                FetchFailurePolicy::TreatAsAbsent => {
                    warn!(
                        "Fetching {} from {} failed, treating as absent: {}",
                        key,
                        self.adapter.provider_name(),
                        e
                    );
                    Ok(None)
                }
                FetchFailurePolicy::Propagate => Err(e),
            },
        }
    }
}
