//! Test doubles and common utilities for engine contract tests
//!
//! The in-memory adapter stores record sets in a shared map and counts every
//! mutating call, so tests can prove that redundant writes never reach the
//! provider.

#![allow(dead_code)]

use dnsc_core::error::{Error, Result};
use dnsc_core::{
    EngineConfig, RecordAdapter, RecordEngine, RecordKey, RecordSet, RecordType, RecordValues,
    TxtBucket, ValueComparison,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DOMAIN: &str = "example.com";

/// An adapter backed by a HashMap that tracks calls
pub struct InMemoryAdapter {
    records: Arc<Mutex<HashMap<RecordKey, RecordSet>>>,
    fetch_call_count: Arc<AtomicUsize>,
    create_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
    delete_call_count: Arc<AtomicUsize>,
    /// When set, fetch() fails with a provider error
    fail_fetch: Arc<AtomicBool>,
    comparison: ValueComparison,
    unsupported: Vec<RecordType>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            delete_call_count: Arc::new(AtomicUsize::new(0)),
            fail_fetch: Arc::new(AtomicBool::new(false)),
            comparison: ValueComparison::Exact,
            unsupported: vec![RecordType::Caa, RecordType::Soa],
        }
    }

    pub fn with_comparison(mut self, comparison: ValueComparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn with_unsupported(mut self, record_type: RecordType) -> Self {
        self.unsupported.push(record_type);
        self
    }

    /// Create an adapter that shares state and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
            create_call_count: Arc::clone(&other.create_call_count),
            update_call_count: Arc::clone(&other.update_call_count),
            delete_call_count: Arc::clone(&other.delete_call_count),
            fail_fetch: Arc::clone(&other.fail_fetch),
            comparison: other.comparison,
            unsupported: other.unsupported.clone(),
        }
    }

    /// Seed a record set directly, bypassing the counters
    pub fn seed(&self, name: &str, record_set: RecordSet) {
        let key = RecordKey::new(DOMAIN, name, record_set.record_type());
        self.records.lock().unwrap().insert(key, record_set);
    }

    /// Current stored record set, if any
    pub fn stored(&self, name: &str, record_type: RecordType) -> Option<RecordSet> {
        let key = RecordKey::new(DOMAIN, name, record_type);
        self.records.lock().unwrap().get(&key).cloned()
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    /// Total number of mutating calls
    pub fn write_count(&self) -> usize {
        self.create_call_count() + self.update_call_count() + self.delete_call_count()
    }
}

#[async_trait::async_trait]
impl RecordAdapter for InMemoryAdapter {
    async fn fetch(&self, key: &RecordKey) -> Result<Option<RecordSet>> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Error::http("connection reset by peer"));
        }
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    async fn create(&self, key: &RecordKey, record_set: &RecordSet) -> Result<RecordSet> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        assert!(!record_set.values.is_empty(), "empty record set persisted");

        let persisted = record_set.clone().with_id(format!("/{}/{}", key.record_type, key.name));
        self.records
            .lock()
            .unwrap()
            .insert(key.clone(), persisted.clone());
        Ok(persisted)
    }

    async fn update(&self, key: &RecordKey, record_set: &RecordSet) -> Result<RecordSet> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        assert!(!record_set.values.is_empty(), "empty record set persisted");
        if let RecordValues::Txt(buckets) = &record_set.values {
            assert!(
                buckets.iter().all(|b| !b.values.is_empty()),
                "empty TXT bucket persisted"
            );
        }

        self.records
            .lock()
            .unwrap()
            .insert(key.clone(), record_set.clone());
        Ok(record_set.clone())
    }

    async fn delete(&self, key: &RecordKey) -> Result<()> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().remove(key);
        Ok(())
    }

    fn supports_mutation(&self, record_type: RecordType) -> bool {
        !self.unsupported.contains(&record_type)
    }

    fn value_comparison(&self) -> ValueComparison {
        self.comparison
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Build an engine over an adapter that shares state with `adapter`
pub fn engine_for(adapter: &InMemoryAdapter) -> RecordEngine {
    engine_with_config(adapter, EngineConfig::default())
}

pub fn engine_with_config(adapter: &InMemoryAdapter, config: EngineConfig) -> RecordEngine {
    RecordEngine::new(
        Box::new(InMemoryAdapter::sharing_counters_with(adapter)),
        config,
    )
}

pub fn txt_set(ttl: Option<u32>, buckets: &[&[&str]]) -> RecordSet {
    RecordSet::new(
        ttl,
        RecordValues::Txt(buckets.iter().map(|b| TxtBucket::new(b.iter().copied())).collect()),
    )
}

pub fn a_set(ttl: Option<u32>, addresses: &[&str]) -> RecordSet {
    RecordSet::new(
        ttl,
        RecordValues::A(addresses.iter().map(|a| a.to_string()).collect()),
    )
}
