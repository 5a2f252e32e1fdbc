// # Namecheap DNS Provider
//
// This crate provides a Namecheap record adapter for dnsc.
//
// ## Behaviour
//
// - Namecheap exposes a domain's records as one flat host-entry list; the
//   adapter slices out the entries of one (name, type) key on fetch
// - `setHosts` replaces the whole list, so every write re-reads the list,
//   swaps the targeted entries and carries all other entries over verbatim
// - Entries keep their own TTL across a write unless the key's TTL changes
// - Host names and values compare case-insensitively
// - Each TXT entry is its own TXT bucket
// - Mutation support for A, AAAA, CNAME, MX, NS and TXT; CAA, SOA, SRV and
//   PTR are NotImplemented
// - No retry logic, backoff or caching of host lists between calls
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
//
// ## API Reference
//
// - `namecheap.domains.dns.getHosts` (GET)
// - `namecheap.domains.dns.setHosts` (POST, form encoded)

pub mod client;
pub mod types;

use async_trait::async_trait;
use dnsc_core::config::ProviderConfig;
use dnsc_core::traits::{RecordAdapter, RecordAdapterFactory};
use dnsc_core::{
    Error, NamecheapConfig, RecordKey, RecordSet, RecordType, Result, ValueComparison,
};

pub use client::NamecheapHttpClient;
pub use types::{HostEntry, split_domain};

/// Namecheap record adapter
#[derive(Debug)]
pub struct NamecheapAdapter {
    client: NamecheapHttpClient,
}

impl NamecheapAdapter {
    /// Create an adapter for the configured account
    pub fn new(config: NamecheapConfig) -> Result<Self> {
        config.validate()?;
        if config.sandbox {
            tracing::info!("Namecheap provider using the sandbox API");
        }
        Ok(Self {
            client: NamecheapHttpClient::new(config)?,
        })
    }

    /// Create an adapter over an existing client
    pub fn with_client(client: NamecheapHttpClient) -> Self {
        Self { client }
    }

    /// Rebuild the domain's host list with `replacement` in place of the key's entries
    ///
    /// The list is re-read right before setHosts so entries of other keys
    /// are carried over as they are now. Replacement entries whose value is
    /// already stored keep their stored TTL unless `ttl` changes the key's
    /// TTL. Returns `false` without writing when the list would be unchanged.
    async fn replace_entries(
        &self,
        key: &RecordKey,
        mut replacement: Vec<HostEntry>,
        ttl: Option<u32>,
    ) -> Result<bool> {
        let (sld, tld) = split_domain(&key.domain)?;
        let current = self.client.get_hosts(sld, tld).await?.ok_or_else(|| {
            Error::provider("namecheap", format!("Domain {} not found", key.domain))
        })?;

        let (targeted, mut entries): (Vec<HostEntry>, Vec<HostEntry>) =
            current.into_iter().partition(|entry| entry.belongs_to(key));

        if targeted.is_empty() && replacement.is_empty() {
            return Ok(false);
        }

        types::keep_stored_ttls(&targeted, &mut replacement, ttl);

        tracing::debug!(
            "Replacing {} Namecheap entries for {} with {}",
            targeted.len(),
            key,
            replacement.len()
        );

        entries.extend(replacement);
        self.client.set_hosts(sld, tld, &entries).await?;
        Ok(true)
    }

    async fn write(&self, key: &RecordKey, record_set: &RecordSet) -> Result<RecordSet> {
        let replacement = types::values_to_entries(key, record_set.ttl, &record_set.values)?;
        self.replace_entries(key, replacement, record_set.ttl).await?;

        // setHosts does not echo ids, so the written set is returned as sent
        Ok(RecordSet {
            id: None,
            ..record_set.clone()
        })
    }
}

#[async_trait]
impl RecordAdapter for NamecheapAdapter {
    async fn fetch(&self, key: &RecordKey) -> Result<Option<RecordSet>> {
        let (sld, tld) = split_domain(&key.domain)?;
        let Some(hosts) = self.client.get_hosts(sld, tld).await? else {
            return Ok(None);
        };

        let matching: Vec<&HostEntry> = hosts.iter().filter(|e| e.belongs_to(key)).collect();
        let Some(values) = types::entries_to_values(key.record_type, &matching) else {
            return Ok(None);
        };

        let mut record_set = RecordSet::new(matching[0].ttl, values);
        if let [single] = matching.as_slice() {
            record_set.id = single.host_id.clone();
        }

        Ok(Some(record_set))
    }

    async fn create(&self, key: &RecordKey, record_set: &RecordSet) -> Result<RecordSet> {
        self.write(key, record_set).await
    }

    async fn update(&self, key: &RecordKey, record_set: &RecordSet) -> Result<RecordSet> {
        self.write(key, record_set).await
    }

    async fn delete(&self, key: &RecordKey) -> Result<()> {
        if !self.replace_entries(key, Vec::new(), None).await? {
            tracing::debug!("{} already absent at Namecheap", key);
        }
        Ok(())
    }

    fn supports_mutation(&self, record_type: RecordType) -> bool {
        matches!(
            record_type,
            RecordType::A
                | RecordType::Aaaa
                | RecordType::Cname
                | RecordType::Mx
                | RecordType::Ns
                | RecordType::Txt
        )
    }

    fn value_comparison(&self) -> ValueComparison {
        ValueComparison::IgnoreAsciiCase
    }

    fn provider_name(&self) -> &'static str {
        "namecheap"
    }
}

/// Factory for creating Namecheap adapters
pub struct NamecheapFactory;

impl RecordAdapterFactory for NamecheapFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordAdapter>> {
        match config {
            ProviderConfig::Namecheap(namecheap) => {
                Ok(Box::new(NamecheapAdapter::new(namecheap.clone())?))
            }
            _ => Err(Error::config("Invalid config for Namecheap provider")),
        }
    }
}

/// Register the Namecheap provider with a registry
///
/// # Example
///
/// ```rust
/// use dnsc_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// dnsc_provider_namecheap::register(&registry);
/// assert!(registry.has_provider("namecheap"));
/// ```
pub fn register(registry: &dnsc_core::ProviderRegistry) {
    registry.register_provider("namecheap", Box::new(NamecheapFactory));
}
