// # Azure DNS Provider
//
// This crate provides an Azure DNS record adapter for dnsc.
//
// ## Behaviour
//
// - One HTTP request per adapter call (plus a token request when the cached
//   token is missing or about to expire)
// - Full error propagation to the engine; no retries, backoff or caching of
//   record sets
// - HTTP timeout configured (30 seconds)
// - Specific error handling for HTTP status codes (401/403, 404, 409, 412, 429, 5xx)
// - Optimistic concurrency: creates use `If-None-Match: *`, updates use
//   `If-Match` with the etag returned by the preceding fetch
// - Mutation support for A, AAAA, CNAME, MX, NS, PTR, SRV and TXT; CAA and
//   SOA are read-only
//
// ## Security Requirements
//
// - Client secret and bearer token NEVER appear in logs or Debug output
// - Provider MUST fail fast if any credential is empty
//
// ## API Reference
//
// - Record sets: `{management}/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/dnsZones/{zone}/{type}/{name}?api-version=2018-05-01`
// - Token: POST `{login}/{tenant}/oauth2/v2.0/token` (client credentials)

pub mod client;
pub mod types;

use async_trait::async_trait;
use dnsc_core::config::ProviderConfig;
use dnsc_core::traits::{RecordAdapter, RecordAdapterFactory};
use dnsc_core::{AzureConfig, Error, RecordKey, RecordSet, RecordType, Result};

pub use client::{AzureHttpClient, Precondition};
pub use types::AzureRecordSet;

/// Azure DNS record adapter
///
/// Stateless apart from the cached access token held by its client.
#[derive(Debug)]
pub struct AzureAdapter {
    client: AzureHttpClient,
}

impl AzureAdapter {
    /// Create an adapter for the configured subscription and resource group
    pub fn new(config: AzureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: AzureHttpClient::new(config)?,
        })
    }

    /// Create an adapter over an existing client
    pub fn with_client(client: AzureHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordAdapter for AzureAdapter {
    async fn fetch(&self, key: &RecordKey) -> Result<Option<RecordSet>> {
        let found = self.client.get_record_set(key).await?;
        Ok(found.map(|rs| rs.into_record_set(key.record_type)))
    }

    async fn create(&self, key: &RecordKey, record_set: &RecordSet) -> Result<RecordSet> {
        let body = AzureRecordSet::from_record_set(record_set);
        let persisted = self
            .client
            .put_record_set(key, &body, Precondition::IfNoneMatch)
            .await?;

        tracing::debug!("Azure created {}", key);
        Ok(persisted.into_record_set(key.record_type))
    }

    async fn update(&self, key: &RecordKey, record_set: &RecordSet) -> Result<RecordSet> {
        let body = AzureRecordSet::from_record_set(record_set);
        let precondition = match record_set.version.as_deref() {
            Some(etag) => Precondition::IfMatch(etag),
            None => Precondition::None,
        };

        let persisted = self.client.put_record_set(key, &body, precondition).await?;

        tracing::debug!("Azure updated {}", key);
        Ok(persisted.into_record_set(key.record_type))
    }

    async fn delete(&self, key: &RecordKey) -> Result<()> {
        self.client.delete_record_set(key).await
    }

    fn supports_mutation(&self, record_type: RecordType) -> bool {
        !matches!(record_type, RecordType::Caa | RecordType::Soa)
    }

    fn provider_name(&self) -> &'static str {
        "azure"
    }
}

/// Factory for creating Azure adapters
pub struct AzureFactory;

impl RecordAdapterFactory for AzureFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordAdapter>> {
        match config {
            ProviderConfig::Azure(azure) => Ok(Box::new(AzureAdapter::new(azure.clone())?)),
            _ => Err(Error::config("Invalid config for Azure provider")),
        }
    }
}

/// Register the Azure provider with a registry
///
/// # Example
///
/// ```rust
/// use dnsc_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// dnsc_provider_azure::register(&registry);
/// assert!(registry.has_provider("azure"));
/// ```
pub fn register(registry: &dnsc_core::ProviderRegistry) {
    registry.register_provider("azure", Box::new(AzureFactory));
}
