//! Configuration types for dnsc
//!
//! This module defines all configuration structures used throughout the crate.
//! Configuration is built once (by the binary, or by a library caller) and
//! handed to adapter constructors; library code never reads the environment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ttl::DEFAULT_TTL;

/// Main dnsc configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnscConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DnscConfig {
    /// Create a configuration for `provider` with default engine settings
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Azure DNS
    Azure(AzureConfig),

    /// Namecheap
    Namecheap(NamecheapConfig),

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Azure(azure) => azure.validate(),
            ProviderConfig::Namecheap(namecheap) => namecheap.validate(),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Azure(_) => "azure",
            ProviderConfig::Namecheap(_) => "namecheap",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Azure national cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AzureCloud {
    #[default]
    AzureCloud,
    AzureChinaCloud,
    #[serde(rename = "AzureUSGovernment")]
    AzureUsGovernment,
}

impl AzureCloud {
    /// Azure AD authority host
    pub fn login_endpoint(&self) -> &'static str {
        match self {
            AzureCloud::AzureCloud => "https://login.microsoftonline.com",
            AzureCloud::AzureChinaCloud => "https://login.chinacloudapi.cn",
            AzureCloud::AzureUsGovernment => "https://login.microsoftonline.us",
        }
    }

    /// Resource manager endpoint
    pub fn management_endpoint(&self) -> &'static str {
        match self {
            AzureCloud::AzureCloud => "https://management.azure.com",
            AzureCloud::AzureChinaCloud => "https://management.chinacloudapi.cn",
            AzureCloud::AzureUsGovernment => "https://management.usgovcloudapi.net",
        }
    }
}

impl std::str::FromStr for AzureCloud {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azurecloud" | "azurepubliccloud" | "public" => Ok(AzureCloud::AzureCloud),
            "azurechinacloud" | "china" => Ok(AzureCloud::AzureChinaCloud),
            "azureusgovernment" | "azureusgovernmentcloud" | "usgovernment" => {
                Ok(AzureCloud::AzureUsGovernment)
            }
            other => Err(crate::Error::config(format!("Unknown Azure cloud: {other}"))),
        }
    }
}

/// Azure DNS credentials and zone scope
#[derive(Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    pub subscription_id: String,
    pub resource_group: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub cloud: AzureCloud,
}

impl AzureConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        let required = [
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(crate::Error::config(format!(
                    "Azure {field} cannot be empty"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .field("cloud", &self.cloud)
            .finish()
    }
}

/// Namecheap API credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct NamecheapConfig {
    /// Account the API call acts on; defaults to `api_user`
    #[serde(default)]
    pub username: Option<String>,
    pub api_user: String,
    pub api_key: String,
    /// Whitelisted client IP; discovered on first use when absent
    #[serde(default)]
    pub client_ip: Option<String>,
    /// Use the sandbox API endpoint
    #[serde(default)]
    pub sandbox: bool,
}

impl NamecheapConfig {
    pub fn new(api_user: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: None,
            api_user: api_user.into(),
            api_key: api_key.into(),
            client_ip: None,
            sandbox: false,
        }
    }

    /// Effective account user name
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.api_user)
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_user.trim().is_empty() {
            return Err(crate::Error::config("Namecheap api_user cannot be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config("Namecheap api_key cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for NamecheapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamecheapConfig")
            .field("username", &self.username())
            .field("api_user", &self.api_user)
            .field("api_key", &"<REDACTED>")
            .field("client_ip", &self.client_ip)
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

/// What Set/Delete do when the initial fetch fails for a reason other than absence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Log at `warn` and continue as if the record set did not exist
    #[default]
    TreatAsAbsent,
    /// Return the fetch error to the caller
    Propagate,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// TTL (seconds) applied when a record set has none and the caller supplies none
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Handling of fetch failures during Set/Delete
    #[serde(default)]
    pub fetch_failure: FetchFailurePolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.default_ttl == 0 {
            return Err(crate::Error::config("Default TTL must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            fetch_failure: FetchFailurePolicy::default(),
        }
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}
