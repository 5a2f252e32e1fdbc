//! Namecheap HTTP client
//!
//! Every call carries the global API parameters (`ApiUser`, `ApiKey`,
//! `UserName`, `ClientIp`). The client IP must be whitelisted at Namecheap;
//! when it is not configured it is looked up once and reused.

use dnsc_core::{Error, NamecheapConfig, Result};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::types::{ApiResponse, HostEntry};

/// Production API endpoint
pub const NAMECHEAP_API_URL: &str = "https://api.namecheap.com/xml.response";

/// Sandbox API endpoint
pub const NAMECHEAP_SANDBOX_API_URL: &str = "https://api.sandbox.namecheap.com/xml.response";

/// Public IP lookup used when no client IP is configured
pub const IP_LOOKUP_URL: &str = "https://api.ipify.org";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "namecheap";

/// Error numbers meaning the domain is unknown to the account
const DOMAIN_NOT_FOUND_ERRORS: &[&str] = &["2019166", "2016166"];

/// Error numbers meaning the credentials or client IP were rejected
const AUTHENTICATION_ERRORS: &[&str] = &["1011102", "1011150", "1017150"];

/// Namecheap XML API client
pub struct NamecheapHttpClient {
    config: NamecheapConfig,
    api_url: String,
    ip_lookup_url: String,
    client: reqwest::Client,
    client_ip: OnceCell<String>,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for NamecheapHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamecheapHttpClient")
            .field("config", &self.config)
            .field("api_url", &self.api_url)
            .field("client_ip", &self.client_ip.get())
            .finish()
    }
}

impl NamecheapHttpClient {
    /// Create a client for the production or sandbox endpoint
    pub fn new(config: NamecheapConfig) -> Result<Self> {
        let api_url = if config.sandbox {
            NAMECHEAP_SANDBOX_API_URL
        } else {
            NAMECHEAP_API_URL
        };
        Self::with_endpoints(config, api_url, IP_LOOKUP_URL)
    }

    /// Create a client against explicit endpoints (used by tests)
    pub fn with_endpoints(
        config: NamecheapConfig,
        api_url: impl Into<String>,
        ip_lookup_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        let client_ip = match config.client_ip.clone() {
            Some(ip) => OnceCell::new_with(Some(ip)),
            None => OnceCell::new(),
        };

        Ok(Self {
            config,
            api_url: api_url.into(),
            ip_lookup_url: ip_lookup_url.into(),
            client,
            client_ip,
        })
    }

    /// The configured client IP, or the public IP of this host
    async fn client_ip(&self) -> Result<&str> {
        let ip = self
            .client_ip
            .get_or_try_init(|| async {
                tracing::debug!("Looking up public client IP via {}", self.ip_lookup_url);

                let response = self
                    .client
                    .get(&self.ip_lookup_url)
                    .send()
                    .await
                    .map_err(|e| Error::http(format!("Client IP lookup failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(Error::http(format!(
                        "Client IP lookup failed. Status: {}",
                        response.status()
                    )));
                }

                let body = response
                    .text()
                    .await
                    .map_err(|e| Error::http(format!("Client IP lookup failed: {}", e)))?;

                Ok::<_, Error>(body.trim().to_string())
            })
            .await?;

        Ok(ip.as_str())
    }

    async fn global_params(
        &self,
        command: &str,
        sld: &str,
        tld: &str,
    ) -> Result<Vec<(String, String)>> {
        let client_ip = self.client_ip().await?;

        Ok(vec![
            ("ApiUser".to_string(), self.config.api_user.clone()),
            ("ApiKey".to_string(), self.config.api_key.clone()),
            ("UserName".to_string(), self.config.username().to_string()),
            ("ClientIp".to_string(), client_ip.to_string()),
            ("Command".to_string(), command.to_string()),
            ("SLD".to_string(), sld.to_string()),
            ("TLD".to_string(), tld.to_string()),
        ])
    }

    /// All host entries of a domain; `Ok(None)` when the domain is unknown
    pub async fn get_hosts(&self, sld: &str, tld: &str) -> Result<Option<Vec<HostEntry>>> {
        let params = self
            .global_params("namecheap.domains.dns.getHosts", sld, tld)
            .await?;

        tracing::debug!("getHosts {}.{}", sld, tld);

        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let api_response = match parse_response(response).await {
            Err(e) if e.is_not_found() => return Ok(None),
            other => other?,
        };

        let hosts = api_response
            .command_response
            .and_then(|c| c.get_hosts)
            .map(|result| result.hosts.into_iter().map(HostEntry::from).collect())
            .unwrap_or_default();

        Ok(Some(hosts))
    }

    /// Replace all host entries of a domain
    pub async fn set_hosts(&self, sld: &str, tld: &str, entries: &[HostEntry]) -> Result<()> {
        let mut params = self
            .global_params("namecheap.domains.dns.setHosts", sld, tld)
            .await?;

        for (i, entry) in entries.iter().enumerate() {
            let n = i + 1;
            params.push((format!("HostName{n}"), entry.name.clone()));
            params.push((format!("RecordType{n}"), entry.record_type.clone()));
            params.push((format!("Address{n}"), entry.address.clone()));
            if let Some(mx_pref) = entry.mx_pref {
                params.push((format!("MXPref{n}"), mx_pref.to_string()));
            }
            if let Some(ttl) = entry.ttl {
                params.push((format!("TTL{n}"), ttl.to_string()));
            }
        }

        if entries.iter().any(HostEntry::is_mx) {
            params.push(("EmailType".to_string(), "MX".to_string()));
        }

        tracing::debug!("setHosts {}.{} ({} entries)", sld, tld, entries.len());

        let response = self
            .client
            .post(&self.api_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let api_response = parse_response(response).await?;

        let success = api_response
            .command_response
            .and_then(|c| c.set_hosts)
            .is_some_and(|result| result.is_success);

        if !success {
            return Err(Error::provider(
                PROVIDER,
                format!("setHosts for {}.{} was not acknowledged", sld, tld),
            ));
        }

        Ok(())
    }
}

/// Check the transport status and the API `Status` attribute
async fn parse_response(response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(match status.as_u16() {
            401 | 403 => Error::auth(format!("Namecheap rejected the request. Status: {}", status)),
            429 => Error::provider(
                PROVIDER,
                format!("Rate limit exceeded. Please retry later. Status: {}", status),
            ),
            _ => Error::provider(PROVIDER, format!("HTTP {} - {}", status, body.trim())),
        });
    }

    let api_response: ApiResponse = quick_xml::de::from_str(&body)
        .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

    if api_response.status.eq_ignore_ascii_case("OK") {
        return Ok(api_response);
    }

    let errors = api_response.errors.map(|e| e.errors).unwrap_or_default();
    let Some(first) = errors.first() else {
        return Err(Error::provider(PROVIDER, "Unknown API error"));
    };

    let message = format!("{} ({})", first.message.trim(), first.number);
    Err(if DOMAIN_NOT_FOUND_ERRORS.contains(&first.number.as_str()) {
        Error::not_found(message)
    } else if AUTHENTICATION_ERRORS.contains(&first.number.as_str()) {
        Error::auth(message)
    } else {
        Error::provider(PROVIDER, message)
    })
}
