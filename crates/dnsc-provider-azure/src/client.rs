//! Azure DNS HTTP client
//!
//! Thin wrapper over the resource manager REST API: one request per call,
//! plus an OAuth2 client-credentials token cached until shortly before it
//! expires.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dnsc_core::{AzureConfig, Error, RecordKey, Result};
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::types::{AzureRecordSet, ErrorEnvelope, TokenResponse};

/// DNS management API version
pub const API_VERSION: &str = "2018-05-01";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Refresh tokens this long before they expire
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

const PROVIDER: &str = "azure";

/// Write precondition for a PUT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition<'a> {
    /// Fail if the record set already exists
    IfNoneMatch,
    /// Fail unless the record set still has this etag
    IfMatch(&'a str),
    /// Unconditional overwrite
    None,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Azure DNS REST client
pub struct AzureHttpClient {
    config: AzureConfig,
    login_base: String,
    management_base: String,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

// Custom Debug implementation that hides the client secret and token
impl std::fmt::Debug for AzureHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureHttpClient")
            .field("config", &self.config)
            .field("login_base", &self.login_base)
            .field("management_base", &self.management_base)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl AzureHttpClient {
    /// Create a client against the endpoints of the configured cloud
    pub fn new(config: AzureConfig) -> Result<Self> {
        let login_base = config.cloud.login_endpoint().to_string();
        let management_base = config.cloud.management_endpoint().to_string();
        Self::with_endpoints(config, login_base, management_base)
    }

    /// Create a client against explicit endpoints
    ///
    /// Used for sovereign clouds not covered by [`dnsc_core::AzureCloud`]
    /// and for tests against a local mock server.
    pub fn with_endpoints(
        config: AzureConfig,
        login_base: impl Into<String>,
        management_base: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            login_base: login_base.into().trim_end_matches('/').to_string(),
            management_base: management_base.into().trim_end_matches('/').to_string(),
            client,
            token: Mutex::new(None),
        })
    }

    fn record_set_url(&self, key: &RecordKey) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/dnsZones/{}/{}/{}?api-version={}",
            self.management_base,
            self.config.subscription_id,
            self.config.resource_group,
            key.domain,
            key.record_type,
            key.name,
            API_VERSION
        )
    }

    /// Return a cached bearer token, requesting a new one when needed
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Utc::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_base, self.config.tenant_id
        );
        let scope = format!("{}/.default", self.config.cloud.management_endpoint());

        tracing::debug!("Requesting Azure access token for tenant {}", self.config.tenant_id);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::http(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "Azure token request rejected. Status: {} - {}",
                status,
                summarize(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| {
                Error::provider(PROVIDER, format!("Failed to parse token response: {}", e))
            })?;

        let lifetime = (token.expires_in - TOKEN_REFRESH_MARGIN_SECS).max(0);
        let access_token = token.access_token;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Utc::now() + ChronoDuration::seconds(lifetime),
        });

        Ok(access_token)
    }

    /// GET a record set; `Ok(None)` on 404
    pub async fn get_record_set(&self, key: &RecordKey) -> Result<Option<AzureRecordSet>> {
        let url = self.record_set_url(key);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.access_token().await?)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response, key).await?;
        let record_set = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

        Ok(Some(record_set))
    }

    /// PUT a record set with the given precondition
    pub async fn put_record_set(
        &self,
        key: &RecordKey,
        body: &AzureRecordSet,
        precondition: Precondition<'_>,
    ) -> Result<AzureRecordSet> {
        let url = self.record_set_url(key);
        tracing::debug!("PUT {} ({:?})", url, precondition);

        let mut request = self
            .client
            .put(&url)
            .bearer_auth(self.access_token().await?)
            .json(body);

        request = match precondition {
            Precondition::IfNoneMatch => request.header("If-None-Match", "*"),
            Precondition::IfMatch(etag) => request.header("If-Match", etag),
            Precondition::None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        // A record set PUT only 404s when its zone or resource group is gone
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::provider(
                PROVIDER,
                format!(
                    "Zone {} or resource group {} missing, cannot write {}",
                    key.domain, self.config.resource_group, key
                ),
            ));
        }

        let response = check_status(response, key).await?;
        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
    }

    /// DELETE a record set; a missing record set is not an error
    pub async fn delete_record_set(&self, key: &RecordKey) -> Result<()> {
        let url = self.record_set_url(key);
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(self.access_token().await?)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("{} already absent", key);
            return Ok(());
        }

        check_status(response, key).await?;
        Ok(())
    }
}

/// Map a non-success response to the matching error
async fn check_status(response: Response, key: &RecordKey) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    let detail = summarize(&body);

    Err(match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid credentials or insufficient permissions for {}. Status: {} - {}",
            key, status, detail
        )),
        404 => Error::provider(
            PROVIDER,
            format!("Zone or resource group missing for {}: {}", key, detail),
        ),
        409 => Error::provider(PROVIDER, format!("Conflict writing {}: {}", key, detail)),
        412 => Error::provider(
            PROVIDER,
            format!("Precondition failed for {} (modified concurrently): {}", key, detail),
        ),
        429 => Error::provider(
            PROVIDER,
            format!("Rate limit exceeded. Please retry later. Status: {}", status),
        ),
        500..=599 => Error::provider(
            PROVIDER,
            format!("Azure server error (transient): {} - {}", status, detail),
        ),
        _ => Error::provider(
            PROVIDER,
            format!("Request for {} failed: {} - {}", key, status, detail),
        ),
    })
}

/// Prefer the resource manager error message over the raw body
fn summarize(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            format!("{}: {}", envelope.error.code, envelope.error.message)
        }
        _ => body.trim().to_string(),
    }
}
