// # Cloudflare DNS Provider
//
// Implements the zonesync DnsProvider trait against the Cloudflare API
// v4 zone-records endpoints.
//
// ## Operations
//
// - Lookup: GET `/zones/:zone_id/dns_records?name=...`
// - Create: POST `/zones/:zone_id/dns_records`
// - Update: PUT `/zones/:zone_id/dns_records/:record_id`
//
// All responses use Cloudflare's `{success, result, errors}` envelope.
// Cloudflare reports failures through both the HTTP status AND the
// body-level `success` flag, so both are checked on every call: a 2xx
// with `success: false` is still a failure.
//
// ## Fixed record policy
//
// Mutations always write `{type:"A", ttl:120, proxied:false}`. TTL and
// the proxied flag are deliberate policy constants, not inputs: the
// record exposes the raw origin IP without Cloudflare's reverse proxy.
//
// ## Responsibility boundary
//
// One HTTP request per trait call. No retries, no backoff, no caching,
// no background tasks — the engine owns the schedule and simply tries
// again on the next tick.
//
// ## Security
//
// - The API token never appears in logs
// - The Debug implementation redacts the token
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::time::Duration;
use zonesync_core::config::ProviderConfig;
use zonesync_core::traits::{DnsProvider, DnsRecord, PublicIp};
use zonesync_core::{Error, Result};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Fixed TTL written on every mutation (seconds)
const RECORD_TTL_SECS: u32 = 120;

/// HTTP timeout for API requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for create and update calls
///
/// Identical shape on both paths: `proxied` is always false and `ttl`
/// always 120, regardless of input.
#[derive(Debug, Serialize)]
struct RecordPayload<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    ttl: u32,
    proxied: bool,
}

impl<'a> RecordPayload<'a> {
    fn a_record(name: &'a str, content: &'a str) -> Self {
        Self {
            record_type: "A",
            name,
            content,
            ttl: RECORD_TTL_SECS,
            proxied: false,
        }
    }
}

/// Cloudflare's standard response envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiError>,
    result: Option<T>,
}

/// One entry of the envelope's `errors` array
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: i64,
    message: String,
}

/// A DNS record as returned by the API
#[derive(Debug, Deserialize)]
struct RecordDto {
    id: String,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    content: String,
    ttl: u32,
    #[serde(default)]
    proxied: bool,
}

impl From<RecordDto> for DnsRecord {
    fn from(dto: RecordDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            record_type: dto.record_type,
            content: dto.content,
            ttl: dto.ttl,
            proxied: dto.proxied,
        }
    }
}

/// Render the envelope's error list for operator-visible messages
fn describe_errors(errors: &[ApiError]) -> String {
    if errors.is_empty() {
        return "no error detail supplied".to_string();
    }
    errors
        .iter()
        .map(|e| format!("code {}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a non-2xx response to a specific error
fn status_error(operation: &str, status: reqwest::StatusCode, body: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::provider(
            "cloudflare",
            format!(
                "authentication failed during {}: invalid API token or insufficient permissions (status {})",
                operation, status
            ),
        ),
        404 => Error::provider(
            "cloudflare",
            format!("{} hit an unknown zone or record (status {})", operation, status),
        ),
        429 => Error::provider(
            "cloudflare",
            format!("rate limit exceeded during {} (status {})", operation, status),
        ),
        500..=599 => Error::provider(
            "cloudflare",
            format!(
                "Cloudflare server error (transient) during {}: {} - {}",
                operation, status, body
            ),
        ),
        _ => Error::provider(
            "cloudflare",
            format!("{} failed: {} - {}", operation, status, body),
        ),
    }
}

/// Cloudflare DNS provider
///
/// Stateless adapter over the v4 zone-records endpoints. The zone is
/// fixed at construction; the record name arrives per call from the
/// engine.
pub struct CloudflareProvider {
    /// Cloudflare API token. Never logged.
    api_token: String,

    /// Zone the managed record lives in
    zone_id: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permission
    /// - `zone_id`: The zone hosting the managed record
    ///
    /// Empty credentials are rejected here so a missing token is a
    /// startup error rather than a cryptic HTTP 403 later.
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        let zone_id = zone_id.into();

        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Ok(Self {
            api_token,
            zone_id,
            client,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Cloudflare { api_token, zone_id } => {
                Self::new(api_token.clone(), zone_id.clone())
            }
        }
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", CLOUDFLARE_API_BASE, self.zone_id)
    }

    /// Check the HTTP status and decode the envelope
    ///
    /// The body-level `success` flag is left for the caller so the
    /// failure can carry the right operation context.
    async fn decode_envelope<T: DeserializeOwned>(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<ApiEnvelope<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(status_error(operation, status, &body));
        }

        response.json().await.map_err(|e| {
            Error::provider(
                "cloudflare",
                format!("malformed {} response: {}", operation, e),
            )
        })
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Look up the record for a hostname
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=example.com
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// A successful response with zero matches is `Ok(None)` — a valid
    /// "no record yet" state. Every failure path is `Err`, so a
    /// transient outage can never masquerade as a missing record.
    async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>> {
        tracing::debug!("Looking up record {} in zone {}", name, self.zone_id);

        let url = format!("{}?name={}", self.records_url(), name);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::lookup(format!("HTTP request failed: {}", e)))?;

        let envelope: ApiEnvelope<Vec<RecordDto>> =
            Self::decode_envelope("record lookup", response).await?;

        if !envelope.success {
            return Err(Error::lookup(format!(
                "provider reported failure: {}",
                describe_errors(&envelope.errors)
            )));
        }

        // First match wins when multiple records share the name; the
        // ordering is controlled by the provider.
        let record = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(DnsRecord::from);

        Ok(record)
    }

    /// Create an "A" record mapping `name` to `ip`
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// Authorization: Bearer <token>
    /// {"type":"A","name":...,"content":...,"ttl":120,"proxied":false}
    /// ```
    async fn create_record(&self, name: &str, ip: &PublicIp) -> Result<DnsRecord> {
        tracing::debug!("Creating record {} -> {}", name, ip);

        let payload = RecordPayload::a_record(name, ip.as_str());
        let response = self
            .client
            .post(self.records_url())
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::mutation(format!("HTTP request failed: {}", e)))?;

        let envelope: ApiEnvelope<RecordDto> =
            Self::decode_envelope("record create", response).await?;

        if !envelope.success {
            return Err(Error::mutation(format!(
                "provider rejected create: {}",
                describe_errors(&envelope.errors)
            )));
        }

        let dto = envelope
            .result
            .ok_or_else(|| Error::mutation("provider reported success without a record body"))?;

        Ok(DnsRecord::from(dto))
    }

    /// Update the record addressed by `record_id` to carry `ip`
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    /// {"type":"A","name":...,"content":...,"ttl":120,"proxied":false}
    /// ```
    async fn update_record(
        &self,
        record_id: &str,
        name: &str,
        ip: &PublicIp,
    ) -> Result<DnsRecord> {
        tracing::debug!("Updating record {} ({}) -> {}", name, record_id, ip);

        let url = format!("{}/{}", self.records_url(), record_id);
        let payload = RecordPayload::a_record(name, ip.as_str());
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::mutation(format!("HTTP request failed: {}", e)))?;

        let envelope: ApiEnvelope<RecordDto> =
            Self::decode_envelope("record update", response).await?;

        if !envelope.success {
            return Err(Error::mutation(format!(
                "provider rejected update: {}",
                describe_errors(&envelope.errors)
            )));
        }

        let dto = envelope
            .result
            .ok_or_else(|| Error::mutation("provider reported success without a record body"))?;

        Ok(DnsRecord::from(dto))
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
