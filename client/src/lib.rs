//! Typed HTTP client for the pantry inventory API.
//!
//! Every method issues exactly one request and either returns the parsed body
//! or a [`ClientError`]. Non-2xx responses always carry the server's
//! `{code, message}` body. There are no timeouts, retries or request
//! coalescing: concurrent calls are fully independent.

pub mod config;
pub mod error;

use chrono::NaiveDate;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};

use pantry_common::alert::Alert;
use pantry_common::error::ApiError;
use pantry_common::health::HealthStatus;
use pantry_common::product::{
    is_valid_ean, AddInventoryRequest, InventoryEntry, UpdateProductRequest,
};
use pantry_common::settings::Settings;

pub use config::ClientConfig;
pub use error::ClientError;

pub type Result<T> = std::result::Result<T, ClientError>;

// ─── Client ──────────────────────────────────────────────────────────────────

/// Inventory API client. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured `reqwest::Client` (proxies, custom roots, ...).
    pub fn with_http_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Client for the URL in `PANTRY_API_URL` (or the default).
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi { client: self }
    }

    pub fn alerts(&self) -> AlertsApi<'_> {
        AlertsApi { client: self }
    }

    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi { client: self }
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }

    /// Liveness probe: succeeds while the server process is up.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.fetch(self.request(Method::GET, "/health"), "/health")
            .await
    }

    /// Readiness probe: fails with `DB_UNAVAILABLE` (HTTP 503) when the
    /// server cannot reach its database.
    pub async fn ready(&self) -> Result<HealthStatus> {
        self.fetch(self.request(Method::GET, "/ready"), "/ready")
            .await
    }

    // ─── HTTP helpers ────────────────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        tracing::debug!(%method, %url, "api request");
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
    }

    /// Send a request whose contract allows "no content".
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Option<T>> {
        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = resp.bytes().await?;
        let code = status.as_u16();
        if !status.is_success() {
            let error: ApiError = serde_json::from_slice(&body)
                .map_err(|source| ClientError::Decode { status: code, source })?;
            tracing::warn!(status = code, code = %error.code, "api error: {}", error.message);
            return Err(ClientError::Api { status: code, error });
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|source| ClientError::Decode { status: code, source })
    }

    /// Send a request that must come back with a body.
    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder, path: &str) -> Result<T> {
        self.send(req)
            .await?
            .ok_or_else(|| ClientError::UnexpectedNoContent(path.to_string()))
    }
}

fn check_ean(ean: &str) -> Result<()> {
    if is_valid_ean(ean) {
        Ok(())
    } else {
        Err(ClientError::InvalidEan(ean.to_string()))
    }
}

// ─── Inventory ───────────────────────────────────────────────────────────────

pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl InventoryApi<'_> {
    /// All entries, in the order the server returns them.
    pub async fn list(&self) -> Result<Vec<InventoryEntry>> {
        let c = self.client;
        c.fetch(c.request(Method::GET, "/inventory"), "/inventory")
            .await
    }

    /// Add one unit of `ean`, optionally with an expiry date.
    ///
    /// A missing date is sent as an explicit `null`.
    pub async fn add(&self, ean: &str, expiry_date: Option<NaiveDate>) -> Result<InventoryEntry> {
        check_ean(ean)?;
        let body = AddInventoryRequest {
            ean: ean.to_string(),
            expiry_date,
        };
        let c = self.client;
        c.fetch(c.request(Method::POST, "/inventory").json(&body), "/inventory")
            .await
    }

    /// Remove one unit of `ean`.
    ///
    /// Returns the updated entry, or `None` when the server answered 204
    /// because the last unit was removed and the entry deleted.
    pub async fn remove(&self, ean: &str) -> Result<Option<InventoryEntry>> {
        check_ean(ean)?;
        let c = self.client;
        c.send(c.request(Method::DELETE, &format!("/inventory/{ean}")))
            .await
    }
}

// ─── Alerts ──────────────────────────────────────────────────────────────────

pub struct AlertsApi<'a> {
    client: &'a ApiClient,
}

impl AlertsApi<'_> {
    /// Current alerts, recomputed by the server on every call.
    pub async fn list(&self) -> Result<Vec<Alert>> {
        let c = self.client;
        c.fetch(c.request(Method::GET, "/alerts"), "/alerts").await
    }
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl SettingsApi<'_> {
    pub async fn get(&self) -> Result<Settings> {
        let c = self.client;
        c.fetch(c.request(Method::GET, "/settings"), "/settings")
            .await
    }

    pub async fn update(&self, settings: &Settings) -> Result<Settings> {
        let c = self.client;
        c.fetch(
            c.request(Method::PATCH, "/settings").json(settings),
            "/settings",
        )
        .await
    }
}

// ─── Products ────────────────────────────────────────────────────────────────

pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ProductsApi<'_> {
    /// Override the display name and category the server resolved for `ean`.
    pub async fn update(&self, ean: &str, update: &UpdateProductRequest) -> Result<()> {
        check_ean(ean)?;
        let c = self.client;
        c.send::<IgnoredAny>(
            c.request(Method::PATCH, &format!("/products/{ean}"))
                .json(update),
        )
        .await?;
        Ok(())
    }
}
