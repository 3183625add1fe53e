//! HTTP client for the asset API.
//!
//! Provides a minimal client with configurable auth (Bearer token or X-API-Key),
//! generic GET/POST/DELETE helpers sharing one status check, and the domain
//! methods behind [`assetdesk_core::AssetBackend`]. The CLI uses this client directly.

pub mod api;

use assetdesk_core::models::ErrorEnvelope;
use assetdesk_core::{AppError, DeskConfig};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// HTTP client for the asset API with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    prefix: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self, AppError> {
        Self::with_timeout(base_url, auth, Duration::from_secs(60))
    }

    fn with_timeout(base_url: String, auth: Auth, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: String::new(),
            auth,
        })
    }

    /// Path prepended to every endpoint, e.g. `/api/v1`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Create client from environment: ASSETDESK_API_URL (or API_URL),
    /// ASSETDESK_API_TOKEN (or API_TOKEN). Uses Bearer auth.
    pub fn from_env() -> Result<Self, AppError> {
        let config = DeskConfig::from_env()?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &DeskConfig) -> Result<Self, AppError> {
        let token = config.api_token.clone().ok_or_else(|| {
            AppError::Config("Missing API token. Set ASSETDESK_API_TOKEN or API_TOKEN".to_string())
        })?;

        Ok(
            Self::with_timeout(config.api_url.clone(), Auth::Bearer(token), config.http_timeout)?
                .with_prefix(config.api_prefix.clone()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.prefix, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let mut request = self.apply_auth(self.client.get(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = check_status(send(request).await?).await?;
        parse_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));

        let response = check_status(send(request).await?).await?;
        parse_json(response).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let request = self.apply_auth(self.client.delete(self.build_url(path)));
        check_status(send(request).await?).await?;
        Ok(())
    }

    /// Whether `url` has the same scheme, host and port as the base URL.
    pub fn is_same_origin(&self, url: &str) -> bool {
        match (Url::parse(&self.base_url), Url::parse(url)) {
            (Ok(base), Ok(target)) => {
                base.scheme() == target.scheme()
                    && base.host_str() == target.host_str()
                    && base.port_or_known_default() == target.port_or_known_default()
            }
            _ => false,
        }
    }

    /// GET an absolute URL and return the raw body. Credentials are only
    /// attached when the URL has the API's origin.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let mut request = self.client.get(url);
        if self.is_same_origin(url) {
            request = self.apply_auth(request);
        } else {
            tracing::debug!(url = %url, "Fetching foreign URL without credentials");
        }

        let response = check_status(send(request).await?).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<Response, AppError> {
    request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    response
        .json()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response as JSON: {}", e)))
}

/// Map a non-2xx response onto an error, using the `{ "error": ... }` body when present.
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body
            }
        });

    tracing::debug!(status = status.as_u16(), message = %message, "API request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Api {
            status: status.as_u16(),
            message,
        },
    })
}
