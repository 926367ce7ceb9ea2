//! API client for the identity and portal endpoints.
//!
//! This module provides the `ApiClient` struct for the two requests the
//! session needs: exchanging credentials for a bearer token, and exchanging
//! that token for the tenant's portal address.

use std::time::Duration;

use reqwest::{header, Client};
use tracing::debug;

use crate::models::{AuthToken, Credentials, LoginResponse, PortalLocation};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Identity endpoint, relative to the configured base URL.
pub const LOGIN_PATH: &str = "/api/Login";

/// Portal resolution endpoint, relative to the configured base URL.
pub const PORTAL_PATH: &str = "/api/PortalUrl";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API client for the identity service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Sends exactly one request. Callers are expected to have validated the
    /// credentials already; nothing is re-checked here.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        let url = self.endpoint(LOGIN_PATH);
        debug!(url = %url, "Sending login request");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(credentials)
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let parsed: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::Parse(format!("login response: {}", e)))?;

        Ok(AuthToken::new(parsed.access_token))
    }

    /// Exchange a bearer token for the tenant's portal address.
    ///
    /// The response body is plain text and is used verbatim.
    pub async fn resolve_portal(&self, token: &AuthToken) -> Result<PortalLocation, ApiError> {
        let url = self.endpoint(PORTAL_PATH);
        debug!(url = %url, "Resolving portal address");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose())
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ApiError::Parse("portal response was empty".to_string()));
        }

        Ok(PortalLocation::new(body))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
