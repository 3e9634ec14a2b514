use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use super::types::ApiError;

/// Default request timeout in seconds
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default CLI version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the default User-Agent string
fn build_user_agent() -> String {
    std::env::var("APPBITS_USER_AGENT")
        .unwrap_or_else(|_| format!("appbits/{}", DEFAULT_VERSION))
}

/// HTTP client for the platform API
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) user_agent: String,
    pub(super) session_id: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(user_agent: Option<String>) -> Result<Self> {
        let user_agent = user_agent.unwrap_or_else(build_user_agent);
        let session_id = Uuid::new_v4().to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            user_agent,
            session_id,
        })
    }

    pub(super) fn build_url(base_url: &str, endpoint: &str) -> Result<Url> {
        let base =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        base.join(endpoint)
            .with_context(|| format!("Failed to build URL for endpoint: {}", endpoint))
    }

    fn client_with_timeout(&self, timeout_secs: u64) -> Result<Client> {
        if timeout_secs == DEFAULT_TIMEOUT_SECS {
            return Ok(self.client.clone());
        }

        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    /// Start a request with the common headers set.
    pub(super) fn request(
        &self,
        method: Method,
        url: Url,
        access_token: Option<&str>,
        timeout_secs: u64,
    ) -> Result<RequestBuilder> {
        let request_id = Uuid::new_v4().to_string();

        debug!("=== API Request ===");
        debug!("{} {}", method, url);
        debug!("Timeout: {}s", timeout_secs);
        debug!("Request ID: {}", request_id);

        let client = self.client_with_timeout(timeout_secs)?;
        let mut request = client
            .request(method, url)
            .header("User-Agent", &self.user_agent)
            .header("x-request-id", &request_id)
            .header("x-request-session-id", &self.session_id);

        if let Some(token) = access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        Ok(request)
    }

    /// Send `request` and turn non-success statuses into an [`ApiError`].
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        debug!("=== API Response ===");
        debug!("Status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let api_error = ApiError::from_http_response(status.as_u16(), error_text);

        if api_error.requires_login {
            error!("❌ {}", api_error.message);
        } else {
            error!("API request failed: {}", api_error.message);
        }

        Err(api_error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_agent() {
        let ua = build_user_agent();
        assert!(ua.starts_with("appbits/") || std::env::var("APPBITS_USER_AGENT").is_ok());
    }

    #[test]
    fn test_build_url() {
        let url = ApiClient::build_url("https://api.example.com/", "v2/resource_match").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/resource_match");

        let url = ApiClient::build_url("https://api.example.com", "v2/resource_match").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/resource_match");
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(ApiClient::build_url("not a url", "v2/resource_match").is_err());
    }
}
