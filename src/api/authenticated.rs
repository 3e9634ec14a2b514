//! Authenticated API client with stored credentials.
//!
//! `AuthenticatedClient` wraps `ApiClient` with the API URL and access token
//! of the current target, and is the production implementation of
//! [`AppBitsRepository`].

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::client::ApiClient;
use crate::config::Target;
use crate::domain::AppFileResource;
use crate::push::AppBitsRepository;

/// API client bound to one target.
///
/// Clones share the same `reqwest::Client`, and with it the connection pool.
#[derive(Clone)]
pub struct AuthenticatedClient {
    inner: Arc<ApiClient>,
    api_url: String,
    access_token: String,
}

impl AuthenticatedClient {
    pub fn new(api_url: String, access_token: String) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(None)?, api_url, access_token))
    }

    /// Create from an existing ApiClient (for testing or custom configuration).
    pub fn from_client(client: ApiClient, api_url: String, access_token: String) -> Self {
        Self {
            inner: Arc::new(client),
            api_url,
            access_token,
        }
    }

    pub fn from_target(target: &Target) -> Result<Self> {
        Self::new(target.api_url.clone(), target.access_token.clone())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

#[async_trait]
impl AppBitsRepository for AuthenticatedClient {
    async fn get_application_files(
        &self,
        files: &[AppFileResource],
    ) -> Result<Vec<AppFileResource>> {
        self.inner
            .resource_match(&self.api_url, &self.access_token, files)
            .await
    }

    async fn upload_bits(
        &self,
        app_guid: &str,
        zip_file: &Path,
        present_files: &[AppFileResource],
    ) -> Result<()> {
        self.inner
            .upload_bits(
                &self.api_url,
                &self.access_token,
                app_guid,
                zip_file,
                present_files,
            )
            .await
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("api_url", &self.api_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
