use anyhow::{Context, Result};
use reqwest::Method;

use super::client::{ApiClient, DEFAULT_TIMEOUT_SECS};
use crate::domain::AppFileResource;

impl ApiClient {
    /// Ask the platform which of `resources` it already stores.
    pub async fn resource_match(
        &self,
        api_url: &str,
        access_token: &str,
        resources: &[AppFileResource],
    ) -> Result<Vec<AppFileResource>> {
        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let url = Self::build_url(api_url, "v2/resource_match")?;
        let request = self
            .request(Method::PUT, url, Some(access_token), DEFAULT_TIMEOUT_SECS)?
            .json(resources);

        let response = self.send(request).await?;
        response
            .json()
            .await
            .context("Failed to parse resource match response")
    }
}
