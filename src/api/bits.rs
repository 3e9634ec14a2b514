use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;

use super::client::ApiClient;
use crate::domain::AppFileResource;

/// Timeout for application bits uploads (10 minutes)
const UPLOAD_BITS_TIMEOUT_SECS: u64 = 600;

impl ApiClient {
    /// Upload a packaged application and the list of reused files.
    pub async fn upload_bits(
        &self,
        api_url: &str,
        access_token: &str,
        app_guid: &str,
        zip_file: &Path,
        present_files: &[AppFileResource],
    ) -> Result<()> {
        let url = Self::build_url(api_url, &format!("v2/apps/{}/bits", app_guid))?;

        let resources =
            serde_json::to_string(present_files).context("Failed to serialize resources")?;
        let bytes = tokio::fs::read(zip_file)
            .await
            .with_context(|| format!("Failed to read {}", zip_file.display()))?;
        let application = Part::bytes(bytes)
            .file_name("application.zip")
            .mime_str("application/zip")
            .context("Invalid MIME type")?;
        let form = Form::new()
            .text("resources", resources)
            .part("application", application);

        let request = self
            .request(Method::PUT, url, Some(access_token), UPLOAD_BITS_TIMEOUT_SECS)?
            .multipart(form);

        self.send(request).await?;
        Ok(())
    }
}
