use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::AppParams;
use crate::error::PushError;
use crate::push::validate_app_params;

#[derive(Debug, Deserialize)]
struct AppParamsFile {
    #[serde(default)]
    applications: Vec<AppParams>,
}

pub fn parse_app_params(raw: &str) -> Result<Vec<AppParams>> {
    let parsed: AppParamsFile =
        serde_json::from_str(raw).context("Failed to parse application parameters")?;
    Ok(parsed.applications)
}

pub async fn run_validate(file: String) -> Result<()> {
    let raw = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file))?;
    let apps = parse_app_params(&raw)?;

    match validate_app_params(&apps) {
        None => {
            println!("✅ {} application(s) valid", apps.len());
            Ok(())
        }
        Some(errors) => {
            for error in &errors {
                println!("❌ {}", error);
            }
            Err(PushError::Validation(errors).into())
        }
    }
}
