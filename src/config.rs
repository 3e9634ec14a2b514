//! Target configuration storage.
//!
//! The target is the platform API a push goes to, plus the token used to
//! talk to it. It is read from the environment or from
//! `~/.appbits/target.json` (or a custom config directory).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Full target as JSON
pub const ENV_TARGET: &str = "APPBITS_TARGET";
pub const ENV_API_URL: &str = "APPBITS_API_URL";
pub const ENV_TOKEN: &str = "APPBITS_TOKEN";

const TARGET_FILE: &str = "target.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(alias = "apiURL")]
    pub api_url: String,
    pub access_token: String,
    /// Free-form label for the org/space being targeted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
}

impl Target {
    fn is_valid(&self) -> bool {
        !self.api_url.is_empty() && !self.access_token.is_empty()
    }
}

pub struct TargetStore {
    target_path: PathBuf,
}

impl TargetStore {
    /// Create a new target store
    ///
    /// # Arguments
    /// * `config_dir` - Optional custom config directory. Defaults to ~/.appbits
    pub fn new(config_dir: Option<String>) -> Result<Self> {
        let base_dir = match config_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".appbits"),
        };

        std::fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", base_dir))?;

        Ok(Self {
            target_path: base_dir.join(TARGET_FILE),
        })
    }

    pub fn target_path(&self) -> &PathBuf {
        &self.target_path
    }

    fn parse_target(raw: &str) -> Option<Target> {
        match serde_json::from_str::<Target>(raw) {
            Ok(target) if target.is_valid() => Some(target),
            Ok(_) => {
                warn!("Target validation failed: missing api URL or token");
                None
            }
            Err(e) => {
                warn!("Failed to parse target JSON: {}", e);
                None
            }
        }
    }

    /// Get the current target
    ///
    /// Priority:
    /// 1. APPBITS_TARGET environment variable (JSON format)
    /// 2. APPBITS_API_URL + APPBITS_TOKEN environment variables
    /// 3. target.json file
    pub fn get_target(&self) -> Result<Option<Target>> {
        if let Ok(raw) = std::env::var(ENV_TARGET) {
            if let Some(target) = Self::parse_target(&raw) {
                debug!("Using target from {}", ENV_TARGET);
                return Ok(Some(target));
            }
        }

        if let (Ok(url), Ok(token)) = (std::env::var(ENV_API_URL), std::env::var(ENV_TOKEN)) {
            if !url.is_empty() && !token.is_empty() {
                debug!("Using target from {} + {}", ENV_API_URL, ENV_TOKEN);
                return Ok(Some(Target {
                    api_url: url,
                    access_token: token,
                    space: None,
                }));
            }
        }

        if !self.target_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.target_path)
            .with_context(|| format!("Failed to read target file: {:?}", self.target_path))?;

        match Self::parse_target(&content) {
            Some(target) => Ok(Some(target)),
            None => {
                warn!("Invalid target file at {:?}, ignoring it", self.target_path);
                Ok(None)
            }
        }
    }

    pub fn save_target(&self, target: &Target) -> Result<()> {
        let content =
            serde_json::to_string_pretty(target).context("Failed to serialize target")?;

        std::fs::write(&self.target_path, content)
            .with_context(|| format!("Failed to write target file: {:?}", self.target_path))?;

        info!("Target saved to {:?}", self.target_path);
        Ok(())
    }

    pub fn remove_target(&self) -> Result<()> {
        if self.target_path.exists() {
            std::fs::remove_file(&self.target_path).with_context(|| {
                format!("Failed to remove target file: {:?}", self.target_path)
            })?;
        }

        info!("Target removed");
        Ok(())
    }
}
