//! Domain types shared across modules.
//!
//! These structures are used by the push engine, the API client and the
//! CLI commands. Keeping them here avoids circular dependencies between
//! those modules.

use serde::{Deserialize, Serialize};

/// A regular file found by scanning an application directory.
///
/// `path` is relative to the application root and always uses `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppFile {
    pub path: String,
    /// Hex-encoded SHA-256 of the file contents
    pub hash: String,
    pub size: u64,
}

/// A file fingerprint as exchanged with the platform.
///
/// The hash travels in the `sha1` field for wire compatibility with the
/// resource matching endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFileResource {
    #[serde(rename = "fn")]
    pub path: String,
    #[serde(rename = "sha1")]
    pub hash: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl From<&AppFile> for AppFileResource {
    fn from(file: &AppFile) -> Self {
        Self {
            path: file.path.clone(),
            hash: file.hash.clone(),
            size: file.size,
            mode: None,
        }
    }
}

/// User-declared deployment intent for one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppParams {
    pub name: String,
    #[serde(default)]
    pub routes: Vec<String>,
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
    #[serde(default)]
    pub domains: Option<Vec<String>>,
    #[serde(default)]
    pub no_hostname: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub guid: String,
    pub host: String,
    pub domain: Domain,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_file_resource_wire_names() {
        let resource = AppFileResource {
            path: "app.rb".to_string(),
            hash: "abc".to_string(),
            size: 12,
            mode: None,
        };

        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["fn"], "app.rb");
        assert_eq!(json["sha1"], "abc");
        assert_eq!(json["size"], 12);
        assert!(json.get("mode").is_none());
    }

    #[test]
    fn test_app_params_defaults() {
        let params: AppParams =
            serde_json::from_str(r#"{"name": "web", "no-hostname": true}"#).unwrap();
        assert_eq!(params.name, "web");
        assert!(params.routes.is_empty());
        assert!(params.hosts.is_none());
        assert!(params.no_hostname);
    }
}
