use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolve the application path argument, defaulting to the current directory.
pub fn resolve_app_path(path: Option<String>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    if !path.exists() {
        anyhow::bail!("Application path does not exist: {}", path.display());
    }

    Ok(path)
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_missing_path_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope").to_string_lossy().to_string();
        assert!(resolve_app_path(Some(missing)).is_err());
    }
}
