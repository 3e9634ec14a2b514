//! Error taxonomy for the push engine.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::push::ValidationError;

/// Result type alias for push operations
pub type Result<T> = std::result::Result<T, PushError>;

/// Every way preparing or uploading application bits can fail.
///
/// Collaborator failures (`RemoteLookup`, `Upload`, `RouteResolution`,
/// `RouteBind`) carry the collaborator's error unchanged.
#[derive(Debug, Error)]
pub enum PushError {
    /// Symlink resolution, temp dir lifecycle, copy or stat failure
    #[error("Failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to look up files already on the server: {0:#}")]
    RemoteLookup(anyhow::Error),

    #[error("Failed to upload application bits: {0:#}")]
    Upload(anyhow::Error),

    #[error("{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Failed to resolve route {route}: {reason:#}")]
    RouteResolution { route: String, reason: anyhow::Error },

    #[error("Failed to bind route {route}: {reason:#}")]
    RouteBind { route: String, reason: anyhow::Error },

    /// The callback failed and removing the temporary directory failed too.
    #[error("{primary} (cleanup also failed: {cleanup})")]
    CleanupAfterFailure {
        #[source]
        primary: Box<PushError>,
        cleanup: Box<PushError>,
    },
}

impl PushError {
    /// Build a closure mapping an I/O error to `PushError::Filesystem`.
    pub(crate) fn fs(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| PushError::Filesystem {
            action,
            path,
            source,
        }
    }

    pub(crate) fn archive(path: &Path) -> impl FnOnce(zip::result::ZipError) -> Self {
        let path = path.to_path_buf();
        move |source| PushError::Archive { path, source }
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
