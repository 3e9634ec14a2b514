//! Resolution of the user-supplied application path.
//!
//! A push can start from a directory or from a zip archive. [`AppDir`] hides
//! the difference: directories resolve to an absolute, symlink-free path,
//! archives are extracted into a temporary directory that lives exactly as
//! long as the guard.

use std::env;
use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{PushError, Result};
use crate::push::zipper::Zipper;

/// Prefix for temporary extraction directories
pub const EXTRACT_DIR_PREFIX: &str = "unzipped-app";

/// Make `path` absolute relative to the current working directory.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(PushError::fs("read current directory for", path))?;
    Ok(cwd.join(path))
}

/// A resolved application directory.
///
/// When the input was an archive this owns the extraction directory.
/// Dropping the guard removes it on a best-effort basis; [`AppDir::close`]
/// removes it and reports failure.
#[derive(Debug)]
pub struct AppDir {
    path: PathBuf,
    extracted: Option<TempDir>,
}

impl AppDir {
    pub fn resolve(path: &Path, zipper: &Zipper) -> Result<Self> {
        if !zipper.is_zip_file(path) {
            let resolved = fs::canonicalize(path).map_err(PushError::fs("resolve", path))?;
            if !resolved.is_dir() {
                return Err(PushError::Filesystem {
                    action: "resolve",
                    path: path.to_path_buf(),
                    source: io::Error::other("not a directory or zip archive"),
                });
            }
            let path = absolute_path(&resolved)?;
            debug!("Using application directory {}", path.display());
            return Ok(Self {
                path,
                extracted: None,
            });
        }

        let temp = tempfile::Builder::new()
            .prefix(EXTRACT_DIR_PREFIX)
            .tempdir()
            .map_err(PushError::fs("create temporary directory for", path))?;

        // On failure `temp` is dropped here, which removes the directory.
        zipper.unzip(path, temp.path())?;

        debug!(
            "Extracted {} into {}",
            path.display(),
            temp.path().display()
        );

        Ok(Self {
            path: temp.path().to_path_buf(),
            extracted: Some(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this directory was extracted from an archive
    pub fn is_extracted(&self) -> bool {
        self.extracted.is_some()
    }

    /// Release the directory, removing it if it was extracted.
    pub fn close(self) -> Result<()> {
        match self.extracted {
            Some(temp) => temp
                .close()
                .map_err(PushError::fs("remove temporary directory", &self.path)),
            None => Ok(()),
        }
    }
}

/// Run `f` against the application directory named by `path`.
///
/// If `path` is an archive its extraction directory is removed afterwards on
/// every exit path. When both `f` and the removal fail, the result is
/// [`PushError::CleanupAfterFailure`] with `f`'s error as the primary cause.
pub async fn process_path<F, Fut, T>(zipper: &Zipper, path: &Path, f: F) -> Result<T>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let app_dir = AppDir::resolve(path, zipper)?;
    let outcome = f(app_dir.path().to_path_buf()).await;
    finish(app_dir, outcome)
}

fn finish<T>(app_dir: AppDir, outcome: Result<T>) -> Result<T> {
    match (outcome, app_dir.close()) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(e), Ok(())) => Err(e),
        (Ok(_), Err(cleanup)) => Err(cleanup),
        (Err(primary), Err(cleanup)) => {
            warn!("Cleanup failed after error: {}", cleanup);
            Err(PushError::CleanupAfterFailure {
                primary: Box::new(primary),
                cleanup: Box::new(cleanup),
            })
        }
    }
}
