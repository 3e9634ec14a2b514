//! Local application file scanning and copying.
//!
//! Uses `ignore::WalkBuilder` with the root `.cfignore` applied while
//! walking. Only the ignore file at the application root counts; nested
//! `.cfignore` and `.gitignore` files are not honoured.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::AppFile;
use crate::error::{PushError, Result};

/// Ignore file read from the application root.
pub const CF_IGNORE_FILE: &str = ".cfignore";

/// Paths never uploaded as application files, regardless of `.cfignore`.
pub const DEFAULT_IGNORED: &[&str] = &[
    ".cfignore",
    "_darcs",
    ".DS_Store",
    ".git",
    ".gitignore",
    ".hg",
    "manifest.yml",
    ".svn",
];

/// Turn a `/`-separated relative path into a platform path.
pub fn relative_path_buf(relative: &str) -> PathBuf {
    relative.split('/').filter(|part| !part.is_empty()).collect()
}

/// Hex-encoded SHA-256 of a file's contents
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(PushError::fs("open", path))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(PushError::fs("read", path))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Map an `ignore` error onto `PushError::Filesystem`, keeping the path the
/// walker reported when there is one.
fn ignore_error(action: &'static str, fallback: &Path, err: ignore::Error) -> PushError {
    let path = error_path(&err).unwrap_or(fallback).to_path_buf();
    let message = err.to_string();
    PushError::Filesystem {
        action,
        path,
        source: err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(message)),
    }
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

/// Load `.cfignore` from the application root, if present.
fn root_cfignore(root: &Path) -> Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    let ignore_file = root.join(CF_IGNORE_FILE);
    if ignore_file.is_file() {
        match builder.add(&ignore_file) {
            Some(err) if err.is_io() => return Err(ignore_error("read", &ignore_file, err)),
            Some(err) => warn!("Skipping invalid {} patterns: {}", CF_IGNORE_FILE, err),
            None => {}
        }
    }
    builder
        .build()
        .map_err(|err| ignore_error("read", &ignore_file, err))
}

/// Scans application directories and copies selected files out of them.
#[derive(Debug, Clone, Default)]
pub struct AppFiles;

impl AppFiles {
    pub fn new() -> Self {
        Self
    }

    fn build_walker(&self, root: &Path) -> Result<WalkBuilder> {
        let cfignore = root_cfignore(root)?;
        let mut builder = WalkBuilder::new(root);

        builder.standard_filters(false);
        builder.hidden(false);
        builder.follow_links(false);
        builder.sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| {
            entry.depth() == 0
                || !cfignore
                    .matched(entry.path(), entry.file_type().is_some_and(|t| t.is_dir()))
                    .is_ignore()
        });

        let mut overrides = OverrideBuilder::new(root);
        for pattern in DEFAULT_IGNORED {
            if let Err(e) = overrides.add(&format!("!{}", pattern)) {
                warn!("Failed to add default ignore rule '{}': {}", pattern, e);
            }
        }
        match overrides.build() {
            Ok(overrides) => {
                builder.overrides(overrides);
            }
            Err(e) => warn!("Failed to build default ignore rules: {}", e),
        }

        Ok(builder)
    }

    /// Fingerprint every regular file under `root`.
    ///
    /// Symlinks are not followed and produce no record. Any directory or file
    /// that cannot be read fails the whole scan.
    pub fn app_files_in_dir(&self, root: &Path) -> Result<Vec<AppFile>> {
        let mut files = Vec::new();

        debug!("Scanning application directory: {}", root.display());

        for entry in self.build_walker(root)?.build() {
            let entry = entry.map_err(|e| ignore_error("walk", root, e))?;

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let relative = match path.strip_prefix(root) {
                Ok(p) => p.to_string_lossy().replace('\\', "/"),
                Err(_) => {
                    warn!("Failed to get relative path for {}", path.display());
                    continue;
                }
            };

            let metadata = entry.metadata().map_err(|e| ignore_error("stat", path, e))?;

            files.push(AppFile {
                hash: compute_file_hash(path)?,
                size: metadata.len(),
                path: relative,
            });
        }

        debug!("Found {} application files", files.len());

        Ok(files)
    }

    /// Copy `files` from `from_dir` into `to_dir`, keeping relative paths.
    ///
    /// `fs::copy` carries permission bits across with the contents.
    pub fn copy_files(&self, files: &[AppFile], from_dir: &Path, to_dir: &Path) -> Result<()> {
        for file in files {
            let relative = relative_path_buf(&file.path);
            let source = from_dir.join(&relative);
            let target = to_dir.join(&relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(PushError::fs("create directory", parent))?;
            }
            fs::copy(&source, &target).map_err(PushError::fs("copy", &source))?;
        }

        debug!(
            "Copied {} files from {} to {}",
            files.len(),
            from_dir.display(),
            to_dir.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative_path_buf(relative));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn paths(files: &[AppFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_scan_fingerprints_regular_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.rb", "puts 1\n");
        write(dir.path(), "lib/helper.rb", "module Helper; end\n");

        let files = AppFiles::new().app_files_in_dir(dir.path()).unwrap();
        assert_eq!(paths(&files), vec!["app.rb", "lib/helper.rb"]);

        let app = &files[0];
        assert_eq!(app.size, 7);
        assert_eq!(app.hash.len(), 64);
        assert_eq!(app.hash, compute_file_hash(&dir.path().join("app.rb")).unwrap());
    }

    #[test]
    fn test_scan_applies_default_exclusions() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.rb", "x");
        write(dir.path(), ".git/config", "x");
        write(dir.path(), "manifest.yml", "x");
        write(dir.path(), ".cfignore", "");
        write(dir.path(), ".env", "x");

        let files = AppFiles::new().app_files_in_dir(dir.path()).unwrap();
        assert_eq!(paths(&files), vec![".env", "app.rb"]);
    }

    #[test]
    fn test_scan_honours_cfignore_not_gitignore() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".cfignore", "*.log\ntmp/\n");
        write(dir.path(), ".gitignore", "vendor/\n");
        write(dir.path(), "debug.log", "x");
        write(dir.path(), "tmp/cache", "x");
        write(dir.path(), "vendor/lib.rb", "x");
        write(dir.path(), "app.rb", "x");

        let files = AppFiles::new().app_files_in_dir(dir.path()).unwrap();
        assert_eq!(paths(&files), vec!["app.rb", "vendor/lib.rb"]);
    }

    #[test]
    fn test_scan_ignores_nested_cfignore() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sub/.cfignore", "*.rb\n");
        write(dir.path(), "sub/app.rb", "x");
        write(dir.path(), "top.rb", "x");

        let files = AppFiles::new().app_files_in_dir(dir.path()).unwrap();
        assert_eq!(paths(&files), vec!["sub/app.rb", "top.rb"]);
    }

    #[test]
    fn test_root_cfignore_matches_nested_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".cfignore", "*.rb\n");
        write(dir.path(), "sub/app.rb", "x");
        write(dir.path(), "sub/readme.md", "x");

        let files = AppFiles::new().app_files_in_dir(dir.path()).unwrap();
        assert_eq!(paths(&files), vec!["sub/readme.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_fails_on_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "top.rb", "x");
        write(dir.path(), "secret/app.rb", "x");
        let secret = dir.path().join("secret");
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read the directory regardless of its mode
        if fs::read_dir(&secret).is_ok() {
            fs::set_permissions(&secret, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = AppFiles::new().app_files_in_dir(dir.path());
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o755)).unwrap();

        match result.unwrap_err() {
            PushError::Filesystem { action, path, .. } => {
                assert_eq!(action, "walk");
                assert_eq!(path, secret);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_symlinks() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "real.txt", "x");
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let files = AppFiles::new().app_files_in_dir(dir.path()).unwrap();
        assert_eq!(paths(&files), vec!["real.txt"]);
    }

    #[test]
    fn test_copy_files_preserves_structure() {
        let from = TempDir::new().unwrap();
        let to = TempDir::new().unwrap();
        write(from.path(), "a.txt", "aaa");
        write(from.path(), "nested/deep/b.txt", "bbb");
        write(from.path(), "skipped.txt", "ccc");

        let files = AppFiles::new().app_files_in_dir(from.path()).unwrap();
        let selected: Vec<AppFile> = files
            .into_iter()
            .filter(|f| f.path != "skipped.txt")
            .collect();

        AppFiles::new()
            .copy_files(&selected, from.path(), to.path())
            .unwrap();

        assert_eq!(fs::read_to_string(to.path().join("a.txt")).unwrap(), "aaa");
        assert_eq!(
            fs::read_to_string(to.path().join("nested").join("deep").join("b.txt")).unwrap(),
            "bbb"
        );
        assert!(!to.path().join("skipped.txt").exists());
    }

    #[test]
    fn test_copy_missing_file_fails() {
        let from = TempDir::new().unwrap();
        let to = TempDir::new().unwrap();
        let ghost = AppFile {
            path: "ghost.txt".to_string(),
            hash: "h".to_string(),
            size: 1,
        };

        let err = AppFiles::new()
            .copy_files(&[ghost], from.path(), to.path())
            .unwrap_err();
        assert!(matches!(err, PushError::Filesystem { action: "copy", .. }));
    }
}
