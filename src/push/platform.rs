//! Host platform adapters.
//!
//! Everything that differs between Windows and POSIX hosts while gathering
//! files lives behind [`PlatformAdapter`]: the path handed to `lstat` and the
//! permission string reported to the server.

use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extended-length path marker that lifts the legacy `MAX_PATH` limit.
pub const WINDOWS_PATH_PREFIX: &str = r"\\?\";

/// Extended-length form of a `\\server\share` UNC path.
pub const WINDOWS_UNC_PREFIX: &str = r"\\?\UNC\";

/// Permission bits kept when reading native modes.
pub const PERMISSION_BITS: u32 = 0o777;

/// Owner read/write/execute, forced on for Windows hosts.
const WINDOWS_OWNER_BITS: u32 = 0o700;

pub trait PlatformAdapter: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Path to pass to low-level stat calls for an absolute path.
    fn stat_path(&self, absolute: &Path) -> PathBuf;

    /// Portable permission string for native mode bits. Must not touch the
    /// filesystem.
    fn portable_mode(&self, native: u32) -> String;
}

/// Linux, macOS and other POSIX hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

impl PlatformAdapter for Posix {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn stat_path(&self, absolute: &Path) -> PathBuf {
        absolute.to_path_buf()
    }

    fn portable_mode(&self, native: u32) -> String {
        format_mode(native)
    }
}

/// Windows hosts, whose filesystem has no faithful POSIX owner bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

impl PlatformAdapter for Windows {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn stat_path(&self, absolute: &Path) -> PathBuf {
        let raw = absolute.as_os_str().to_string_lossy();
        if raw.starts_with(WINDOWS_PATH_PREFIX) {
            return absolute.to_path_buf();
        }
        if let Some(share) = raw.strip_prefix(r"\\") {
            return PathBuf::from(format!("{}{}", WINDOWS_UNC_PREFIX, share));
        }
        let mut prefixed = OsString::from(WINDOWS_PATH_PREFIX);
        prefixed.push(absolute.as_os_str());
        PathBuf::from(prefixed)
    }

    fn portable_mode(&self, native: u32) -> String {
        format_mode(native | WINDOWS_OWNER_BITS)
    }
}

/// Adapter for the platform this binary was built for.
pub fn host() -> Arc<dyn PlatformAdapter> {
    if cfg!(windows) {
        Arc::new(Windows)
    } else {
        Arc::new(Posix)
    }
}

/// Format mode bits as octal with a leading zero (`0644`); zero stays `0`.
pub fn format_mode(mode: u32) -> String {
    if mode == 0 {
        "0".to_string()
    } else {
        format!("0{:o}", mode)
    }
}

/// Permission bits of a filesystem entry as reported by the host.
#[cfg(unix)]
pub fn native_mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & PERMISSION_BITS
}

/// Permission bits of a filesystem entry as reported by the host.
///
/// Non-unix hosts only expose a read-only flag, mapped the same way Go's
/// `os.FileMode` does on Windows.
#[cfg(not(unix))]
pub fn native_mode(metadata: &Metadata) -> u32 {
    let mut mode = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    if metadata.is_dir() {
        mode |= 0o111;
    }
    mode
}
