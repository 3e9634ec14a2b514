//! Zip archive detection, extraction and packaging.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{PushError, Result};
use crate::push::platform::native_mode;

fn entry_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode)
}

#[derive(Debug, Clone, Default)]
pub struct Zipper;

impl Zipper {
    pub fn new() -> Self {
        Self
    }

    /// True when `path` is a regular file that opens as a zip archive.
    pub fn is_zip_file(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        match File::open(path) {
            Ok(file) => ZipArchive::new(file).is_ok(),
            Err(_) => false,
        }
    }

    /// Extract every entry of `archive` under `dest_dir`.
    ///
    /// Entries whose names would escape `dest_dir` are skipped. Unix modes
    /// stored in the archive are restored.
    pub fn unzip(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        let file = File::open(archive).map_err(PushError::fs("open", archive))?;
        let mut zip = ZipArchive::new(file).map_err(PushError::archive(archive))?;

        for idx in 0..zip.len() {
            let mut entry = zip.by_index(idx).map_err(PushError::archive(archive))?;

            let Some(relative) = entry.enclosed_name() else {
                warn!("Skipping archive entry outside destination: {}", entry.name());
                continue;
            };
            let out_path = dest_dir.join(&relative);

            if entry.is_dir() {
                fs::create_dir_all(&out_path)
                    .map_err(PushError::fs("create directory", &out_path))?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(PushError::fs("create directory", parent))?;
            }
            let mut out = File::create(&out_path).map_err(PushError::fs("create", &out_path))?;
            io::copy(&mut entry, &mut out).map_err(PushError::fs("extract", &out_path))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(PushError::fs("set permissions on", &out_path))?;
            }
        }

        debug!(
            "Extracted {} entries from {} into {}",
            zip.len(),
            archive.display(),
            dest_dir.display()
        );

        Ok(())
    }

    /// Package the contents of `dir` into a new zip at `zip_path`.
    ///
    /// Entries are written in sorted order with their permission bits.
    /// An empty directory yields a valid empty archive.
    pub fn zip_dir(&self, dir: &Path, zip_path: &Path) -> Result<()> {
        let zip_file = File::create(zip_path).map_err(PushError::fs("create", zip_path))?;
        let mut zip = ZipWriter::new(zip_file);

        let mut count = 0usize;
        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| PushError::Filesystem {
                action: "walk",
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            let relative = match path.strip_prefix(dir) {
                Ok(p) => p.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };

            let metadata = entry.metadata().map_err(|e| PushError::Filesystem {
                action: "stat",
                path: path.to_path_buf(),
                source: e.into(),
            })?;
            let options = entry_options(native_mode(&metadata));

            if entry.file_type().is_dir() {
                zip.add_directory(format!("{}/", relative), options)
                    .map_err(PushError::archive(zip_path))?;
            } else if entry.file_type().is_file() {
                zip.start_file(relative, options)
                    .map_err(PushError::archive(zip_path))?;
                let mut source = File::open(path).map_err(PushError::fs("open", path))?;
                io::copy(&mut source, &mut zip).map_err(PushError::fs("compress", path))?;
                count += 1;
            }
        }

        zip.finish().map_err(PushError::archive(zip_path))?;
        debug!("Packaged {} files into {}", count, zip_path.display());

        Ok(())
    }
}
