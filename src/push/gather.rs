//! Upload diffing: decide which local files must travel.
//!
//! The server reports which fingerprints it already stores. Everything else
//! is copied into a staging directory that becomes the upload artifact;
//! files the server has are sent back with locally observed modes so the
//! platform can restore permissions on reuse.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::domain::{AppFile, AppFileResource};
use crate::error::{PushError, Result};

use super::actor::PushActor;
use super::appfiles::{relative_path_buf, CF_IGNORE_FILE};
use super::path::absolute_path;
use super::platform::native_mode;

/// File name of the packaged artifact inside a [`PreparedUpload`]
pub const UPLOAD_ZIP_NAME: &str = "application.zip";

/// Outcome of diffing local files against the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPlan {
    /// Local files the server does not have
    pub files_to_upload: Vec<AppFile>,
    /// Files the server already has, in server order, with `mode` set
    pub present_files: Vec<AppFileResource>,
    /// True iff `files_to_upload` is non-empty
    pub has_changes: bool,
}

/// A staged and packaged upload. The artifact is removed on drop.
#[derive(Debug)]
pub struct PreparedUpload {
    pub plan: UploadPlan,
    workdir: TempDir,
}

impl PreparedUpload {
    pub fn zip_path(&self) -> PathBuf {
        self.workdir.path().join(UPLOAD_ZIP_NAME)
    }
}

/// Split `local_files` into files to upload and files the server reported.
///
/// A reported file is kept only when a local file has the same path and
/// hash; stale or mismatched reports are dropped, so their local file is
/// uploaded. Duplicate reports collapse to the first one.
pub fn partition_files(
    local_files: &[AppFile],
    remote_files: Vec<AppFileResource>,
) -> (Vec<AppFile>, Vec<AppFileResource>) {
    let local_by_path: HashMap<&str, &AppFile> = local_files
        .iter()
        .map(|file| (file.path.as_str(), file))
        .collect();

    let mut present_paths: HashSet<String> = HashSet::new();
    let mut present_files = Vec::new();

    for remote in remote_files {
        match local_by_path.get(remote.path.as_str()) {
            Some(local) if local.hash == remote.hash => {
                if present_paths.insert(remote.path.clone()) {
                    present_files.push(remote);
                }
            }
            Some(_) => debug!("Server hash differs for {}, uploading it", remote.path),
            None => debug!("Ignoring server-reported file not present locally: {}", remote.path),
        }
    }

    let files_to_upload = local_files
        .iter()
        .filter(|file| !present_paths.contains(&file.path))
        .cloned()
        .collect();

    (files_to_upload, present_files)
}

impl PushActor {
    /// Stage the files the server lacks into `upload_dir`.
    ///
    /// Fails fast on the first lookup, copy or stat error; nothing in
    /// `app_dir` or on the server is modified.
    pub async fn gather_files(
        &self,
        local_files: &[AppFile],
        app_dir: &Path,
        upload_dir: &Path,
    ) -> Result<UploadPlan> {
        let fingerprints: Vec<AppFileResource> =
            local_files.iter().map(AppFileResource::from).collect();

        let remote_files = self
            .app_bits
            .get_application_files(&fingerprints)
            .await
            .map_err(PushError::RemoteLookup)?;
        debug!("Server already has {} of {} files", remote_files.len(), local_files.len());

        let (files_to_upload, mut present_files) = partition_files(local_files, remote_files);

        self.app_files
            .copy_files(&files_to_upload, app_dir, upload_dir)?;

        let ignore_file = app_dir.join(CF_IGNORE_FILE);
        if ignore_file.is_file() {
            let target = upload_dir.join(CF_IGNORE_FILE);
            fs::copy(&ignore_file, &target).map_err(PushError::fs("copy", &ignore_file))?;
        }

        for file in &mut present_files {
            let full_path = absolute_path(&app_dir.join(relative_path_buf(&file.path)))?;
            let stat_path = self.platform.stat_path(&full_path);
            let metadata =
                fs::symlink_metadata(&stat_path).map_err(PushError::fs("stat", &stat_path))?;
            file.mode = Some(self.platform.portable_mode(native_mode(&metadata)));
        }

        let has_changes = !files_to_upload.is_empty();
        info!(
            "{} files to upload, {} already on the server",
            files_to_upload.len(),
            present_files.len()
        );

        Ok(UploadPlan {
            files_to_upload,
            present_files,
            has_changes,
        })
    }

    /// Scan `app_dir`, stage what the server lacks and package it.
    ///
    /// The archive is always produced, empty when nothing changed, so the
    /// upload request has the same shape either way.
    pub async fn prepare_upload(&self, app_dir: &Path) -> Result<PreparedUpload> {
        let local_files = self.app_files.app_files_in_dir(app_dir)?;

        let workdir = tempfile::Builder::new()
            .prefix("app-upload")
            .tempdir()
            .map_err(PushError::fs("create temporary directory for", app_dir))?;
        let staging = workdir.path().join("staging");
        fs::create_dir_all(&staging).map_err(PushError::fs("create directory", &staging))?;

        let plan = self.gather_files(&local_files, app_dir, &staging).await?;

        let prepared = PreparedUpload { plan, workdir };
        self.zipper.zip_dir(&staging, &prepared.zip_path())?;

        Ok(prepared)
    }
}
