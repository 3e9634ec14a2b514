//! The push actor: one entry point for every step of preparing a push.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{AppFileResource, AppParams, Application};
use crate::error::{PushError, Result};

use super::appfiles::AppFiles;
use super::path;
use super::platform::{self, PlatformAdapter};
use super::repository::{AppBitsRepository, RouteActor};
use super::validate::{validate_app_params, ValidationError};
use super::zipper::Zipper;

/// Aggregates the collaborators a push needs.
///
/// Holds no per-push state, so one actor can serve concurrent pushes of
/// different applications as long as each uses its own directories.
#[derive(Clone)]
pub struct PushActor {
    pub(super) app_bits: Arc<dyn AppBitsRepository>,
    pub(super) route_actor: Option<Arc<dyn RouteActor>>,
    pub(super) app_files: AppFiles,
    pub(super) zipper: Zipper,
    pub(super) platform: Arc<dyn PlatformAdapter>,
}

impl PushActor {
    /// Create an actor for the host platform.
    pub fn new(app_bits: Arc<dyn AppBitsRepository>) -> Self {
        Self::with_platform(app_bits, platform::host())
    }

    pub fn with_platform(
        app_bits: Arc<dyn AppBitsRepository>,
        platform: Arc<dyn PlatformAdapter>,
    ) -> Self {
        debug!("Creating push actor for {} host", platform.name());
        Self {
            app_bits,
            route_actor: None,
            app_files: AppFiles::new(),
            zipper: Zipper::new(),
            platform,
        }
    }

    /// Route steps are only available once a route actor is attached.
    pub fn with_route_actor(mut self, route_actor: Arc<dyn RouteActor>) -> Self {
        self.route_actor = Some(route_actor);
        self
    }

    pub fn app_files(&self) -> &AppFiles {
        &self.app_files
    }

    pub fn zipper(&self) -> &Zipper {
        &self.zipper
    }

    /// Run `f` with the application directory for `dir_or_zip`.
    ///
    /// See [`path::process_path`] for the cleanup guarantees.
    pub async fn process_path<F, Fut, T>(&self, dir_or_zip: &Path, f: F) -> Result<T>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        path::process_path(&self.zipper, dir_or_zip, f).await
    }

    pub async fn upload_app(
        &self,
        app_guid: &str,
        zip_file: &Path,
        present_files: &[AppFileResource],
    ) -> Result<()> {
        info!(
            "Uploading {} for app {} ({} files reused)",
            zip_file.display(),
            app_guid,
            present_files.len()
        );
        self.app_bits
            .upload_bits(app_guid, zip_file, present_files)
            .await
            .map_err(PushError::Upload)
    }

    pub fn validate_app_params(&self, apps: &[AppParams]) -> Option<Vec<ValidationError>> {
        validate_app_params(apps)
    }

    /// Resolve `route_name`, find or create the route and bind it to `app`.
    ///
    /// Stops at the first failing step. Nothing is rolled back.
    pub async fn map_manifest_route(&self, route_name: &str, app: &Application) -> Result<()> {
        let resolution_error = |reason| PushError::RouteResolution {
            route: route_name.to_string(),
            reason,
        };

        let route_actor = self
            .route_actor
            .as_ref()
            .ok_or_else(|| resolution_error(anyhow::anyhow!("no route actor configured")))?;

        let (hostname, domain) = route_actor
            .find_domain(route_name)
            .await
            .map_err(resolution_error)?;

        let route = route_actor
            .find_or_create_route(&hostname, &domain, "", false)
            .await
            .map_err(resolution_error)?;

        debug!("Binding route {} to app {}", route.guid, app.name);
        route_actor
            .bind_route(app, &route)
            .await
            .map_err(|reason| PushError::RouteBind {
                route: route_name.to_string(),
                reason,
            })
    }
}

impl std::fmt::Debug for PushActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushActor")
            .field("platform", &self.platform.name())
            .finish()
    }
}
