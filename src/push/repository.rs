//! Seams to the remote platform.
//!
//! The push engine never talks HTTP itself; it goes through these traits so
//! the transport can be swapped or mocked.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{AppFileResource, Application, Domain, Route};

/// Application bits storage on the platform.
#[async_trait]
pub trait AppBitsRepository: Send + Sync {
    /// Return the subset of `files` the server already stores, matched by
    /// path and hash. Order of the response is not significant.
    async fn get_application_files(
        &self,
        files: &[AppFileResource],
    ) -> Result<Vec<AppFileResource>>;

    /// Upload a packaged application along with the files it reuses.
    async fn upload_bits(
        &self,
        app_guid: &str,
        zip_file: &Path,
        present_files: &[AppFileResource],
    ) -> Result<()>;
}

/// Route lookup and binding on the platform.
#[async_trait]
pub trait RouteActor: Send + Sync {
    /// Split a route name such as `www.example.com` into hostname and domain.
    async fn find_domain(&self, route_name: &str) -> Result<(String, Domain)>;

    async fn find_or_create_route(
        &self,
        hostname: &str,
        domain: &Domain,
        path: &str,
        use_random_port: bool,
    ) -> Result<Route>;

    async fn bind_route(&self, app: &Application, route: &Route) -> Result<()>;
}
