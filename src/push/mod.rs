//! Push preparation engine.
//!
//! This module decides which bytes of an application move to the platform:
//! - resolving the app path (directory or zip) with scoped cleanup
//! - scanning and fingerprinting local files
//! - diffing against files the server already stores
//! - staging and packaging the remainder
//! - reporting portable permission modes for reused files
//!
//! It also carries the route-parameter validation and route binding steps
//! of a push, which share no state with the diff engine.

mod actor;
mod appfiles;
mod gather;
mod path;
mod platform;
mod repository;
mod validate;
mod zipper;

// Re-exports
pub use actor::PushActor;
pub use appfiles::{compute_file_hash, AppFiles, CF_IGNORE_FILE, DEFAULT_IGNORED};
pub use gather::{partition_files, PreparedUpload, UploadPlan};
pub use path::{process_path, AppDir};
pub use platform::{format_mode, host, native_mode, PlatformAdapter, Posix, Windows};
pub use repository::{AppBitsRepository, RouteActor};
pub use validate::{validate_app_params, ValidationError};
pub use zipper::Zipper;
