mod args;
mod paths;

pub use args::{Cli, Commands, TargetAction};
pub use paths::{format_size, resolve_app_path};
