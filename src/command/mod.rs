mod preview;
mod push;
mod target;
mod validate;

pub use preview::run_preview;
pub use push::run_push;
pub use target::run_target;
pub use validate::{parse_app_params, run_validate};
