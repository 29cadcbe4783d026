//! CLI entrypoint module structure.
pub mod args;
pub mod profile;

pub use args::{JobCommand, LaunchArgs};
pub use profile::{resolve_config_path, JobKind, LaunchProfile};
