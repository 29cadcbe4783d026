//! LaunchProfile and settings path resolution.
use std::{env, path::PathBuf};

use anyhow::{Context, Result};

use crate::{
    config::{CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH},
    lib::env::EnvSource,
};

/// Job selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Train,
    Evaluate,
}

impl JobKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            JobKind::Train => "train",
            JobKind::Evaluate => "evaluate",
        }
    }
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub config_path: PathBuf,
    /// True when the path came from `--config` or `LEIA_LAUNCH_CONFIG`.
    pub config_explicit: bool,
    pub dry_run: bool,
    pub job: JobKind,
}

/// Resolve settings path in the order: CLI override → env var → default.
pub fn resolve_config_path<E: EnvSource>(
    override_path: Option<PathBuf>,
    source: &E,
) -> Result<(PathBuf, bool)> {
    let (path, explicit) =
        match override_path.or_else(|| source.get(CONFIG_ENV_KEY).map(PathBuf::from)) {
            Some(path) => (path, true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

    if path.is_absolute() {
        return Ok((path, explicit));
    }

    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok((cwd.join(path), explicit))
}
