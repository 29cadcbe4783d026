use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_LAUNCHER_PROGRAM: &str = "accelerate";
pub const DEFAULT_TRAIN_SCRIPT: &str = "train.py";
pub const DEFAULT_EVALUATE_SCRIPT: &str = "evaluate.py";

/// Launcher executable and entry points.
#[derive(Debug, Clone)]
pub struct LauncherSection {
    pub program: PathBuf,
    pub train_script: PathBuf,
    pub evaluate_script: PathBuf,
}

impl Default for LauncherSection {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_LAUNCHER_PROGRAM),
            train_script: PathBuf::from(DEFAULT_TRAIN_SCRIPT),
            evaluate_script: PathBuf::from(DEFAULT_EVALUATE_SCRIPT),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawLauncherSection {
    pub program: Option<PathBuf>,
    pub train_script: Option<PathBuf>,
    pub evaluate_script: Option<PathBuf>,
}

pub fn parse_launcher_section(
    raw: Option<RawLauncherSection>,
    path: &Path,
) -> Result<LauncherSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = LauncherSection::default();

    let program = raw.program.unwrap_or(defaults.program);
    validate_non_empty(path, "launcher.program", &program)?;

    let train_script = raw.train_script.unwrap_or(defaults.train_script);
    validate_non_empty(path, "launcher.train_script", &train_script)?;

    let evaluate_script = raw.evaluate_script.unwrap_or(defaults.evaluate_script);
    validate_non_empty(path, "launcher.evaluate_script", &evaluate_script)?;

    Ok(LauncherSection {
        program,
        train_script,
        evaluate_script,
    })
}

pub(super) fn validate_non_empty(
    path: &Path,
    field: &'static str,
    value: &Path,
) -> Result<(), ConfigError> {
    if !value.as_os_str().is_empty() {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field,
        message: "Must not be empty".into(),
    })
}
