//! Load and validate launcher settings.
use std::path::PathBuf;

use serde::Deserialize;
use tracing::error;

use crate::lib::errors::ConfigError;

pub mod hardware;
pub mod launcher;
pub mod telemetry;

pub use hardware::{
    parse_hardware_section, HardwareSection, ProbeKind, RawHardwareSection,
    DEFAULT_NVIDIA_SMI_PATH,
};
pub use launcher::{
    parse_launcher_section, LauncherSection, RawLauncherSection, DEFAULT_EVALUATE_SCRIPT,
    DEFAULT_LAUNCHER_PROGRAM, DEFAULT_TRAIN_SCRIPT,
};

pub const CONFIG_ENV_KEY: &str = "LEIA_LAUNCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "launch.toml";

/// Top-level settings container.
#[derive(Debug, Clone, Default)]
pub struct LaunchSettings {
    pub launcher: LauncherSection,
    pub hardware: HardwareSection,
    /// `None` when no settings file was read and built-in defaults apply.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawLaunchSettings {
    launcher: Option<RawLauncherSection>,
    hardware: Option<RawHardwareSection>,
}

impl LaunchSettings {
    /// Load settings for a resolved path.
    ///
    /// `explicit` marks paths named via `--config` or `LEIA_LAUNCH_CONFIG`; those must exist.
    /// A missing implicit `launch.toml` falls back to built-in defaults.
    pub fn load(path: PathBuf, explicit: bool) -> Result<Self, ConfigError> {
        telemetry::log_source(&path, explicit);
        if !path.exists() {
            if explicit {
                let err = ConfigError::NotFound { path: path.clone() };
                error!(
                    target: "leia_launch::config",
                    path = %path.display(),
                    reason = %err,
                    "Configuration file not found"
                );
                return Err(err);
            }
            let settings = Self::default();
            telemetry::log_defaults(&settings);
            return Ok(settings);
        }
        Self::load_from_path(path)
    }

    /// Load settings from a specific, existing path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let builder = config::Config::builder().add_source(config::File::from(path.clone()));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "leia_launch::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawLaunchSettings = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "leia_launch::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let settings = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "leia_launch::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&settings);
        Ok(settings)
    }

    fn from_raw(raw: RawLaunchSettings, path: PathBuf) -> Result<Self, ConfigError> {
        let launcher = parse_launcher_section(raw.launcher, &path)?;
        let hardware = parse_hardware_section(raw.hardware, &path)?;

        Ok(Self {
            launcher,
            hardware,
            source_path: Some(path),
        })
    }
}
