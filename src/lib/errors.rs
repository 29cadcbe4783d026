use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating the launcher settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file {path} does not exist")]
    NotFound { path: PathBuf },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Missing or malformed job settings detected before anything is launched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchConfigError {
    #[error("{name} is not set")]
    MissingRequired { name: &'static str },
    #[error("LANGUAGE is not set (required when WIKIPEDIA_DATASET_DIR is not set)")]
    MissingLanguage,
    #[error("{name} has an invalid value `{value}`: {message}")]
    InvalidValue {
        name: &'static str,
        value: String,
        message: String,
    },
}

/// Failures while listing accelerator devices.
#[derive(Debug, Error)]
pub enum DeviceProbeError {
    #[error("Failed to run {program}: {source}")]
    CommandUnavailable {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited abnormally (exit={exit_code:?}): {stderr}")]
    CommandFailed {
        program: PathBuf,
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Failures while handing off to the external launcher process.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to start launcher {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed while waiting for launcher {program}: {source}")]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}
