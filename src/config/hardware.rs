use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

use super::launcher::validate_non_empty;

pub const DEFAULT_NVIDIA_SMI_PATH: &str = "nvidia-smi";

/// Which device probe lists accelerators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeKind {
    /// Query `nvidia-smi`.
    #[default]
    System,
    /// Read device names from `LEIA_DEVICES`.
    Env,
}

impl ProbeKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" | "nvidia-smi" => Some(Self::System),
            "env" | "mock" => Some(Self::Env),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::System => "system",
            ProbeKind::Env => "env",
        }
    }
}

/// Hardware detection settings.
#[derive(Debug, Clone)]
pub struct HardwareSection {
    pub probe: ProbeKind,
    pub nvidia_smi_path: PathBuf,
}

impl Default for HardwareSection {
    fn default() -> Self {
        Self {
            probe: ProbeKind::System,
            nvidia_smi_path: PathBuf::from(DEFAULT_NVIDIA_SMI_PATH),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawHardwareSection {
    pub probe: Option<String>,
    pub nvidia_smi_path: Option<PathBuf>,
}

pub fn parse_hardware_section(
    raw: Option<RawHardwareSection>,
    path: &Path,
) -> Result<HardwareSection, ConfigError> {
    let raw = raw.unwrap_or_default();

    let probe = match raw.probe {
        Some(value) => ProbeKind::parse(&value).ok_or_else(|| ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "hardware.probe",
            message: format!("Unknown probe `{value}`; use \"system\" or \"env\""),
        })?,
        None => ProbeKind::default(),
    };

    let nvidia_smi_path = raw
        .nvidia_smi_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_NVIDIA_SMI_PATH));
    validate_non_empty(path, "hardware.nvidia_smi_path", &nvidia_smi_path)?;

    Ok(HardwareSection {
        probe,
        nvidia_smi_path,
    })
}
