use std::{path::PathBuf, process::Command};

use crate::lib::{env::EnvSource, errors::DeviceProbeError};

pub const DEVICES_ENV_KEY: &str = "LEIA_DEVICES";

/// Abstraction for listing accelerator device names.
pub trait DeviceProbe {
    fn list_devices(&self) -> Result<Vec<String>, DeviceProbeError>;
}

/// Probe that queries `nvidia-smi` on the real host.
pub struct NvidiaSmiProbe {
    program: PathBuf,
}

impl NvidiaSmiProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DeviceProbe for NvidiaSmiProbe {
    fn list_devices(&self) -> Result<Vec<String>, DeviceProbeError> {
        let output = Command::new(&self.program)
            .arg("--query-gpu=name")
            .arg("--format=csv,noheader")
            .output()
            .map_err(|source| DeviceProbeError::CommandUnavailable {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(DeviceProbeError::CommandFailed {
                program: self.program.clone(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(parse_device_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Probe that reads comma-separated device names from `LEIA_DEVICES`.
pub struct EnvDeviceProbe<'a, E: EnvSource> {
    env: &'a E,
}

impl<'a, E: EnvSource> EnvDeviceProbe<'a, E> {
    pub fn new(env: &'a E) -> Self {
        Self { env }
    }
}

impl<E: EnvSource> DeviceProbe for EnvDeviceProbe<'_, E> {
    fn list_devices(&self) -> Result<Vec<String>, DeviceProbeError> {
        let devices = self.env.get(DEVICES_ENV_KEY).unwrap_or_default();
        Ok(devices
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// One device name per non-empty line of `nvidia-smi --format=csv,noheader` output.
pub fn parse_device_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
