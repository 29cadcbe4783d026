//! Accelerator detection and the mixed-precision policy derived from it.
mod probe;

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::{HardwareSection, ProbeKind},
    lib::env::EnvSource,
};

pub use probe::{
    parse_device_lines, DeviceProbe, EnvDeviceProbe, NvidiaSmiProbe, DEVICES_ENV_KEY,
};

/// Forces the env probe regardless of the settings file.
pub const PROBE_ENV_KEY: &str = "LEIA_DEVICE_PROBE";

/// Devices whose name contains this marker lack bf16 support.
const FP16_ONLY_MARKER: &str = "V100";

/// Mixed-precision mode for a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// bf16 plus the flash-attention-2 implementation.
    Bf16WithExtendedAttention,
    Fp16,
}

impl Precision {
    /// Fp16 as soon as one V100-class device is present, bf16 otherwise.
    pub fn for_devices<S: AsRef<str>>(devices: &[S]) -> Self {
        if devices
            .iter()
            .any(|name| name.as_ref().contains(FP16_ONLY_MARKER))
        {
            Precision::Fp16
        } else {
            Precision::Bf16WithExtendedAttention
        }
    }

    /// Value for `accelerate launch --mixed_precision`.
    pub const fn mixed_precision(&self) -> &'static str {
        match self {
            Precision::Bf16WithExtendedAttention => "bf16",
            Precision::Fp16 => "fp16",
        }
    }

    /// Flags handed to the training entry point.
    pub const fn training_flags(&self) -> &'static [&'static str] {
        match self {
            Precision::Bf16WithExtendedAttention => &["--bf16", "--use_flash_attention_2"],
            Precision::Fp16 => &["--fp16"],
        }
    }

    pub const fn uses_extended_attention(&self) -> bool {
        matches!(self, Precision::Bf16WithExtendedAttention)
    }
}

/// What the probe found on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareProfile {
    pub devices: Vec<String>,
    pub precision: Precision,
}

impl HardwareProfile {
    pub fn from_devices(devices: Vec<String>) -> Self {
        let precision = Precision::for_devices(devices.as_slice());
        Self { devices, precision }
    }

    pub fn device_count(&self) -> u32 {
        u32::try_from(self.devices.len()).unwrap_or(u32::MAX)
    }
}

/// Run `probe`; a failing probe counts as a host with no devices.
pub fn detect_with_probe<P: DeviceProbe + ?Sized>(probe: &P) -> HardwareProfile {
    let devices = probe.list_devices().unwrap_or_else(|err| {
        warn!(
            target: "leia_launch::hardware",
            reason = %err,
            "Device probe failed; continuing with no detected devices"
        );
        Vec::new()
    });
    let profile = HardwareProfile::from_devices(devices);
    info!(
        target: "leia_launch::hardware",
        device_count = profile.devices.len(),
        devices = ?profile.devices,
        mixed_precision = profile.precision.mixed_precision(),
        "Detected accelerator devices"
    );
    profile
}

/// Pick the probe from settings (or `LEIA_DEVICE_PROBE`) and detect.
pub fn detect<E: EnvSource>(settings: &HardwareSection, env: &E) -> HardwareProfile {
    match probe_kind(settings, env) {
        ProbeKind::Env => detect_with_probe(&EnvDeviceProbe::new(env)),
        ProbeKind::System => detect_with_probe(&NvidiaSmiProbe::new(&settings.nvidia_smi_path)),
    }
}

/// `LEIA_DEVICE_PROBE` wins over settings; an unrecognized value is logged and ignored.
fn probe_kind<E: EnvSource>(settings: &HardwareSection, env: &E) -> ProbeKind {
    let Some(value) = env.get(PROBE_ENV_KEY) else {
        return settings.probe;
    };
    ProbeKind::parse(&value).unwrap_or_else(|| {
        warn!(
            target: "leia_launch::hardware",
            key = PROBE_ENV_KEY,
            value = %value,
            fallback = settings.probe.as_str(),
            "Unrecognized device probe override; using configured probe"
        );
        settings.probe
    })
}
