use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result};
use serde_json::Value;

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_leia-launch");

/// Minimal training environment that passes validation.
pub const TRAIN_ENV: &[(&str, &str)] = &[
    ("RUN_NAME", "exp1"),
    ("MODEL_NAME_OR_PATH", "org/modelA"),
    ("LANGUAGE", "fr"),
];

/// Command with a scrubbed environment, the env device probe, and `cwd` as working directory.
pub fn launcher_command(cwd: &Path, devices: &str, vars: &[(&str, &str)]) -> Command {
    let mut command = Command::new(BINARY_PATH);
    command.env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        command.env("PATH", path);
    }
    command
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .env("LEIA_DEVICE_PROBE", "env")
        .env("LEIA_DEVICES", devices);
    for (key, value) in vars {
        command.env(key, value);
    }
    command
}

pub fn run(command: &mut Command) -> Result<Output> {
    command.output().context("failed to run leia-launch")
}

/// Parse the `--dry-run` JSON payload.
pub fn dry_run_payload(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).with_context(|| {
        format!(
            "stdout is not JSON: {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// Arguments from a dry-run payload as owned strings.
pub fn payload_args(payload: &Value) -> Vec<String> {
    payload
        .get("args")
        .and_then(Value::as_array)
        .map(|args| {
            args.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
        .filter(|value| !value.starts_with("--"))
}

pub fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}
