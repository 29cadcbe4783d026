//! Shared helpers for building `accelerate launch` commands.

use std::{path::PathBuf, process::Stdio};

use serde::Serialize;
use tokio::process::Command;

/// Fully resolved launcher invocation: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append `flag value` as two separate arguments.
    pub fn flag(&mut self, flag: &str, value: impl Into<String>) -> &mut Self {
        self.args.push(flag.to_string());
        self.args.push(value.into());
        self
    }

    /// Append `flag value` only when a value exists.
    pub fn flag_opt(&mut self, flag: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.flag(flag, value);
        }
        self
    }
}

/// Distributed-launch control settings placed before the entry point.
pub struct AccelerateLaunchConfig<'a> {
    pub num_processes: &'a str,
    pub mixed_precision: &'a str,
    pub deepspeed_zero3: bool,
}

/// Start an `accelerate launch` invocation up to (but excluding) the entry point script.
pub fn begin_accelerate_launch(
    program: impl Into<PathBuf>,
    config: AccelerateLaunchConfig<'_>,
) -> LaunchInvocation {
    let mut invocation = LaunchInvocation::new(program);
    invocation.arg("launch");
    invocation.flag("--num_machines", "1");
    invocation.flag("--num_processes", config.num_processes);
    invocation.flag("--dynamo_backend", "no");
    if config.deepspeed_zero3 {
        invocation.arg("--use_deepspeed");
        invocation.flag("--zero_stage", "3");
        invocation.flag("--zero3_init_flag", "false");
        invocation.flag("--zero3_save_16bit_model", "true");
    }
    invocation.flag("--mixed_precision", config.mixed_precision);
    invocation
}

/// Build the process command; stdio is inherited so the launcher owns the terminal.
pub fn build_launcher_command(invocation: &LaunchInvocation) -> Command {
    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());
    command
}

/// Argument lookups used by tests across the crate.
#[cfg(test)]
impl LaunchInvocation {
    /// Position of the first occurrence of `flag`.
    pub fn position(&self, flag: &str) -> Option<usize> {
        self.args.iter().position(|arg| arg == flag)
    }

    /// Value following the first occurrence of `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.values_of(flag).into_iter().next()
    }

    /// Values following every occurrence of `flag`; bare switches have none.
    pub fn values_of(&self, flag: &str) -> Vec<&str> {
        self.args
            .windows(2)
            .filter(|pair| pair[0] == flag && !pair[1].starts_with("--"))
            .map(|pair| pair[1].as_str())
            .collect()
    }
}
