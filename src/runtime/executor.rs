use std::process::ExitStatus;

use tracing::info;
use uuid::Uuid;

use crate::lib::{
    accelerate::{build_launcher_command, LaunchInvocation},
    errors::LaunchError,
    telemetry::LaunchSpan,
};

/// Exit status reported when the child's status does not fit a process exit code.
const UNKNOWN_TERMINATION_CODE: u8 = 1;

/// Spawn the launcher with inherited stdio, wait for it, and return its exit code.
pub async fn run_invocation(
    invocation: &LaunchInvocation,
    job_kind: &'static str,
) -> Result<u8, LaunchError> {
    let span = LaunchSpan::start(Uuid::new_v4(), job_kind);
    info!(
        target: "leia_launch::runtime",
        launch_id = %span.launch_id(),
        program = %invocation.program.display(),
        arg_count = invocation.args.len(),
        "Starting launcher"
    );

    let mut command = build_launcher_command(invocation);
    let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
        program: invocation.program.clone(),
        source,
    })?;
    let status = child.wait().await.map_err(|source| LaunchError::Wait {
        program: invocation.program.clone(),
        source,
    })?;

    span.finish(status.code());
    Ok(exit_code_for(status))
}

/// Our exit code for a finished launcher: its own code, or `128 + signal` on unix.
pub fn exit_code_for(status: ExitStatus) -> u8 {
    match status.code() {
        Some(code) => exit_code_from_code(code),
        None => signal_exit_code(&status).unwrap_or(UNKNOWN_TERMINATION_CODE),
    }
}

/// Codes outside `0..=255` (Windows statuses, negative values) must not truncate to success.
fn exit_code_from_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(UNKNOWN_TERMINATION_CODE)
}

#[cfg(unix)]
fn signal_exit_code(status: &ExitStatus) -> Option<u8> {
    use std::os::unix::process::ExitStatusExt;

    status
        .signal()
        .and_then(|signal| u8::try_from(128 + signal).ok())
}

#[cfg(not(unix))]
fn signal_exit_code(_status: &ExitStatus) -> Option<u8> {
    None
}

#[cfg(test)]
mod tests {
    #[cfg(unix)]
    use std::os::unix::process::ExitStatusExt;

    use super::*;

    #[test]
    fn out_of_range_codes_map_to_failure() {
        assert_eq!(exit_code_from_code(0), 0);
        assert_eq!(exit_code_from_code(7), 7);
        assert_eq!(exit_code_from_code(255), 255);
        assert_eq!(exit_code_from_code(256), UNKNOWN_TERMINATION_CODE);
        assert_eq!(exit_code_from_code(-1), UNKNOWN_TERMINATION_CODE);
        assert_eq!(exit_code_from_code(0xC000_0005_u32 as i32), UNKNOWN_TERMINATION_CODE);
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_is_propagated() {
        assert_eq!(exit_code_for(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code_for(ExitStatus::from_raw(3 << 8)), 3);
    }

    #[cfg(unix)]
    #[test]
    fn signal_maps_to_128_plus_signal() {
        // SIGKILL
        assert_eq!(exit_code_for(ExitStatus::from_raw(9)), 137);
    }

    #[tokio::test]
    async fn missing_launcher_is_a_spawn_error() {
        let invocation = LaunchInvocation::new("/nonexistent/leia-launch/accelerate");
        let err = run_invocation(&invocation, "train")
            .await
            .expect_err("program does not exist");
        assert!(matches!(err, LaunchError::Spawn { .. }), "{err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launcher_exit_code_is_returned() {
        let mut invocation = LaunchInvocation::new("sh");
        invocation.arg("-c").arg("exit 7");
        let code = run_invocation(&invocation, "train")
            .await
            .expect("sh is available");
        assert_eq!(code, 7);
    }
}
