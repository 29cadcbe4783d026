//! Telemetry initialization and launch span helpers.

use std::{borrow::Cow, time::Instant};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of a launcher handoff.
pub struct LaunchSpan {
    span: Span,
    started_at: Instant,
    launch_id: Uuid,
}

impl LaunchSpan {
    /// Start a launch span.
    pub fn start(launch_id: Uuid, job_kind: &'static str) -> Self {
        let span = info_span!(
            target: "leia_launch::runtime",
            "launch",
            %launch_id,
            job_kind
        );
        Self {
            span,
            started_at: Instant::now(),
            launch_id,
        }
    }

    pub fn launch_id(&self) -> Uuid {
        self.launch_id
    }

    /// Close the span while recording the launcher's exit code.
    pub fn finish(self, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        let status = if exit_code == Some(0) {
            "succeeded"
        } else {
            "failed"
        };
        info!(
            target: "leia_launch::runtime",
            launch_id = %self.launch_id,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Launcher exited"
        );
    }
}

/// Payload describing the resolved invocation, logged and printed for `--dry-run`.
#[derive(Debug, Serialize)]
pub struct InvocationTelemetry<'a> {
    pub job_kind: &'a str,
    pub program: Cow<'a, str>,
    pub num_processes: &'a str,
    pub precision: &'a str,
    pub args: &'a [String],
}

/// Emit the resolved invocation to `tracing`.
pub fn emit_invocation(telemetry: &InvocationTelemetry<'_>) {
    info!(
        target: "leia_launch::runtime",
        job_kind = telemetry.job_kind,
        program = %telemetry.program,
        num_processes = telemetry.num_processes,
        precision = telemetry.precision,
        args = ?telemetry.args,
        "Resolved launcher invocation"
    );
}
