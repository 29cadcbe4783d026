use std::process::ExitCode;

use anyhow::{Context, Error};

use crate::{
    cli::{JobKind, LaunchProfile},
    config::LaunchSettings,
    hardware,
    jobs::{
        evaluate::{build_evaluate_invocation, EvaluateOptions},
        train::{build_train_invocation, TrainOptions},
    },
    lib::{
        accelerate::LaunchInvocation,
        env::EnvSource,
        telemetry::{emit_invocation, InvocationTelemetry},
    },
};

use super::executor::run_invocation;

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:#}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }
}

/// A resolved job ready to hand off.
#[derive(Debug, Clone)]
pub struct PreparedLaunch {
    pub job: JobKind,
    pub num_processes: String,
    pub mixed_precision: &'static str,
    pub invocation: LaunchInvocation,
}

impl PreparedLaunch {
    pub fn telemetry(&self) -> InvocationTelemetry<'_> {
        InvocationTelemetry {
            job_kind: self.job.as_str(),
            program: self.invocation.program.to_string_lossy(),
            num_processes: &self.num_processes,
            precision: self.mixed_precision,
            args: &self.invocation.args,
        }
    }
}

/// Load settings, detect hardware, validate and resolve the job, then assemble the invocation.
pub fn prepare<E: EnvSource>(
    profile: &LaunchProfile,
    env: &E,
) -> Result<PreparedLaunch, RuntimeExit> {
    let settings = LaunchSettings::load(profile.config_path.clone(), profile.config_explicit)
        .map_err(RuntimeExit::from_error)?;
    let hardware = hardware::detect(&settings.hardware, env);

    let prepared = match profile.job {
        JobKind::Train => {
            let options = TrainOptions::resolve(env, &hardware)
                .context("invalid training configuration")
                .map_err(RuntimeExit::from_error)?;
            PreparedLaunch {
                job: profile.job,
                num_processes: options.num_processes.clone(),
                mixed_precision: options.precision.mixed_precision(),
                invocation: build_train_invocation(&options, &settings.launcher),
            }
        }
        JobKind::Evaluate => {
            let options = EvaluateOptions::resolve(env, &hardware)
                .context("invalid evaluation configuration")
                .map_err(RuntimeExit::from_error)?;
            PreparedLaunch {
                job: profile.job,
                num_processes: options.num_processes.clone(),
                mixed_precision: options.precision.mixed_precision(),
                invocation: build_evaluate_invocation(&options, &settings.launcher),
            }
        }
    };

    emit_invocation(&prepared.telemetry());
    Ok(prepared)
}

/// Run the selected job: print it for `--dry-run`, otherwise hand off and propagate the exit code.
pub async fn run<E: EnvSource>(profile: LaunchProfile, env: &E) -> Result<ExitCode, RuntimeExit> {
    let prepared = prepare(&profile, env)?;

    if profile.dry_run {
        let payload = serde_json::to_string_pretty(&prepared.telemetry())
            .map_err(RuntimeExit::from_error)?;
        println!("{payload}");
        return Ok(ExitCode::SUCCESS);
    }

    let code = run_invocation(&prepared.invocation, prepared.job.as_str())
        .await
        .map_err(RuntimeExit::from_error)?;
    Ok(ExitCode::from(code))
}
