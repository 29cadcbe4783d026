//! Entry point for leia-launch.
use std::process::ExitCode;

use clap::Parser;
use leia_launch::{
    cli::LaunchArgs,
    lib::{env::ProcessEnv, telemetry},
    runtime::{self, RuntimeExit},
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(code) => code,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<ExitCode, RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let env = ProcessEnv;
    let profile = LaunchArgs::parse()
        .build(&env)
        .map_err(RuntimeExit::from_error)?;
    runtime::run(profile, &env).await
}
