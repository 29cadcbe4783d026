//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::lib::env::EnvSource;

use super::{resolve_config_path, JobKind, LaunchProfile};

/// Job to launch.
#[derive(Debug, Clone, Copy, Subcommand, PartialEq, Eq)]
pub enum JobCommand {
    /// Launch entity-alignment training with DeepSpeed ZeRO-3 (default).
    Train,
    /// Launch few-shot task evaluation.
    Evaluate,
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Resolve LEIA job settings from the environment and hand off to `accelerate launch`",
    long_about = None,
    after_help = "Hyperparameters are read from environment variables (RUN_NAME, MODEL_NAME_OR_PATH, LANGUAGE, LEARNING_RATE, ...). Use --dry-run to print the resolved invocation."
)]
pub struct LaunchArgs {
    /// Path to launch.toml (overrides LEIA_LAUNCH_CONFIG).
    #[arg(long = "config", global = true)]
    pub config_override: Option<PathBuf>,
    /// Print the resolved invocation as JSON instead of launching it.
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,
    /// Job to launch; defaults to `train`.
    #[command(subcommand)]
    pub command: Option<JobCommand>,
}

impl LaunchArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build<E: EnvSource>(self, env: &E) -> Result<LaunchProfile> {
        let (config_path, config_explicit) = resolve_config_path(self.config_override, env)?;
        let job = match self.command.unwrap_or(JobCommand::Train) {
            JobCommand::Train => JobKind::Train,
            JobCommand::Evaluate => JobKind::Evaluate,
        };

        Ok(LaunchProfile {
            config_path,
            config_explicit,
            dry_run: self.dry_run,
            job,
        })
    }
}
