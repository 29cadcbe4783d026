use serde::Serialize;

use crate::{
    hardware::{HardwareProfile, Precision},
    lib::{env::EnvSource, errors::LaunchConfigError},
};

pub const MODEL_NAME_OR_PATH: &str = "MODEL_NAME_OR_PATH";
pub const TASKS: &str = "TASKS";
pub const NUM_FEWSHOT_SAMPLES: &str = "NUM_FEWSHOT_SAMPLES";
pub const OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const BATCH_SIZE: &str = "BATCH_SIZE";
pub const MAX_LENGTH: &str = "MAX_LENGTH";
pub const MAX_SAMPLES: &str = "MAX_SAMPLES";
pub const DEVICE_MAP: &str = "DEVICE_MAP";
pub const NUM_PROCESSES: &str = "NUM_PROCESSES";

pub const DEFAULT_BATCH_SIZE: &str = "1";

/// Fully resolved evaluation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluateOptions {
    pub model_name_or_path: String,
    /// Task names, one per few-shot count.
    pub tasks: Vec<String>,
    pub num_fewshot_samples: Vec<u32>,
    pub output_dir: Option<String>,
    pub batch_size: String,
    pub max_length: Option<String>,
    pub max_samples: Option<String>,
    pub device_map: Option<String>,
    pub num_processes: String,
    pub precision: Precision,
}

impl EvaluateOptions {
    pub fn resolve<E: EnvSource>(
        env: &E,
        hardware: &HardwareProfile,
    ) -> Result<Self, LaunchConfigError> {
        let model_name_or_path = env
            .get(MODEL_NAME_OR_PATH)
            .ok_or(LaunchConfigError::MissingRequired {
                name: MODEL_NAME_OR_PATH,
            })?;
        let raw_tasks = env
            .get(TASKS)
            .ok_or(LaunchConfigError::MissingRequired { name: TASKS })?;
        let raw_fewshot = env
            .get(NUM_FEWSHOT_SAMPLES)
            .ok_or(LaunchConfigError::MissingRequired {
                name: NUM_FEWSHOT_SAMPLES,
            })?;

        let tasks = split_list(&raw_tasks);
        let num_fewshot_samples = split_list(&raw_fewshot)
            .iter()
            .map(|entry| {
                entry
                    .parse::<u32>()
                    .map_err(|_| LaunchConfigError::InvalidValue {
                        name: NUM_FEWSHOT_SAMPLES,
                        value: raw_fewshot.clone(),
                        message: format!("`{entry}` is not a non-negative integer"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if tasks.is_empty() {
            return Err(LaunchConfigError::InvalidValue {
                name: TASKS,
                value: raw_tasks,
                message: "no task names given".into(),
            });
        }
        if tasks.len() != num_fewshot_samples.len() {
            return Err(LaunchConfigError::InvalidValue {
                name: NUM_FEWSHOT_SAMPLES,
                value: raw_fewshot,
                message: format!(
                    "expected {} few-shot counts (one per task), got {}",
                    tasks.len(),
                    num_fewshot_samples.len()
                ),
            });
        }

        Ok(Self {
            model_name_or_path,
            tasks,
            num_fewshot_samples,
            output_dir: env.get(OUTPUT_DIR),
            batch_size: env.get_or(BATCH_SIZE, DEFAULT_BATCH_SIZE),
            max_length: env.get(MAX_LENGTH),
            max_samples: env.get(MAX_SAMPLES),
            device_map: env.get(DEVICE_MAP),
            num_processes: env
                .get(NUM_PROCESSES)
                .unwrap_or_else(|| hardware.device_count().to_string()),
            precision: hardware.precision,
        })
    }

    pub fn tasks_arg(&self) -> String {
        self.tasks.join(",")
    }

    pub fn fewshot_arg(&self) -> String {
        self.num_fewshot_samples
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
