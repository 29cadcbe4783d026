use serde::Serialize;

use crate::{
    hardware::{HardwareProfile, Precision},
    lib::{env::EnvSource, errors::LaunchConfigError, paths},
};

pub const RUN_NAME: &str = "RUN_NAME";
pub const MODEL_NAME_OR_PATH: &str = "MODEL_NAME_OR_PATH";
pub const LANGUAGE: &str = "LANGUAGE";
pub const ENTITY_EMBEDDING_DIR: &str = "ENTITY_EMBEDDING_DIR";
pub const WIKIPEDIA_DATASET_DIR: &str = "WIKIPEDIA_DATASET_DIR";
pub const NUM_PROCESSES: &str = "NUM_PROCESSES";
pub const OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const SAVE_STEPS: &str = "SAVE_STEPS";

/// `--save_steps` is passed twice with different fallbacks; the launcher keeps the last one.
pub const DEFAULT_SAVE_STEPS_FIRST: &str = "100";
pub const DEFAULT_SAVE_STEPS_SECOND: &str = "500";

/// Options emitted only when the variable is set.
const OPTIONAL_KEYS: [&str; 5] = [
    "EVAL_TASKS",
    "NUM_TRAIN_WIKIPEDIA_SAMPLES",
    "NUM_EVAL_WIKIPEDIA_SAMPLES",
    "SKIP_WIKIPEDIA_SAMPLES",
    "RESUME_FROM_CHECKPOINT",
];

/// Hyperparameter defaults, kept as literal strings so they reach the trainer verbatim.
pub const HYPERPARAMETER_DEFAULTS: &[(&str, &str)] = &[
    ("GRADIENT_ACCUMULATION_STEPS", "32"),
    ("GRADIENT_CLIPPING", "1.0"),
    ("TEXT_DATASET_PATH", ""),
    ("TEXT_DATASET_NAME", ""),
    ("TEXT_DATASET_SAMPLING_PROB", "0.0"),
    ("PER_DEVICE_TRAIN_BATCH_SIZE", "1"),
    ("PER_DEVICE_EVAL_BATCH_SIZE", "2"),
    ("GRADIENT_CHECKPOINTING", "true"),
    ("LEARNING_RATE", "2e-5"),
    ("LR_SCHEDULER_TYPE", "constant_with_warmup"),
    ("MAX_STEPS", "1000000"),
    ("WARMUP_STEPS", "500"),
    ("WEIGHT_DECAY", "0.1"),
    ("ADAM_BETA1", "0.9"),
    ("ADAM_BETA2", "0.999"),
    ("ADAM_EPSILON", "1e-6"),
    ("EVAL_STEPS", "100"),
    ("MAX_LENGTH", "2048"),
    ("MAX_ENTITY_LENGTH", "128"),
    ("ENTITY_VOCAB_SIZE", "300000"),
    ("LAYER_INDEX", "31"),
    ("SIMILARITY_FUNCTION", "cosine"),
    ("TEMPERATURE", "0.01"),
    ("USE_ENTITY_PREV_TOKEN_PREDICTION", "true"),
    ("USE_ENTITY_LAST_TOKEN_PREDICTION", "true"),
    ("USE_ENTITY_DECODER_ACTIVATION", "false"),
    ("MAX_EVAL_SAMPLES_FOR_TASKS", "3000"),
    ("USE_DYNAMIC_GENERATION_LENGTH", "true"),
    ("TRAIN_ENTITY_DENSE_ONLY", "false"),
    ("SAVE_TOTAL_LIMIT", "1"),
];

/// Dataset and output locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPaths {
    pub entity_embedding_dir: String,
    pub wikipedia_dataset_dir: String,
    pub text_dataset_path: String,
    pub text_dataset_name: String,
    pub text_dataset_sampling_prob: String,
    pub output_dir: String,
    pub resume_from_checkpoint: Option<String>,
}

/// Wikipedia sampling and task evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplingOptions {
    pub eval_tasks: Option<String>,
    pub num_train_wikipedia_samples: Option<String>,
    pub num_eval_wikipedia_samples: Option<String>,
    pub skip_wikipedia_samples: Option<String>,
    pub max_eval_samples_for_tasks: String,
    pub use_dynamic_generation_length: String,
}

/// Optimizer and schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizerOptions {
    pub per_device_train_batch_size: String,
    pub per_device_eval_batch_size: String,
    pub gradient_accumulation_steps: String,
    pub gradient_checkpointing: String,
    pub gradient_clipping: String,
    pub learning_rate: String,
    pub lr_scheduler_type: String,
    pub max_steps: String,
    pub warmup_steps: String,
    pub weight_decay: String,
    pub adam_beta1: String,
    pub adam_beta2: String,
    pub adam_epsilon: String,
}

/// Entity-alignment model settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityOptions {
    pub max_length: String,
    pub max_entity_length: String,
    pub entity_vocab_size: String,
    pub layer_index: String,
    pub similarity_function: String,
    pub temperature: String,
    pub use_entity_prev_token_prediction: String,
    pub use_entity_last_token_prediction: String,
    pub use_entity_decoder_activation: String,
    pub train_entity_dense_only: String,
}

/// Evaluation and checkpoint cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointOptions {
    pub eval_steps: String,
    pub save_steps_first: String,
    pub save_steps_second: String,
    pub save_total_limit: String,
}

/// Fully resolved training job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainOptions {
    pub run_name: String,
    pub model_name_or_path: String,
    pub language: Option<String>,
    pub num_processes: String,
    pub precision: Precision,
    pub paths: DataPaths,
    pub sampling: SamplingOptions,
    pub optimizer: OptimizerOptions,
    pub entity: EntityOptions,
    pub checkpoint: CheckpointOptions,
}

/// Fail on the first missing required field: `RUN_NAME`, `MODEL_NAME_OR_PATH`, then
/// `LANGUAGE` when `WIKIPEDIA_DATASET_DIR` has to be derived.
pub fn validate_required<E: EnvSource>(env: &E) -> Result<(), LaunchConfigError> {
    if env.get(RUN_NAME).is_none() {
        return Err(LaunchConfigError::MissingRequired { name: RUN_NAME });
    }
    if env.get(MODEL_NAME_OR_PATH).is_none() {
        return Err(LaunchConfigError::MissingRequired {
            name: MODEL_NAME_OR_PATH,
        });
    }
    if env.get(WIKIPEDIA_DATASET_DIR).is_none() && env.get(LANGUAGE).is_none() {
        return Err(LaunchConfigError::MissingLanguage);
    }
    Ok(())
}

impl TrainOptions {
    /// Validate required fields, then resolve every option as override-or-default.
    pub fn resolve<E: EnvSource>(
        env: &E,
        hardware: &HardwareProfile,
    ) -> Result<Self, LaunchConfigError> {
        validate_required(env)?;
        let run_name = required(env, RUN_NAME)?;
        let model_name_or_path = required(env, MODEL_NAME_OR_PATH)?;
        let language = env.get(LANGUAGE);

        let suffix = paths::dir_name_suffix(&model_name_or_path);
        let entity_embedding_dir = env
            .get(ENTITY_EMBEDDING_DIR)
            .unwrap_or_else(|| paths::default_entity_embedding_dir(suffix));
        let wikipedia_dataset_dir = match env.get(WIKIPEDIA_DATASET_DIR) {
            Some(dir) => dir,
            None => {
                let language = language.as_deref().ok_or(LaunchConfigError::MissingLanguage)?;
                paths::default_wikipedia_dataset_dir(language, suffix)
            }
        };
        let output_dir = env
            .get(OUTPUT_DIR)
            .unwrap_or_else(|| paths::default_output_dir(&run_name));
        let num_processes = env
            .get(NUM_PROCESSES)
            .unwrap_or_else(|| hardware.device_count().to_string());

        let [eval_tasks, num_train, num_eval, skip, resume] = OPTIONAL_KEYS.map(|key| env.get(key));
        let value = |key: &str| env.get_or(key, default_for(key));

        Ok(Self {
            run_name,
            model_name_or_path,
            language,
            num_processes,
            precision: hardware.precision,
            paths: DataPaths {
                entity_embedding_dir,
                wikipedia_dataset_dir,
                text_dataset_path: value("TEXT_DATASET_PATH"),
                text_dataset_name: value("TEXT_DATASET_NAME"),
                text_dataset_sampling_prob: value("TEXT_DATASET_SAMPLING_PROB"),
                output_dir,
                resume_from_checkpoint: resume,
            },
            sampling: SamplingOptions {
                eval_tasks,
                num_train_wikipedia_samples: num_train,
                num_eval_wikipedia_samples: num_eval,
                skip_wikipedia_samples: skip,
                max_eval_samples_for_tasks: value("MAX_EVAL_SAMPLES_FOR_TASKS"),
                use_dynamic_generation_length: value("USE_DYNAMIC_GENERATION_LENGTH"),
            },
            optimizer: OptimizerOptions {
                per_device_train_batch_size: value("PER_DEVICE_TRAIN_BATCH_SIZE"),
                per_device_eval_batch_size: value("PER_DEVICE_EVAL_BATCH_SIZE"),
                gradient_accumulation_steps: value("GRADIENT_ACCUMULATION_STEPS"),
                gradient_checkpointing: value("GRADIENT_CHECKPOINTING"),
                gradient_clipping: value("GRADIENT_CLIPPING"),
                learning_rate: value("LEARNING_RATE"),
                lr_scheduler_type: value("LR_SCHEDULER_TYPE"),
                max_steps: value("MAX_STEPS"),
                warmup_steps: value("WARMUP_STEPS"),
                weight_decay: value("WEIGHT_DECAY"),
                adam_beta1: value("ADAM_BETA1"),
                adam_beta2: value("ADAM_BETA2"),
                adam_epsilon: value("ADAM_EPSILON"),
            },
            entity: EntityOptions {
                max_length: value("MAX_LENGTH"),
                max_entity_length: value("MAX_ENTITY_LENGTH"),
                entity_vocab_size: value("ENTITY_VOCAB_SIZE"),
                layer_index: value("LAYER_INDEX"),
                similarity_function: value("SIMILARITY_FUNCTION"),
                temperature: value("TEMPERATURE"),
                use_entity_prev_token_prediction: value("USE_ENTITY_PREV_TOKEN_PREDICTION"),
                use_entity_last_token_prediction: value("USE_ENTITY_LAST_TOKEN_PREDICTION"),
                use_entity_decoder_activation: value("USE_ENTITY_DECODER_ACTIVATION"),
                train_entity_dense_only: value("TRAIN_ENTITY_DENSE_ONLY"),
            },
            checkpoint: CheckpointOptions {
                eval_steps: value("EVAL_STEPS"),
                save_steps_first: env.get_or(SAVE_STEPS, DEFAULT_SAVE_STEPS_FIRST),
                save_steps_second: env.get_or(SAVE_STEPS, DEFAULT_SAVE_STEPS_SECOND),
                save_total_limit: value("SAVE_TOTAL_LIMIT"),
            },
        })
    }
}

fn required<E: EnvSource>(env: &E, name: &'static str) -> Result<String, LaunchConfigError> {
    env.get(name)
        .ok_or(LaunchConfigError::MissingRequired { name })
}

/// Default for a key listed in `HYPERPARAMETER_DEFAULTS`.
fn default_for(key: &str) -> &'static str {
    let default = HYPERPARAMETER_DEFAULTS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, default)| *default);
    debug_assert!(default.is_some(), "{key} has no entry in HYPERPARAMETER_DEFAULTS");
    default.unwrap_or_default()
}
