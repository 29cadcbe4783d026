//! Training job: environment resolution and `accelerate launch` assembly.
mod assemble;
mod options;

pub use assemble::build_train_invocation;
pub use options::{
    validate_required, CheckpointOptions, DataPaths, EntityOptions, OptimizerOptions,
    SamplingOptions, TrainOptions, DEFAULT_SAVE_STEPS_FIRST, DEFAULT_SAVE_STEPS_SECOND,
    HYPERPARAMETER_DEFAULTS,
};
