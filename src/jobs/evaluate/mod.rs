//! Evaluation job: few-shot task evaluation through `accelerate launch evaluate.py`.
mod request;

pub use request::EvaluateOptions;

use crate::{
    config::LauncherSection,
    lib::accelerate::{begin_accelerate_launch, AccelerateLaunchConfig, LaunchInvocation},
};

/// Build `accelerate launch ... evaluate.py ...` for a resolved evaluation job.
pub fn build_evaluate_invocation(
    options: &EvaluateOptions,
    launcher: &LauncherSection,
) -> LaunchInvocation {
    let mut invocation = begin_accelerate_launch(
        &launcher.program,
        AccelerateLaunchConfig {
            num_processes: &options.num_processes,
            mixed_precision: options.precision.mixed_precision(),
            deepspeed_zero3: false,
        },
    );
    invocation
        .arg(launcher.evaluate_script.to_string_lossy())
        .flag("--model_name_or_path", &options.model_name_or_path)
        .flag("--tasks", options.tasks_arg())
        .flag("--num_fewshot_samples", options.fewshot_arg())
        .flag_opt("--output_dir", options.output_dir.as_deref())
        .flag("--batch_size", &options.batch_size)
        .flag_opt("--max_length", options.max_length.as_deref())
        .flag_opt("--max_samples", options.max_samples.as_deref())
        .flag_opt("--device_map", options.device_map.as_deref());
    if options.precision.uses_extended_attention() {
        invocation.arg("--use_flash_attention_2");
    }
    invocation
}
