use tracing::warn;

use crate::{
    config::LauncherSection,
    lib::accelerate::{begin_accelerate_launch, AccelerateLaunchConfig, LaunchInvocation},
};

use super::TrainOptions;

/// Build `accelerate launch ... train.py ...` for a resolved training job.
///
/// Order: launch control flags, `--mixed_precision`, entry point, precision flags for the
/// trainer, then the training configuration.
pub fn build_train_invocation(
    options: &TrainOptions,
    launcher: &LauncherSection,
) -> LaunchInvocation {
    let mut invocation = begin_accelerate_launch(
        &launcher.program,
        AccelerateLaunchConfig {
            num_processes: &options.num_processes,
            mixed_precision: options.precision.mixed_precision(),
            deepspeed_zero3: true,
        },
    );
    invocation.arg(launcher.train_script.to_string_lossy());
    for flag in options.precision.training_flags() {
        invocation.arg(*flag);
    }

    push_data_flags(&mut invocation, options);
    push_optimizer_flags(&mut invocation, options);
    push_entity_flags(&mut invocation, options);
    push_run_flags(&mut invocation, options);

    if options.checkpoint.save_steps_first != options.checkpoint.save_steps_second {
        warn!(
            target: "leia_launch::train",
            first = %options.checkpoint.save_steps_first,
            last = %options.checkpoint.save_steps_second,
            "--save_steps is passed twice with different values; the launcher keeps the last one"
        );
    }

    invocation
}

fn push_data_flags(invocation: &mut LaunchInvocation, options: &TrainOptions) {
    let paths = &options.paths;
    let sampling = &options.sampling;
    invocation
        .flag("--model_name_or_path", &options.model_name_or_path)
        .flag("--entity_embedding_dir", &paths.entity_embedding_dir)
        .flag("--wikipedia_dataset_dir", &paths.wikipedia_dataset_dir)
        .flag("--text_dataset_path", &paths.text_dataset_path)
        .flag("--text_dataset_name", &paths.text_dataset_name)
        .flag(
            "--text_dataset_sampling_prob",
            &paths.text_dataset_sampling_prob,
        )
        .flag_opt(
            "--num_train_wikipedia_samples",
            sampling.num_train_wikipedia_samples.as_deref(),
        )
        .flag_opt(
            "--num_eval_wikipedia_samples",
            sampling.num_eval_wikipedia_samples.as_deref(),
        )
        .flag_opt(
            "--skip_wikipedia_samples",
            sampling.skip_wikipedia_samples.as_deref(),
        )
        .flag_opt("--eval_tasks", sampling.eval_tasks.as_deref())
        .flag(
            "--max_eval_samples_for_tasks",
            &sampling.max_eval_samples_for_tasks,
        )
        .flag(
            "--use_dynamic_generation_length",
            &sampling.use_dynamic_generation_length,
        )
        .flag("--output_dir", &paths.output_dir)
        .flag("--run_name", &options.run_name);
}

fn push_optimizer_flags(invocation: &mut LaunchInvocation, options: &TrainOptions) {
    let optimizer = &options.optimizer;
    invocation
        .flag(
            "--per_device_train_batch_size",
            &optimizer.per_device_train_batch_size,
        )
        .flag(
            "--per_device_eval_batch_size",
            &optimizer.per_device_eval_batch_size,
        )
        .flag(
            "--gradient_accumulation_steps",
            &optimizer.gradient_accumulation_steps,
        )
        .flag("--gradient_checkpointing", &optimizer.gradient_checkpointing)
        .flag("--learning_rate", &optimizer.learning_rate)
        .flag("--lr_scheduler_type", &optimizer.lr_scheduler_type)
        .flag("--max_steps", &optimizer.max_steps)
        .flag("--warmup_steps", &optimizer.warmup_steps)
        .flag("--weight_decay", &optimizer.weight_decay)
        .flag("--adam_beta1", &optimizer.adam_beta1)
        .flag("--adam_beta2", &optimizer.adam_beta2)
        .flag("--adam_epsilon", &optimizer.adam_epsilon)
        .flag("--max_grad_norm", &optimizer.gradient_clipping);
}

fn push_entity_flags(invocation: &mut LaunchInvocation, options: &TrainOptions) {
    let entity = &options.entity;
    invocation
        .flag("--max_length", &entity.max_length)
        .flag("--max_entity_length", &entity.max_entity_length)
        .flag("--entity_vocab_size", &entity.entity_vocab_size)
        .flag("--layer_index", &entity.layer_index)
        .flag("--similarity_function", &entity.similarity_function)
        .flag("--temperature", &entity.temperature)
        .flag(
            "--use_entity_prev_token_prediction",
            &entity.use_entity_prev_token_prediction,
        )
        .flag(
            "--use_entity_last_token_prediction",
            &entity.use_entity_last_token_prediction,
        )
        .flag(
            "--use_entity_decoder_activation",
            &entity.use_entity_decoder_activation,
        )
        .flag("--train_entity_dense_only", &entity.train_entity_dense_only);
}

fn push_run_flags(invocation: &mut LaunchInvocation, options: &TrainOptions) {
    let checkpoint = &options.checkpoint;
    invocation
        .flag("--evaluation_strategy", "steps")
        .flag("--eval_steps", &checkpoint.eval_steps)
        .flag("--log_level", "info")
        .flag("--logging_steps", "10")
        .flag("--save_strategy", "no")
        .flag("--save_steps", &checkpoint.save_steps_first)
        .flag("--save_total_limit", &checkpoint.save_total_limit)
        .flag("--seed", "42")
        .flag("--dataloader_num_workers", "1")
        .arg("--overwrite_output_dir")
        .flag("--remove_unused_columns", "false")
        .flag("--save_steps", &checkpoint.save_steps_second)
        .flag_opt(
            "--resume_from_checkpoint",
            options.paths.resume_from_checkpoint.as_deref(),
        );
}
