use anyhow::Result;
use serde_json::Value;
use tempfile::tempdir;

use crate::common::{
    dry_run_payload, launcher_command, payload_args, run, value_after, TRAIN_ENV,
};

#[test]
fn train_dry_run_prints_resolved_invocation() -> Result<()> {
    let temp = tempdir()?;
    let output = run(launcher_command(
        temp.path(),
        "NVIDIA A100-SXM4-80GB,NVIDIA A100-SXM4-80GB,NVIDIA A100-SXM4-80GB,NVIDIA A100-SXM4-80GB",
        TRAIN_ENV,
    )
    .arg("--dry-run"))?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let payload = dry_run_payload(&output)?;
    assert_eq!(payload.get("job_kind").and_then(Value::as_str), Some("train"));
    assert_eq!(payload.get("program").and_then(Value::as_str), Some("accelerate"));
    assert_eq!(payload.get("num_processes").and_then(Value::as_str), Some("4"));
    assert_eq!(payload.get("precision").and_then(Value::as_str), Some("bf16"));

    let args = payload_args(&payload);
    assert_eq!(args.first().map(String::as_str), Some("launch"));
    assert_eq!(value_after(&args, "--num_processes"), Some("4"));
    assert_eq!(
        value_after(&args, "--entity_embedding_dir"),
        Some("data/entity_emb/en_modelA")
    );
    assert_eq!(
        value_after(&args, "--wikipedia_dataset_dir"),
        Some("data/wikipedia/fr_modelA")
    );
    assert_eq!(value_after(&args, "--output_dir"), Some("runs/exp1"));
    assert_eq!(value_after(&args, "--learning_rate"), Some("2e-5"));
    assert_eq!(value_after(&args, "--max_steps"), Some("1000000"));
    assert!(args.iter().any(|arg| arg == "--use_flash_attention_2"));
    Ok(())
}

#[test]
fn v100_host_resolves_fp16() -> Result<()> {
    let temp = tempdir()?;
    let output = run(launcher_command(temp.path(), "Tesla V100-SXM2-32GB", TRAIN_ENV)
        .arg("--dry-run"))?;

    assert!(output.status.success());
    let payload = dry_run_payload(&output)?;
    let args = payload_args(&payload);
    assert_eq!(value_after(&args, "--mixed_precision"), Some("fp16"));
    assert!(args.iter().any(|arg| arg == "--fp16"));
    assert!(!args.iter().any(|arg| arg == "--use_flash_attention_2"));
    Ok(())
}

#[test]
fn explicit_num_processes_overrides_detection() -> Result<()> {
    let temp = tempdir()?;
    let mut vars = TRAIN_ENV.to_vec();
    vars.push(("NUM_PROCESSES", "2"));
    let output = run(launcher_command(temp.path(), "A100,A100,A100,A100", &vars)
        .arg("--dry-run"))?;

    let payload = dry_run_payload(&output)?;
    assert_eq!(value_after(&payload_args(&payload), "--num_processes"), Some("2"));
    Ok(())
}

#[test]
fn evaluate_dry_run_uses_evaluation_entry_point() -> Result<()> {
    let temp = tempdir()?;
    let output = run(launcher_command(
        temp.path(),
        "NVIDIA H100",
        &[
            ("MODEL_NAME_OR_PATH", "org/modelA"),
            ("TASKS", "jcommonsenseqa,miaqa"),
            ("NUM_FEWSHOT_SAMPLES", "3,0"),
        ],
    )
    .args(["evaluate", "--dry-run"]))?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let payload = dry_run_payload(&output)?;
    assert_eq!(payload.get("job_kind").and_then(Value::as_str), Some("evaluate"));
    let args = payload_args(&payload);
    assert!(args.iter().any(|arg| arg == "evaluate.py"));
    assert_eq!(value_after(&args, "--tasks"), Some("jcommonsenseqa,miaqa"));
    assert_eq!(value_after(&args, "--num_fewshot_samples"), Some("3,0"));
    assert!(!args.iter().any(|arg| arg == "--use_deepspeed"));
    Ok(())
}
