use anyhow::Result;
use tempfile::tempdir;

use crate::common::{fixture, launcher_command, run};

#[test]
fn missing_run_name_exits_with_one() -> Result<()> {
    let temp = tempdir()?;
    let output = run(launcher_command(
        temp.path(),
        "A100",
        &[("MODEL_NAME_OR_PATH", "org/modelA"), ("LANGUAGE", "fr")],
    )
    .arg("--dry-run"))?;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "nothing should be launched or printed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("RUN_NAME"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn missing_model_exits_with_one() -> Result<()> {
    let temp = tempdir()?;
    let output = run(launcher_command(
        temp.path(),
        "A100",
        &[("RUN_NAME", "exp1"), ("LANGUAGE", "fr")],
    )
    .arg("--dry-run"))?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("MODEL_NAME_OR_PATH"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn missing_language_without_dataset_dir_exits_with_one() -> Result<()> {
    let temp = tempdir()?;
    let output = run(launcher_command(
        temp.path(),
        "A100",
        &[("RUN_NAME", "exp1"), ("MODEL_NAME_OR_PATH", "org/modelA")],
    )
    .arg("--dry-run"))?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LANGUAGE"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn invalid_settings_file_exits_with_one() -> Result<()> {
    let temp = tempdir()?;
    let output = run(launcher_command(
        temp.path(),
        "A100",
        &[
            ("RUN_NAME", "exp1"),
            ("MODEL_NAME_OR_PATH", "org/modelA"),
            ("LANGUAGE", "fr"),
        ],
    )
    .arg("--config")
    .arg(fixture("tests/fixtures/launch_unknown_probe.toml"))
    .arg("--dry-run"))?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hardware.probe"), "stderr: {stderr}");
    Ok(())
}
