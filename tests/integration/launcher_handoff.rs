#![cfg(unix)]

use std::{fs, os::unix::fs::PermissionsExt, path::Path};

use anyhow::Result;
use tempfile::tempdir;

use crate::common::{launcher_command, run, TRAIN_ENV};

/// Write a fake launcher that records it ran and exits with `code`.
fn write_fake_launcher(dir: &Path, code: i32) -> Result<()> {
    let script = dir.join("fake-accelerate");
    let marker = dir.join("launched");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$@\" > \"{}\"\nexit {code}\n",
            marker.display()
        ),
    )?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
    fs::write(
        dir.join("launch.toml"),
        format!("[launcher]\nprogram = \"{}\"\n", script.display()),
    )?;
    Ok(())
}

#[test]
fn launcher_exit_code_becomes_ours() -> Result<()> {
    let temp = tempdir()?;
    write_fake_launcher(temp.path(), 7)?;

    let output = run(&mut launcher_command(temp.path(), "A100,A100", TRAIN_ENV))?;

    assert_eq!(output.status.code(), Some(7));
    let recorded = fs::read_to_string(temp.path().join("launched"))?;
    assert!(recorded.starts_with("launch --num_machines 1 --num_processes 2"), "{recorded}");
    assert!(recorded.contains("train.py --bf16 --use_flash_attention_2"), "{recorded}");
    Ok(())
}

#[test]
fn successful_launcher_exits_zero() -> Result<()> {
    let temp = tempdir()?;
    write_fake_launcher(temp.path(), 0)?;

    let output = run(&mut launcher_command(temp.path(), "A100", TRAIN_ENV))?;

    assert!(output.status.success());
    assert!(temp.path().join("launched").exists());
    Ok(())
}

#[test]
fn validation_failure_never_invokes_launcher() -> Result<()> {
    let temp = tempdir()?;
    write_fake_launcher(temp.path(), 0)?;

    let output = run(&mut launcher_command(
        temp.path(),
        "A100",
        &[("MODEL_NAME_OR_PATH", "org/modelA"), ("LANGUAGE", "fr")],
    ))?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!temp.path().join("launched").exists());
    Ok(())
}
