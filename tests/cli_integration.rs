//! CLI integration tests for darknext-setup.
//!
//! These tests run the real binary against a temporary checkout. On Unix a
//! small shell script stands in for the Python interpreter: it logs every
//! invocation and creates the environment directory for `-m venv`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATE: &str = "TOR_PROXY_HOST=127.0.0.1\nTOR_PROXY_PORT=9050\nTELEGRAM_BOT_TOKEN=\n";

/// Get the darknext-setup binary command, isolated from the user's config.
fn setup_cmd(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("darknext-setup").unwrap();
    cmd.current_dir(project)
        .env("HOME", project)
        .env_remove("DARKNEXT_ROOT")
        .env_remove("DARKNEXT_PYTHON");
    cmd
}

/// Create a checkout with manifest, template and entry point.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("requirements.txt"), "requests\n").unwrap();
    fs::write(tmp.path().join(".env.example"), TEMPLATE).unwrap();
    fs::create_dir_all(tmp.path().join("src")).unwrap();
    fs::write(tmp.path().join("src/main.py"), "print('ok')\n").unwrap();
    tmp
}

#[cfg(unix)]
fn fake_python(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-python");
    fs::write(
        &path,
        r#"#!/bin/sh
echo "$*" >> "$FAKE_PYTHON_LOG"
echo "fake python: $*"
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  cp "$0" "$3/bin/python"
  chmod +x "$3/bin/python"
  exit 0
fi
case "$*" in
  *"--mode test"*) exit "${FAKE_SELF_TEST_CODE:-0}" ;;
esac
exit 0
"#,
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn log_lines(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// darknext-setup (bootstrap)
// ============================================================================

#[cfg(unix)]
#[test]
fn test_fresh_bootstrap() {
    let proj = project();
    let tools = TempDir::new().unwrap();
    let python = fake_python(tools.path());
    let log = tools.path().join("calls.log");

    setup_cmd(proj.path())
        .arg("--python")
        .arg(&python)
        .env("FAKE_PYTHON_LOG", &log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Setup complete"))
        .stdout(predicate::str::contains("--mode continuous"));

    assert!(proj.path().join("venv").is_dir());
    assert_eq!(
        fs::read(proj.path().join(".env")).unwrap(),
        TEMPLATE.as_bytes()
    );

    let calls = log_lines(&log);
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("-m venv"));
    assert!(calls[1].starts_with("-m pip install -r"));
    assert!(calls[2].ends_with("--mode test"));
}

#[cfg(unix)]
#[test]
fn test_second_run_keeps_existing_files() {
    let proj = project();
    let tools = TempDir::new().unwrap();
    let python = fake_python(tools.path());
    let log = tools.path().join("calls.log");

    setup_cmd(proj.path())
        .arg("--python")
        .arg(&python)
        .env("FAKE_PYTHON_LOG", &log)
        .assert()
        .success();

    fs::write(proj.path().join(".env"), "TELEGRAM_BOT_TOKEN=edited\n").unwrap();
    fs::remove_file(&log).unwrap();

    setup_cmd(proj.path())
        .arg("--python")
        .arg(&python)
        .env("FAKE_PYTHON_LOG", &log)
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(proj.path().join(".env")).unwrap(),
        "TELEGRAM_BOT_TOKEN=edited\n"
    );
    let calls = log_lines(&log);
    assert_eq!(calls.len(), 2);
    assert!(!calls.iter().any(|c| c.contains("venv")));
}

#[cfg(unix)]
#[test]
fn test_self_test_exit_code_propagates() {
    let proj = project();
    let tools = TempDir::new().unwrap();
    let python = fake_python(tools.path());
    let log = tools.path().join("calls.log");

    setup_cmd(proj.path())
        .args(["run", "--python"])
        .arg(&python)
        .env("FAKE_PYTHON_LOG", &log)
        .env("FAKE_SELF_TEST_CODE", "3")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("self-test failed"));

    // The configuration step ran before the failing self-test
    assert!(proj.path().join(".env").exists());
}

#[cfg(unix)]
#[test]
fn test_json_message_format() {
    let proj = project();
    let tools = TempDir::new().unwrap();
    let python = fake_python(tools.path());

    let output = setup_cmd(proj.path())
        .args(["--message-format", "json", "--python"])
        .arg(&python)
        .env("FAKE_PYTHON_LOG", tools.path().join("calls.log"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let steps: Vec<String> = stdout
        .lines()
        .filter(|l| l.contains("\"reason\":\"step\""))
        .map(str::to_string)
        .collect();
    assert_eq!(steps.len(), 4);
    assert!(steps[0].contains("ensure-environment"));
    assert!(steps[3].contains("self-test"));
    assert!(stdout.contains("bootstrap-finished"));
    assert!(!stdout.contains("Setup complete"));
    // Interpreter output goes to stderr; stdout is JSON only
    assert!(stdout.lines().all(|l| l.starts_with('{')));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("fake python: -m pip install"));
}

#[cfg(unix)]
#[test]
fn test_relative_root() {
    let parent = TempDir::new().unwrap();
    let proj = parent.path().join("proj");
    fs::create_dir_all(proj.join("src")).unwrap();
    fs::write(proj.join("requirements.txt"), "requests\n").unwrap();
    fs::write(proj.join(".env.example"), TEMPLATE).unwrap();
    fs::write(proj.join("src/main.py"), "print('ok')\n").unwrap();
    let tools = TempDir::new().unwrap();
    let python = fake_python(tools.path());
    let log = tools.path().join("calls.log");

    setup_cmd(parent.path())
        .args(["--root", "proj", "--python"])
        .arg(&python)
        .env("FAKE_PYTHON_LOG", &log)
        .assert()
        .success();

    assert!(proj.join("venv").is_dir());
    assert!(!proj.join("proj").exists());
    assert!(proj.join(".env").is_file());
    assert_eq!(log_lines(&log).len(), 3);
}

#[test]
fn test_dry_run_changes_nothing() {
    let proj = project();

    setup_cmd(proj.path())
        .args(["run", "--dry-run", "--python", "python3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Planned"));

    assert!(!proj.path().join("venv").exists());
    assert!(!proj.path().join(".env").exists());
}

#[test]
fn test_missing_template_fails() {
    let proj = project();
    fs::remove_file(proj.path().join(".env.example")).unwrap();
    // Pretend the environment already exists so no interpreter is needed
    fs::create_dir_all(proj.path().join("venv")).unwrap();

    setup_cmd(proj.path())
        .args(["run", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration template not found"));
}

#[test]
fn test_project_config_overrides_paths() {
    let proj = project();
    fs::create_dir_all(proj.path().join(".darknext")).unwrap();
    fs::write(
        proj.path().join(".darknext/setup.toml"),
        "[paths]\nvenv = \".venv\"\n",
    )
    .unwrap();

    setup_cmd(proj.path())
        .args(["run", "--dry-run", "--python", "python3"])
        .assert()
        .success()
        .stderr(predicate::str::contains(".venv"));
}

// ============================================================================
// darknext-setup doctor / hints
// ============================================================================

#[cfg(unix)]
#[test]
fn test_doctor_fresh_checkout() {
    let proj = project();
    let tools = TempDir::new().unwrap();
    let python = fake_python(tools.path());

    setup_cmd(proj.path())
        .arg("doctor")
        .arg("--python")
        .arg(&python)
        .env("FAKE_PYTHON_LOG", tools.path().join("calls.log"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Manifest"))
        .stdout(predicate::str::contains("[!!] Virtual Environment (optional)"));

    assert!(!proj.path().join("venv").exists());
}

#[test]
fn test_doctor_missing_manifest_fails() {
    let proj = project();
    fs::remove_file(proj.path().join("requirements.txt")).unwrap();

    setup_cmd(proj.path())
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] Manifest"));
}

#[test]
fn test_hints() {
    let proj = project();

    setup_cmd(proj.path())
        .arg("hints")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode single"))
        .stdout(predicate::str::contains("--mode stats"))
        .stdout(predicate::str::contains("TELEGRAM_BOT_TOKEN"));
}

#[test]
fn test_help() {
    Command::cargo_bin("darknext-setup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("--python"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let proj = project();

    setup_cmd(proj.path())
        .args(["--quiet", "--verbose", "hints"])
        .assert()
        .failure();
}
