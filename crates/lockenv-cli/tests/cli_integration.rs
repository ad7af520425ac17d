//! CLI subprocess integration tests.
//!
//! These tests invoke the `lockenv` binary inside a scratch directory and
//! verify exit codes, console output, and the written environment file.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const LOCK: &str = r"
version: 1
metadata:
  channels:
  - url: conda-forge
    used_env_vars: []
  - url: https://conda.anaconda.org/tardis-sn
    used_env_vars: []
package:
- name: pandas
  version: 2.1.0
  manager: conda
  platform: linux-64
- name: astropy
  version: 5.3.0
  manager: conda
  platform: linux-64
- name: scipy
  version: 1.11.0
  manager: conda
  platform: osx-64
- name: tardis-sn
  version: 2024.1.1
  manager: pip
  platform: linux-64
";

fn lockenv_in(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lockenv"));
    cmd.current_dir(dir);
    cmd.env_remove("LOCKENV_LOG");
    cmd
}

fn project_with_lock(content: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("conda-lock.yml"), content).unwrap();
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_version_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = lockenv_in(dir.path()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("lockenv"));
}

#[test]
fn cli_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = lockenv_in(dir.path()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("generate"));
    assert!(out.contains("check"));
}

#[test]
fn no_arguments_generates_env_yml() {
    let dir = project_with_lock(LOCK);
    let output = lockenv_in(dir.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Reading conda-lock.yml..."), "{out}");
    assert!(out.contains("Writing env.yml..."), "{out}");
    assert!(
        out.contains("Successfully created env.yml with 2 pinned packages"),
        "{out}"
    );
    assert!(
        out.contains("  Channels: conda-forge, https://conda.anaconda.org/tardis-sn"),
        "{out}"
    );
    assert!(out.contains("  Platform: linux-64"), "{out}");

    let text = fs::read_to_string(dir.path().join("env.yml")).unwrap();
    let astropy = text.find("- astropy=5.3.0").unwrap();
    let pandas = text.find("- pandas=2.1.0").unwrap();
    assert!(astropy < pandas);
    assert!(!text.contains("scipy"));
    assert!(!text.contains("tardis-sn=2024.1.1"));
}

#[test]
fn generate_is_idempotent() {
    let dir = project_with_lock(LOCK);
    assert!(lockenv_in(dir.path()).arg("generate").output().unwrap().status.success());
    let first = fs::read(dir.path().join("env.yml")).unwrap();
    assert!(lockenv_in(dir.path()).arg("generate").output().unwrap().status.success());
    let second = fs::read(dir.path().join("env.yml")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_lockfile_fails_with_lockfile_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = lockenv_in(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("lockfile not found"), "{err}");
    assert!(!dir.path().join("env.yml").exists());
}

#[test]
fn no_qualifying_packages_fails_without_writing() {
    let dir = project_with_lock(
        "package:\n- name: scipy\n  version: 1.11.0\n  manager: conda\n  platform: osx-64\n",
    );
    let output = lockenv_in(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("no packages found"));
    assert!(!dir.path().join("env.yml").exists());
}

#[test]
fn json_output_reports_summary() {
    let dir = project_with_lock(LOCK);
    let output = lockenv_in(dir.path())
        .args(["--json", "generate"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["status"], "written");
    assert_eq!(payload["packages"], 2);
    assert_eq!(payload["platform"], "linux-64");
    assert_eq!(payload["channels"][0], "conda-forge");
}

#[test]
fn platform_and_output_flags_select_other_pins() {
    let dir = project_with_lock(LOCK);
    let output = lockenv_in(dir.path())
        .args(["generate", "--platform", "osx-64", "--output", "env-osx.yml"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = fs::read_to_string(dir.path().join("env-osx.yml")).unwrap();
    assert!(text.contains("- scipy=1.11.0"));
    assert!(text.contains("#   lockenv generate --output env-osx.yml --platform osx-64"));
    assert!(!dir.path().join("env.yml").exists());
}

#[test]
fn check_tracks_lockfile_changes() {
    let dir = project_with_lock(LOCK);

    let missing = lockenv_in(dir.path()).arg("check").output().unwrap();
    assert_eq!(missing.status.code(), Some(3));

    assert!(lockenv_in(dir.path()).output().unwrap().status.success());
    let current = lockenv_in(dir.path()).arg("check").output().unwrap();
    assert!(current.status.success(), "stdout: {}", stdout(&current));
    assert!(stdout(&current).contains("is up to date"));

    let updated = format!(
        "{LOCK}- name: numpy\n  version: 1.26.0\n  manager: conda\n  platform: linux-64\n"
    );
    fs::write(dir.path().join("conda-lock.yml"), updated).unwrap();
    let stale = lockenv_in(dir.path())
        .args(["--json", "check"])
        .output()
        .unwrap();
    assert_eq!(stale.status.code(), Some(3));
    let payload: serde_json::Value = serde_json::from_slice(&stale.stdout).unwrap();
    assert_eq!(payload["status"], "stale");
}

#[test]
fn verbose_logs_resolved_options_to_stderr() {
    let dir = project_with_lock(LOCK);
    let output = lockenv_in(dir.path())
        .args(["--verbose", "generate"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("resolved options"), "{err}");
    assert!(!stdout(&output).contains("resolved options"));
}
