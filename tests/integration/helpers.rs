//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Module path the fake repositories live under
pub const BASE_REPOSITORY: &str = "acme/mono";

/// A throwaway Go monorepo checkout with a fake `go` binary
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  /// Create a repo with a `services/` directory, go.mod, and config pointing
  /// at the fake toolchain
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::create_dir_all(path.join("services"))?;
    std::fs::write(
      path.join("go.mod"),
      format!("module github.com/{}\n\ngo 1.22\n", BASE_REPOSITORY),
    )?;

    let repo = Self { _root: root, path };
    repo.install_fake_go()?;
    Ok(repo)
  }

  /// Add a service directory and its entry point
  pub fn add_service(&self, name: &str) -> Result<()> {
    std::fs::create_dir_all(self.path.join("services").join(name).join("app/v1"))?;
    let cmd_dir = self.path.join("cmd").join(name);
    std::fs::create_dir_all(&cmd_dir)?;
    std::fs::write(cmd_dir.join("main.go"), "package main\n\nfunc main() {}\n")?;
    Ok(())
  }

  /// Make the fake `go list -json cmd/<service>/main.go` report `deps`
  pub fn set_deps(&self, service: &str, deps: &[&str]) -> Result<()> {
    let report = serde_json::json!({
      "ImportPath": "command-line-arguments",
      "Name": "main",
      "Deps": deps,
    });
    std::fs::write(self.report_path(service, "json"), serde_json::to_string_pretty(&report)?)?;
    Ok(())
  }

  /// Make the fake `go list` for a service print raw stdout
  pub fn set_raw_report(&self, service: &str, stdout: &str) -> Result<()> {
    std::fs::write(self.report_path(service, "json"), stdout)?;
    Ok(())
  }

  /// Make the fake `go list` for a service print to stderr
  pub fn set_stderr(&self, service: &str, stderr: &str) -> Result<()> {
    std::fs::write(self.report_path(service, "stderr"), stderr)?;
    Ok(())
  }

  fn report_path(&self, service: &str, ext: &str) -> PathBuf {
    self
      .path
      .join(".fake-go/reports")
      .join(format!("cmd_{}_main.go.{}", service, ext))
  }

  #[cfg(unix)]
  fn install_fake_go(&self) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = self.path.join(".fake-go");
    std::fs::create_dir_all(dir.join("reports"))?;

    let script = dir.join("go");
    std::fs::write(
      &script,
      r#"#!/bin/sh
# usage: go list -json <entry point>
key=$(printf '%s' "$3" | tr '/' '_')
dir=$(dirname "$0")/reports
if [ -f "$dir/$key.stderr" ]; then cat "$dir/$key.stderr" >&2; fi
if [ -f "$dir/$key.json" ]; then cat "$dir/$key.json"; exit 0; fi
echo "stat $3: directory not found" >&2
exit 1
"#,
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

    std::fs::write(
      self.path.join("changed-services.toml"),
      format!("go_binary = {:?}\n", script.display().to_string()),
    )?;
    Ok(())
  }

  #[cfg(not(unix))]
  fn install_fake_go(&self) -> Result<()> {
    Ok(())
  }
}

/// Command for the changed-services binary with the Actions environment stripped
pub fn command(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_changed-services"));
  cmd
    .current_dir(cwd)
    .args(args)
    .env_remove("GITHUB_ACTIONS")
    .env_remove("GITHUB_OUTPUT")
    .env_remove("INPUT_BASE-REPOSITORY")
    .env_remove("INPUT_CHANGED-FILES")
    .env_remove("RUST_LOG");
  cmd
}

/// Run changed-services, failing on non-zero exit
pub fn run_changed_services(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = command(cwd, args).output().context("Failed to run changed-services")?;

  if !output.status.success() {
    anyhow::bail!(
      "changed-services {} failed\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }

  Ok(output)
}

/// Run `affected --format json` and return (count, services)
pub fn affected_json(cwd: &Path, changed_files: &str) -> Result<(u64, Vec<String>)> {
  let output = run_changed_services(
    cwd,
    &[
      "affected",
      "--base-repository",
      BASE_REPOSITORY,
      "--changed-files",
      changed_files,
      "--format",
      "json",
    ],
  )?;

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).context("stdout is not JSON")?;
  let count = json["services_count"].as_u64().context("missing services_count")?;
  let services = serde_json::from_value(json["services"].clone())?;
  Ok((count, services))
}
