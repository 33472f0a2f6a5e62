//! `go list -json` backend
//!
//! One subprocess per service entry point. The report is parsed from stdout;
//! anything on stderr fails the resolution even when go exits zero, since
//! `go list` reports build-constraint and module problems there.

use crate::core::error::{ImpactError, ImpactResult, ToolError};
use crate::graph::DependencyProvider;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Subset of the package report printed by `go list -json`.
///
/// A report without a `Deps` key is rejected rather than read as "no
/// dependencies"; every `main` package imports at least the runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoPackage {
  #[serde(default)]
  pub import_path: String,

  pub deps: Vec<String>,
}

impl GoPackage {
  /// Parse a single-package report
  pub fn parse(stdout: &[u8]) -> Result<Self, serde_json::Error> {
    serde_json::from_slice(stdout)
  }

  /// Dependencies inside `base_repository`, as repository-relative paths.
  ///
  /// A dependency is kept when its import path contains the base repository
  /// name anywhere; the first `<module_host>/<base_repository>/` occurrence is
  /// then stripped.
  pub fn in_repo_deps(&self, module_host: &str, base_repository: &str) -> Vec<String> {
    let prefix = format!("{}/{}/", module_host, base_repository);
    self
      .deps
      .iter()
      .filter(|dep| dep.contains(base_repository))
      .map(|dep| dep.replacen(&prefix, "", 1))
      .collect()
  }
}

/// Dependency provider backed by the Go toolchain
#[derive(Debug, Clone)]
pub struct GoListProvider {
  /// Directory go is run from (module root)
  root: PathBuf,

  /// Go binary (name on PATH or absolute path)
  go_binary: String,

  /// Module host, usually github.com
  module_host: String,

  /// Repository path under the host, e.g. `acme/monorepo`
  base_repository: String,
}

impl GoListProvider {
  pub fn new(
    root: impl Into<PathBuf>,
    go_binary: impl Into<String>,
    module_host: impl Into<String>,
    base_repository: impl Into<String>,
  ) -> Self {
    Self {
      root: root.into(),
      go_binary: go_binary.into(),
      module_host: module_host.into(),
      base_repository: base_repository.into(),
    }
  }

  /// Run `go list -json` for one entry point and return the raw report
  pub fn list(&self, entry_point: &str) -> ImpactResult<GoPackage> {
    let command = self.describe(entry_point);
    tracing::debug!(%command, "running");

    let output = self
      .go_cmd()
      .args(["list", "-json", entry_point])
      .output()
      .map_err(|source| {
        ImpactError::Tool(ToolError::SpawnFailed {
          command: command.clone(),
          source,
        })
      })?;

    check_output(&command, &output)?;

    GoPackage::parse(&output.stdout).map_err(|e| {
      ImpactError::Tool(ToolError::MalformedReport {
        command,
        reason: e.to_string(),
      })
    })
  }

  /// Create a go command rooted at the repository
  fn go_cmd(&self) -> Command {
    let mut cmd = Command::new(&self.go_binary);
    cmd.current_dir(&self.root);
    cmd
  }

  fn describe(&self, entry_point: &str) -> String {
    format!("{} list -json {}", self.go_binary, entry_point)
  }
}

impl DependencyProvider for GoListProvider {
  fn resolve(&self, entry_point: &Path) -> ImpactResult<Vec<String>> {
    let entry = entry_point.to_string_lossy();
    let package = self.list(&entry)?;
    let deps = package.in_repo_deps(&self.module_host, &self.base_repository);
    tracing::debug!(
      package = %package.import_path,
      total = package.deps.len(),
      in_repo = deps.len(),
      "resolved dependencies"
    );
    Ok(deps)
  }
}

/// Reject failed runs and runs that printed diagnostics
fn check_output(command: &str, output: &Output) -> ImpactResult<()> {
  let stderr = String::from_utf8_lossy(&output.stderr);

  if !output.status.success() {
    return Err(ImpactError::Tool(ToolError::CommandFailed {
      command: command.to_string(),
      stderr: stderr.trim().to_string(),
    }));
  }

  if !stderr.is_empty() {
    return Err(ImpactError::Tool(ToolError::Diagnostics {
      command: command.to_string(),
      stderr: stderr.trim().to_string(),
    }));
  }

  Ok(())
}
