use super::DependencyProvider;
use crate::core::error::{ImpactError, ImpactResult, ToolError};
use std::collections::HashMap;
use std::path::Path;

/// In-memory provider keyed by entry point. Unknown entry points fail the
/// way a missing `main.go` fails `go list`.
#[derive(Default)]
pub struct FakeProvider {
  deps: HashMap<String, Vec<String>>,
}

impl FakeProvider {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, entry_point: &str, deps: &[&str]) -> Self {
    self
      .deps
      .insert(entry_point.to_string(), deps.iter().map(|d| d.to_string()).collect());
    self
  }
}

impl DependencyProvider for FakeProvider {
  fn resolve(&self, entry_point: &Path) -> ImpactResult<Vec<String>> {
    let key = entry_point.to_string_lossy();
    self.deps.get(&*key).cloned().ok_or_else(|| {
      ImpactError::Tool(ToolError::CommandFailed {
        command: format!("go list -json {}", key),
        stderr: format!("stat {}: no such file or directory", key),
      })
    })
  }
}
