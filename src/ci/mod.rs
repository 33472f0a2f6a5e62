//! GitHub Actions plumbing
//!
//! Step outputs, workflow commands (`::debug::`, `::error::`) and the
//! `INPUT_*` environment convention. Nothing here knows about services; the
//! commands hand it finished values.

use crate::core::error::{ImpactError, ImpactResult};
use sha2::{Digest, Sha256};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

static WORKFLOW_COMMANDS: AtomicBool = AtomicBool::new(false);

/// Environment variable GitHub uses to pass a step input named `name`.
///
/// Mirrors the runner convention: spaces become underscores and the name is
/// upper-cased. Hyphens are kept (`base-repository` → `INPUT_BASE-REPOSITORY`).
pub fn input_env_var(name: &str) -> String {
  format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read a step input from the environment, trimmed. Empty counts as unset.
pub fn get_input(name: &str) -> Option<String> {
  env::var(input_env_var(name))
    .ok()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

/// Whether the process runs inside a GitHub Actions job
pub fn is_github_actions() -> bool {
  env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Allow `::debug::` workflow commands on stdout.
///
/// Only the `github` format enables this; every other format owns stdout.
pub fn set_workflow_commands(enabled: bool) {
  WORKFLOW_COMMANDS.store(enabled, Ordering::Relaxed);
}

fn workflow_commands_enabled() -> bool {
  WORKFLOW_COMMANDS.load(Ordering::Relaxed) && is_github_actions()
}

/// Log a debug message; also emitted as a `::debug::` command under Actions
/// when workflow commands are enabled.
pub fn debug(message: &str) {
  tracing::debug!("{}", message);
  if workflow_commands_enabled() {
    println!("::debug::{}", escape_data(message));
  }
}

/// Mark the step as failed with `message`.
pub fn error(message: &str) {
  println!("::error::{}", escape_data(message));
}

/// Where step outputs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
  /// The file named by `GITHUB_OUTPUT`
  File(PathBuf),
  /// Legacy `::set-output` commands on stdout
  Stdout,
}

impl OutputSink {
  /// Pick the sink the current runner expects
  pub fn from_env() -> Self {
    match env::var_os("GITHUB_OUTPUT") {
      Some(path) if !path.is_empty() => OutputSink::File(PathBuf::from(path)),
      _ => OutputSink::Stdout,
    }
  }

  /// Set a step output
  pub fn set_output(&self, name: &str, value: &str) -> ImpactResult<()> {
    match self {
      OutputSink::File(path) => {
        let mut file = OpenOptions::new()
          .create(true)
          .append(true)
          .open(path)
          .map_err(|e| ImpactError::io(path, e))?;
        file
          .write_all(output_entry(name, value).as_bytes())
          .map_err(|e| ImpactError::io(path, e))?;
      }
      OutputSink::Stdout => {
        println!("::set-output name={}::{}", escape_property(name), escape_data(value));
      }
    }
    tracing::debug!(name, value, "set step output");
    Ok(())
  }
}

/// Format one `GITHUB_OUTPUT` entry.
///
/// Single-line values use `name=value`; anything with a newline is written as
/// a heredoc whose delimiter does not occur in the value.
pub fn output_entry(name: &str, value: &str) -> String {
  if !value.contains('\n') && !value.contains('\r') {
    return format!("{}={}\n", name, value);
  }

  let mut salt = 0u32;
  let delimiter = loop {
    let candidate = heredoc_delimiter(name, value, salt);
    if !value.contains(&candidate) {
      break candidate;
    }
    salt += 1;
  };

  format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

fn heredoc_delimiter(name: &str, value: &str, salt: u32) -> String {
  let mut hasher = Sha256::new();
  hasher.update(name.as_bytes());
  hasher.update(value.as_bytes());
  hasher.update(salt.to_le_bytes());
  hasher.update(std::process::id().to_le_bytes());
  let digest = format!("{:x}", hasher.finalize());
  format!("ghadelimiter_{}", &digest[..32])
}

/// Escape workflow command data
pub fn escape_data(s: &str) -> String {
  s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape workflow command properties
pub fn escape_property(s: &str) -> String {
  escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
