//! Repository context - build once, pass everywhere
//!
//! `RepoContext` resolves the repository root and loads the optional config
//! file a single time in main.rs, then every command borrows it.

use crate::core::config::ImpactConfig;
use crate::core::error::{ImpactError, ImpactResult};
use std::path::{Path, PathBuf};

/// Shared repository-level data for a single invocation.
#[derive(Debug, Clone)]
pub struct RepoContext {
  /// Repository root (the workflow checkout)
  pub root: PathBuf,

  /// Loaded configuration (defaults when no file exists)
  pub config: ImpactConfig,
}

impl RepoContext {
  /// Build context for a repository root, loading config from `config_path`
  /// or from the default search locations.
  pub fn build(root: &Path, config_path: Option<&Path>) -> ImpactResult<Self> {
    if !root.is_dir() {
      return Err(ImpactError::with_help(
        format!("Repository root is not a directory: {}", root.display()),
        "Pass --root pointing at the repository checkout.",
      ));
    }

    let config = ImpactConfig::load(root, config_path)?;

    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  /// Absolute path of the services root
  pub fn services_root(&self) -> PathBuf {
    self.root.join(&self.config.services_dir)
  }
}
