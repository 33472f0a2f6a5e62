use crate::core::error::{ConfigError, ImpactError, ImpactResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the service name in `entry_point`
pub const SERVICE_PLACEHOLDER: &str = "{service}";

/// Configuration for changed-services
/// Searched in order: changed-services.toml, .changed-services.toml, .github/changed-services.toml
///
/// Every key is optional; a repository laid out as `services/<name>` with
/// entry points at `cmd/<name>/main.go` needs no config file at all.
///
/// # Example
///
/// ```toml
/// services_dir = "services"
/// entry_point = "cmd/{service}/main.go"
/// shared_manifests = ["go.mod", "go.sum"]
/// module_host = "github.com"
/// go_binary = "go"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactConfig {
  /// Directory (relative to the repository root) whose subdirectories are services
  #[serde(default = "default_services_dir")]
  pub services_dir: String,

  /// Entry point passed to `go list`, with `{service}` substituted
  #[serde(default = "default_entry_point")]
  pub entry_point: String,

  /// Changed files that mark every service as impacted
  #[serde(default = "default_shared_manifests")]
  pub shared_manifests: Vec<String>,

  /// Host prefix of the module path (`<host>/<base-repository>/...`)
  #[serde(default = "default_module_host")]
  pub module_host: String,

  /// Go toolchain binary
  #[serde(default = "default_go_binary")]
  pub go_binary: String,
}

fn default_services_dir() -> String {
  "services".to_string()
}

fn default_entry_point() -> String {
  "cmd/{service}/main.go".to_string()
}

fn default_shared_manifests() -> Vec<String> {
  vec!["go.mod".to_string(), "go.sum".to_string()]
}

fn default_module_host() -> String {
  "github.com".to_string()
}

fn default_go_binary() -> String {
  "go".to_string()
}

impl Default for ImpactConfig {
  fn default() -> Self {
    Self {
      services_dir: default_services_dir(),
      entry_point: default_entry_point(),
      shared_manifests: default_shared_manifests(),
      module_host: default_module_host(),
      go_binary: default_go_binary(),
    }
  }
}

impl ImpactConfig {
  /// Find config file in search order
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("changed-services.toml"),
      root.join(".changed-services.toml"),
      root.join(".github").join("changed-services.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from an explicit path, or search the repository root.
  ///
  /// An explicit path that does not exist is an error; a search that finds
  /// nothing falls back to the defaults.
  pub fn load(root: &Path, explicit: Option<&Path>) -> ImpactResult<Self> {
    let config_path = match explicit {
      Some(path) => {
        if !path.exists() {
          return Err(ImpactError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
          }));
        }
        path.to_path_buf()
      }
      None => match Self::find_config_path(root) {
        Some(path) => path,
        None => {
          tracing::debug!("no config file under {}, using defaults", root.display());
          return Ok(Self::default());
        }
      },
    };

    tracing::debug!("loading config from {}", config_path.display());
    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))
  }

  /// Parse and validate a config document
  pub fn parse(content: &str) -> ImpactResult<Self> {
    let config: ImpactConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate config values
  pub fn validate(&self) -> ImpactResult<()> {
    if !self.entry_point.contains(SERVICE_PLACEHOLDER) {
      return Err(invalid("entry_point", format!("must contain {}", SERVICE_PLACEHOLDER)));
    }

    for (field, value) in [
      ("services_dir", &self.services_dir),
      ("module_host", &self.module_host),
      ("go_binary", &self.go_binary),
    ] {
      if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty".to_string()));
      }
    }

    Ok(())
  }

  /// Entry point of a service, relative to the repository root
  pub fn entry_point_for(&self, service: &str) -> String {
    self.entry_point.replace(SERVICE_PLACEHOLDER, service)
  }

  /// Path prefix that marks a changed file as belonging to a service's own directory
  pub fn service_path(&self, service: &str) -> String {
    format!("{}/{}", self.services_dir.trim_end_matches('/'), service)
  }

  /// Whether a changed file is one of the shared manifests
  pub fn is_shared_manifest(&self, file: &str) -> bool {
    self.shared_manifests.iter().any(|m| m == file)
  }
}

fn invalid(field: &str, reason: String) -> ImpactError {
  ImpactError::Config(ConfigError::InvalidValue {
    field: field.to_string(),
    reason,
  })
}
