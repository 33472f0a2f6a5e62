//! CLI commands for changed-services
//!
//! - **affected**: services impacted by a set of changed files
//! - **services**: every service under the services root
//! - **deps**: per-service relevance sets from `go list`
//!
//! All commands accept `&RepoContext` so the config is loaded once.

pub mod affected;
pub mod deps;
pub mod output;
pub mod services;

pub use affected::run_affected;
pub use deps::run_deps;
pub use services::run_services;

use crate::ci;
use crate::core::error::{ConfigError, ImpactError, ImpactResult};

/// Take an input from its command-line flag, falling back to the
/// `INPUT_<NAME>` variable the Actions runner sets.
pub(crate) fn require_input(flag: Option<String>, name: &str) -> ImpactResult<String> {
  flag
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
    .or_else(|| ci::get_input(name))
    .ok_or_else(|| {
      ImpactError::Config(ConfigError::MissingInput {
        name: name.to_string(),
      })
    })
}
