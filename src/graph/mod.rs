//! Service dependency analysis
//!
//! The graph is assembled from whatever a [`DependencyProvider`] reports for
//! each service's entry point; the go toolchain is one such provider.

pub mod affected;
pub mod dependency_graph;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use affected::ImpactReport;
pub use dependency_graph::DependencyGraph;
pub use services::list_services;

use crate::core::error::ImpactResult;
use std::path::Path;

/// Source of per-service dependency information.
pub trait DependencyProvider: Send + Sync {
  /// Repository-relative paths the given entry point depends on
  fn resolve(&self, entry_point: &Path) -> ImpactResult<Vec<String>>;
}
