//! Impacted service analysis
//!
//! Given the enumerated services and the changed files, determine which
//! services need a rebuild:
//! - A change to a shared manifest (go.mod / go.sum) impacts every service
//!   without resolving any graph
//! - Otherwise a service is impacted when some changed file contains its own
//!   directory or one of its resolved dependency paths as a substring
//!
//! Matching is plain substring containment, not path-segment matching: a
//! dependency `pkg/db` also matches `pkg/dbmigrate/run.go`.

use super::{DependencyGraph, DependencyProvider};
use crate::core::config::ImpactConfig;
use crate::core::error::ImpactResult;

/// Result of an impact analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactReport {
  /// Files that changed, in input order
  pub changed_files: Vec<String>,

  /// Impacted services, in enumeration order
  pub services: Vec<String>,

  /// Whether a shared manifest changed and every service was selected
  pub shortcut: bool,
}

impl ImpactReport {
  pub fn count(&self) -> usize {
    self.services.len()
  }
}

/// Analyze which services are impacted by the changed files.
///
/// The dependency graph is only built (through `provider`) when no shared
/// manifest changed.
pub fn analyze(
  services: &[String],
  changed_files: &[String],
  config: &ImpactConfig,
  provider: &dyn DependencyProvider,
) -> ImpactResult<ImpactReport> {
  if let Some(manifest) = changed_files.iter().find(|f| config.is_shared_manifest(f)) {
    tracing::info!("{} changed, selecting all {} services", manifest, services.len());
    return Ok(ImpactReport {
      changed_files: changed_files.to_vec(),
      services: services.to_vec(),
      shortcut: true,
    });
  }

  let graph = DependencyGraph::build(services, config, provider)?;

  Ok(ImpactReport {
    changed_files: changed_files.to_vec(),
    services: impacted_services(services, changed_files, config, &graph),
    shortcut: false,
  })
}

/// Filter services against a fully built dependency graph.
pub fn impacted_services(
  services: &[String],
  changed_files: &[String],
  config: &ImpactConfig,
  graph: &DependencyGraph,
) -> Vec<String> {
  services
    .iter()
    .filter(|service| {
      let relevance = relevance_set(service, config, graph);
      let hit = changed_files
        .iter()
        .find(|file| relevance.iter().any(|entry| file.contains(entry.as_str())));
      if let Some(file) = hit {
        tracing::debug!(service = %service, file = %file, "impacted");
      }
      hit.is_some()
    })
    .cloned()
    .collect()
}

/// Paths whose modification impacts `service`: its own directory followed by
/// its resolved dependencies.
pub fn relevance_set(service: &str, config: &ImpactConfig, graph: &DependencyGraph) -> Vec<String> {
  let deps = graph.dependencies(service);
  let mut relevance = Vec::with_capacity(deps.len() + 1);
  relevance.push(config.service_path(service));
  relevance.extend(deps.iter().cloned());
  relevance
}
