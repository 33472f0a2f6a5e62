//! Per-service dependency graph
//!
//! Each service is resolved independently through a [`DependencyProvider`].
//! Resolutions block on a subprocess, so they run on a dedicated rayon pool
//! with one thread per service rather than the CPU-sized global pool, and are
//! joined before anything reads the graph. The first failure fails the whole
//! build.

use super::DependencyProvider;
use crate::core::config::ImpactConfig;
use crate::core::error::{ImpactError, ImpactResult, ResultExt};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Service → repository-relative paths its entry point depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
  deps: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
  /// Resolve every service concurrently, all of them in flight at once.
  ///
  /// Returns either the complete graph or the first error observed. Sibling
  /// resolutions already in flight are left to finish; their results are
  /// discarded.
  pub fn build(services: &[String], config: &ImpactConfig, provider: &dyn DependencyProvider) -> ImpactResult<Self> {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(services.len().max(1))
      .thread_name(|i| format!("resolve-{}", i))
      .build()
      .map_err(|e| ImpactError::message(format!("Failed to start resolver threads: {}", e)))?;

    let resolved: ImpactResult<Vec<(String, Vec<String>)>> = pool.install(|| {
      services
        .par_iter()
        .with_max_len(1)
        .map(|service| -> ImpactResult<(String, Vec<String>)> {
          let entry_point = config.entry_point_for(service);
          let deps = provider
            .resolve(Path::new(&entry_point))
            .with_context(|| format!("Failed to resolve dependencies of service '{}'", service))?;
          Ok((service.clone(), deps))
        })
        .collect()
    });

    let graph = Self {
      deps: resolved?.into_iter().collect(),
    };
    tracing::debug!(services = graph.len(), "dependency graph built");
    Ok(graph)
  }

  /// Resolved dependencies of a service (empty if unknown)
  pub fn dependencies(&self, service: &str) -> &[String] {
    self.deps.get(service).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn len(&self) -> usize {
    self.deps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.deps.is_empty()
  }
}

impl FromIterator<(String, Vec<String>)> for DependencyGraph {
  fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
    Self {
      deps: iter.into_iter().collect(),
    }
  }
}
