//! `changed-services deps` - Show the resolved dependency graph
//!
//! Prints the relevance set of every service (its own directory plus the
//! in-repository packages `go list` reports), which is exactly what the
//! affected command matches changed files against.

use super::require_input;
use crate::core::context::RepoContext;
use crate::core::error::ImpactResult;
use crate::go::GoListProvider;
use crate::graph::affected::relevance_set;
use crate::graph::{DependencyGraph, list_services};
use serde_json::json;

/// Run the deps command
pub fn run_deps(ctx: &RepoContext, base_repository: Option<String>, json: bool) -> ImpactResult<()> {
  let base_repository = require_input(base_repository, "base-repository")?;
  let services = list_services(&ctx.services_root())?;
  let provider = GoListProvider::new(
    &ctx.root,
    &ctx.config.go_binary,
    &ctx.config.module_host,
    base_repository,
  );

  let graph = DependencyGraph::build(&services, &ctx.config, &provider)?;

  if json {
    let output: serde_json::Map<String, serde_json::Value> = services
      .iter()
      .map(|service| (service.clone(), json!(relevance_set(service, &ctx.config, &graph))))
      .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    return Ok(());
  }

  if graph.is_empty() {
    println!("No services under {}", ctx.services_root().display());
    return Ok(());
  }

  for service in &services {
    println!("{} ({})", service, ctx.config.entry_point_for(service));
    for path in relevance_set(service, &ctx.config, &graph) {
      println!("  └─ {}", path);
    }
  }

  Ok(())
}
