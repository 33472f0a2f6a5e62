//! `changed-services affected` - Report which services need a rebuild
//!
//! Reads the changed files, enumerates services, and either selects every
//! service (shared manifest changed) or resolves each service's dependency
//! graph with `go list` and filters against it.

use super::output::{OutputFormat, write_services};
use super::require_input;
use crate::ci;
use crate::core::context::RepoContext;
use crate::core::error::{ImpactError, ImpactResult, InputError};
use crate::go::GoListProvider;
use crate::graph::{ImpactReport, affected, list_services};

/// Run the affected command
pub fn run_affected(
  ctx: &RepoContext,
  base_repository: Option<String>,
  changed_files: Option<String>,
  format: String,
) -> ImpactResult<()> {
  let output_format = OutputFormat::select(&format)?;
  let base_repository = require_input(base_repository, "base-repository")?;
  let changed_files = parse_changed_files(&require_input(changed_files, "changed-files")?)?;

  ci::debug(&format!("Changed files: {}", changed_files.join(", ")));

  let services = list_services(&ctx.services_root())?;
  let provider = GoListProvider::new(
    &ctx.root,
    &ctx.config.go_binary,
    &ctx.config.module_host,
    base_repository,
  );

  let report = affected::analyze(&services, &changed_files, &ctx.config, &provider)?;
  tracing::info!(
    impacted = report.count(),
    total = services.len(),
    shortcut = report.shortcut,
    "impact analysis complete"
  );

  display_report(&report, output_format)
}

/// Parse the `changed-files` input: a JSON array of path strings
pub fn parse_changed_files(raw: &str) -> ImpactResult<Vec<String>> {
  serde_json::from_str(raw).map_err(|source| ImpactError::Input(InputError::ChangedFiles { source }))
}

fn display_report(report: &ImpactReport, format: OutputFormat) -> ImpactResult<()> {
  if format == OutputFormat::Text {
    println!("Changed files: {}", report.changed_files.len());
    if report.shortcut {
      println!("Shared manifest changed, every service is selected");
    }
    println!();
  }

  write_services(&report.services, format, "Changed services")
}
