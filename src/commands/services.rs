//! `changed-services services` - List every service without resolving graphs

use super::output::{OutputFormat, write_services};
use crate::core::context::RepoContext;
use crate::core::error::ImpactResult;
use crate::graph::list_services;

/// Run the services command
pub fn run_services(ctx: &RepoContext, format: String) -> ImpactResult<()> {
  let output_format = OutputFormat::select(&format)?;
  let services = list_services(&ctx.services_root())?;
  write_services(&services, output_format, "Services")
}
