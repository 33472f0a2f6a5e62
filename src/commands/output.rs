//! Shared rendering of service lists

use crate::ci::{self, OutputSink};
use crate::core::error::{ImpactError, ImpactResult};
use serde_json::json;

/// Output format for service lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  /// Step outputs (`services_count`, `services`)
  Github,
  Json,
  Text,
  NamesOnly,
}

impl OutputFormat {
  pub fn from_str(s: &str) -> ImpactResult<Self> {
    match s.to_lowercase().as_str() {
      "github" | "gha" => Ok(Self::Github),
      "json" => Ok(Self::Json),
      "text" => Ok(Self::Text),
      "names" | "names-only" => Ok(Self::NamesOnly),
      _ => Err(ImpactError::message(format!(
        "Unknown format '{}'. Valid formats: github, json, text, names-only",
        s
      ))),
    }
  }

  /// Parse a format and switch workflow-command echoing to match it
  pub fn select(s: &str) -> ImpactResult<Self> {
    let format = Self::from_str(s)?;
    ci::set_workflow_commands(format == Self::Github);
    Ok(format)
  }
}

/// Write a list of services in the requested format.
///
/// `heading` labels the list in text output only.
pub fn write_services(services: &[String], format: OutputFormat, heading: &str) -> ImpactResult<()> {
  match format {
    OutputFormat::Github => {
      let sink = OutputSink::from_env();
      sink.set_output("services_count", &services.len().to_string())?;
      sink.set_output("services", &serde_json::to_string(services)?)?;
    }
    OutputFormat::Json => {
      let output = json!({
        "services_count": services.len(),
        "services": services,
      });
      println!("{}", serde_json::to_string_pretty(&output)?);
    }
    OutputFormat::Text => {
      println!("{}: {}", heading, services.len());
      for service in services {
        println!("  📦 {}", service);
      }
    }
    OutputFormat::NamesOnly => {
      for service in services {
        println!("{}", service);
      }
    }
  }

  ci::debug(&format!("{}: {}", heading, services.join(", ")));
  Ok(())
}
