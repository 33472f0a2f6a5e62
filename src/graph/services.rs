//! Service enumeration

use crate::core::error::{ImpactError, ImpactResult};
use std::fs;
use std::path::Path;

/// List the services under `dir`: the names of its immediate subdirectories.
///
/// Symlinks are not followed. Names are sorted so the enumeration order (and
/// therefore the order of every reported list) does not depend on the
/// filesystem.
pub fn list_services(dir: &Path) -> ImpactResult<Vec<String>> {
  let entries = fs::read_dir(dir).map_err(|e| ImpactError::io(dir, e))?;

  let mut services = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|e| ImpactError::io(dir, e))?;
    let file_type = entry.file_type().map_err(|e| ImpactError::io(entry.path(), e))?;
    if file_type.is_dir() {
      services.push(entry.file_name().to_string_lossy().into_owned());
    }
  }

  services.sort();
  tracing::debug!(count = services.len(), "enumerated services in {}", dir.display());
  Ok(services)
}
