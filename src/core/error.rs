//! Error types for changed-services with contextual messages and exit codes
//!
//! Every failure in a run is fatal: there is no partial or degraded output mode.
//! Errors are categorized so the CLI can pick an exit code and, where possible,
//! print a suggestion alongside the message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for changed-services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid inputs)
  User = 1,
  /// System error (filesystem, go toolchain)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for changed-services
#[derive(Debug)]
pub enum ImpactError {
  /// Configuration errors
  Config(ConfigError),

  /// Malformed action inputs
  Input(InputError),

  /// Dependency tool (go list) errors
  Tool(ToolError),

  /// Filesystem errors with the path that failed
  Io { path: PathBuf, source: io::Error },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },

  /// Any other error, annotated with what was being done when it occurred
  Context { context: String, source: Box<ImpactError> },
}

impl ImpactError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ImpactError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ImpactError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Wrap an I/O error with the path it occurred on
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    ImpactError::Io {
      path: path.into(),
      source,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ImpactError::Message { message, context, help } => ImpactError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => ImpactError::Context {
        context: ctx_str,
        source: Box::new(other),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ImpactError::Config(_) => ExitCode::User,
      ImpactError::Input(_) => ExitCode::User,
      ImpactError::Tool(_) => ExitCode::System,
      ImpactError::Io { .. } => ExitCode::System,
      ImpactError::Message { .. } => ExitCode::User,
      ImpactError::Context { source, .. } => source.exit_code(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ImpactError::Config(e) => e.help_message(),
      ImpactError::Input(e) => e.help_message(),
      ImpactError::Tool(e) => e.help_message(),
      ImpactError::Io { path, source } if source.kind() == io::ErrorKind::NotFound => Some(format!(
        "Check that {} exists and that --root points at the repository checkout.",
        path.display()
      )),
      ImpactError::Message { help, .. } => help.clone(),
      ImpactError::Context { source, .. } => source.help_message(),
      _ => None,
    }
  }
}

impl fmt::Display for ImpactError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ImpactError::Config(e) => write!(f, "{}", e),
      ImpactError::Input(e) => write!(f, "{}", e),
      ImpactError::Tool(e) => write!(f, "{}", e),
      ImpactError::Io { path, source } => write!(f, "I/O error at {}: {}", path.display(), source),
      ImpactError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
      ImpactError::Context { context, source } => write!(f, "{}\n{}", source, context),
    }
  }
}

impl std::error::Error for ImpactError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ImpactError::Io { source, .. } => Some(source),
      ImpactError::Input(InputError::ChangedFiles { source }) => Some(source),
      ImpactError::Context { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for ImpactError {
  fn from(err: io::Error) -> Self {
    ImpactError::message(format!("I/O error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ImpactError {
  fn from(err: toml_edit::de::Error) -> Self {
    ImpactError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ImpactError {
  fn from(err: serde_json::Error) -> Self {
    ImpactError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file named on the command line does not exist
  NotFound { path: PathBuf },

  /// Required input was not supplied by flag or environment
  MissingInput { name: String },

  /// A config value failed validation
  InvalidValue { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Omit --config to use defaults, or create changed-services.toml at the repository root.".to_string())
      }
      ConfigError::MissingInput { name } => Some(format!(
        "Pass --{} or set it under `with:` in the workflow step.",
        name
      )),
      ConfigError::InvalidValue { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::MissingInput { name } => {
        write!(f, "Input required and not supplied: {}", name)
      }
      ConfigError::InvalidValue { field, reason } => {
        write!(f, "Invalid config value for '{}': {}", field, reason)
      }
    }
  }
}

/// Malformed inputs
#[derive(Debug)]
pub enum InputError {
  /// changed-files is not a JSON array of strings
  ChangedFiles { source: serde_json::Error },
}

impl InputError {
  fn help_message(&self) -> Option<String> {
    match self {
      InputError::ChangedFiles { .. } => {
        Some("changed-files must be a JSON array of paths, e.g. [\"services/auth/main.go\"].".to_string())
      }
    }
  }
}

impl fmt::Display for InputError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InputError::ChangedFiles { source } => {
        write!(f, "Failed to parse changed-files input: {}", source)
      }
    }
  }
}

/// Dependency tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The tool could not be started
  SpawnFailed { command: String, source: io::Error },

  /// The tool exited with a non-zero status
  CommandFailed { command: String, stderr: String },

  /// The tool wrote diagnostics to stderr
  Diagnostics { command: String, stderr: String },

  /// The tool's report could not be parsed
  MalformedReport { command: String, reason: String },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::SpawnFailed { source, .. } if source.kind() == io::ErrorKind::NotFound => {
        Some("Install Go (e.g. actions/setup-go) or set go_binary in changed-services.toml.".to_string())
      }
      ToolError::CommandFailed { stderr, .. } | ToolError::Diagnostics { stderr, .. } => {
        if stderr.contains("no Go files") || stderr.contains("no such file") {
          Some("Every service directory needs an entry point; check entry_point in changed-services.toml.".to_string())
        } else {
          None
        }
      }
      _ => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::SpawnFailed { command, source } => {
        write!(f, "Failed to run {}: {}", command, source)
      }
      ToolError::CommandFailed { command, stderr } => {
        write!(f, "Command failed: {}\n{}", command, stderr)
      }
      ToolError::Diagnostics { command, stderr } => {
        write!(f, "Command reported errors: {}\n{}", command, stderr)
      }
      ToolError::MalformedReport { command, reason } => {
        write!(f, "Could not parse output of {}: {}", command, reason)
      }
    }
  }
}

/// Result type alias for changed-services
pub type ImpactResult<T> = Result<T, ImpactError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ImpactResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ImpactError>,
{
  fn with_context<F>(self, f: F) -> ImpactResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ImpactError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
