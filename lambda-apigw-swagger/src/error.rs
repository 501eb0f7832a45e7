// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use thiserror::Error;

use std::path::PathBuf;

/// Error that occurred while reading or writing local project files.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the functions directory.
  #[error("failed to read functions directory `{}`", .path.display())]
  FunctionsDir {
    /// Path of the functions directory.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: Box<std::io::Error>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Project descriptor (or the section being rewritten) is not a JSON object.
  #[error("expected `{}` to contain a JSON object at `{pointer}`", .path.display())]
  NotAnObject {
    /// Path of the offending file.
    path: PathBuf,
    /// JSON pointer of the value that should have been an object.
    pointer: &'static str,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to JSON deserialize a project file.
  #[error("failed to parse `{}`", .path.display())]
  Parse {
    /// Path of the file that failed to parse.
    path: PathBuf,
    /// Underlying parse error, including the JSON path of the offending value.
    #[source]
    source: Box<serde_path_to_error::Error<serde_json::Error>>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to read a project file.
  #[error("failed to read `{}`", .path.display())]
  Read {
    /// Path of the file that failed to read.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: Box<std::io::Error>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to serialize the project descriptor.
  #[error("failed to serialize `{}`", .path.display())]
  Serialize {
    /// Path of the file being written.
    path: PathBuf,
    /// Underlying serialization error.
    #[source]
    source: Box<serde_json::Error>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to write a project file.
  #[error("failed to write `{}`", .path.display())]
  Write {
    /// Path of the file that failed to write.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: Box<std::io::Error>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
}

impl ConfigError {
  /// Return the backtrace associated with the error.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      ConfigError::FunctionsDir { backtrace, .. }
      | ConfigError::NotAnObject { backtrace, .. }
      | ConfigError::Parse { backtrace, .. }
      | ConfigError::Read { backtrace, .. }
      | ConfigError::Serialize { backtrace, .. }
      | ConfigError::Write { backtrace, .. } => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `Parse`).
  pub fn name(&self) -> &str {
    match self {
      ConfigError::FunctionsDir { .. } => "FunctionsDir",
      ConfigError::NotAnObject { .. } => "NotAnObject",
      ConfigError::Parse { .. } => "Parse",
      ConfigError::Read { .. } => "Read",
      ConfigError::Serialize { .. } => "Serialize",
      ConfigError::Write { .. } => "Write",
    }
  }
}

/// Error that occurred while rendering the Swagger document.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RenderError {
  /// A path-pattern override key is not a valid regular expression.
  #[error("invalid path pattern `{pattern}`")]
  InvalidPathPattern {
    /// Pattern as written in the project descriptor.
    pattern: String,
    /// Underlying regex compilation error.
    #[source]
    source: Box<regex::Error>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
}

impl RenderError {
  /// Return the backtrace associated with the error.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      RenderError::InvalidPathPattern { backtrace, .. } => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `InvalidPathPattern`).
  pub fn name(&self) -> &str {
    match self {
      RenderError::InvalidPathPattern { .. } => "InvalidPathPattern",
    }
  }
}
