use crate::client::RemoteError;

// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use itertools::Itertools;
use lambda_apigw_swagger::{ConfigError, RenderError};
use thiserror::Error;

use std::path::PathBuf;

/// Error that aborted a `create` or `update` command.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CommandError {
  /// Failed to read or write a local project file.
  #[error(transparent)]
  Config(#[from] ConfigError),
  /// Project descriptor has no `account_id`, which is needed to build permission source ARNs.
  #[error(
    "missing `account_id` in `{}` (required to grant API Gateway permission to invoke functions)",
    .0.display()
  )]
  MissingAccountId(PathBuf, _Backtrace),
  /// Neither the project descriptor nor the AWS environment specifies a region.
  #[error("unable to determine AWS region: set `region` in the project descriptor or AWS_REGION")]
  MissingRegion(_Backtrace),
  /// Project descriptor has no REST API identifier.
  #[error(
    "missing `x-api-gateway.rest-api-id` in `{}`; run the `create` command first",
    .0.display()
  )]
  MissingRestApiId(PathBuf, _Backtrace),
  /// One or more Lambda permission grants failed.
  #[error(
    "failed to grant API Gateway permission to invoke {} function(s): {}",
    .failed.len(),
    .failed.iter().join(", ")
  )]
  PermissionGrants {
    /// Names of the Lambda functions whose grant failed.
    failed: Vec<String>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// A request to AWS failed.
  #[error("{operation} request failed")]
  Remote {
    /// Name of the AWS API operation (e.g., `PutRestApi`).
    operation: &'static str,
    /// Underlying SDK error.
    #[source]
    source: RemoteError,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to render the Swagger document.
  #[error(transparent)]
  Render(#[from] RenderError),
  /// Project descriptor already references a REST API.
  #[error("project already has REST API `{rest_api_id}`; pass --force to create a new one")]
  RestApiExists {
    /// Existing REST API identifier.
    rest_api_id: String,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to serialize the Swagger document to JSON.
  #[error("failed to serialize Swagger document")]
  SerializeSwagger(#[source] Box<serde_json::Error>, _Backtrace),
  /// Failed to write the Swagger document to disk.
  #[error("failed to write Swagger document to `{}`", .path.display())]
  WriteSwagger {
    /// Output path.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: Box<std::io::Error>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
}

impl CommandError {
  /// Return the backtrace associated with the error, if known.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      CommandError::Config(err) => err.backtrace(),
      CommandError::Render(err) => err.backtrace(),
      CommandError::MissingAccountId(_, backtrace)
      | CommandError::MissingRegion(backtrace)
      | CommandError::MissingRestApiId(_, backtrace)
      | CommandError::PermissionGrants { backtrace, .. }
      | CommandError::Remote { backtrace, .. }
      | CommandError::RestApiExists { backtrace, .. }
      | CommandError::SerializeSwagger(_, backtrace)
      | CommandError::WriteSwagger { backtrace, .. } => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `MissingRestApiId`).
  pub fn name(&self) -> &str {
    match self {
      CommandError::Config(err) => err.name(),
      CommandError::MissingAccountId(_, _) => "MissingAccountId",
      CommandError::MissingRegion(_) => "MissingRegion",
      CommandError::MissingRestApiId(_, _) => "MissingRestApiId",
      CommandError::PermissionGrants { .. } => "PermissionGrants",
      CommandError::Remote { .. } => "Remote",
      CommandError::Render(err) => err.name(),
      CommandError::RestApiExists { .. } => "RestApiExists",
      CommandError::SerializeSwagger(_, _) => "SerializeSwagger",
      CommandError::WriteSwagger { .. } => "WriteSwagger",
    }
  }
}

/// Helper function for formatting an error as a string containing a human-readable chain of causes.
///
/// This function will walk over the chain of causes returned by
/// [`Error::source`](std::error::Error::source) and append each underlying error (using the
/// [`Display`](std::fmt::Display) trait).
///
/// # Arguments
///
/// * `err` - Error to format.
/// * `name` - Optional name of the error type/variant (e.g., `CommandError::Remote`).
/// * `backtrace` - Optional [`Backtrace`](backtrace::Backtrace) indicating where the top-level
///   error occurred.
pub fn format_error(
  err: &(dyn std::error::Error),
  name: Option<&str>,
  backtrace: Option<&_Backtrace>,
) -> String {
  let err_line = name
    .map(|n| format!("{}: {}", n, err))
    .unwrap_or_else(|| err.to_string());

  let top_error = if let Some(bt) = backtrace {
    format!("{err_line}\n  stack trace:\n{}", format_backtrace(bt, 4))
  } else {
    err_line
  };

  let cause_str = ErrorCauseIterator(err.source())
    .map(|cause| format!("  caused by: {cause}"))
    .join("\n");

  if !cause_str.is_empty() {
    format!("{top_error}\n{cause_str}")
  } else {
    top_error
  }
}

struct ErrorCauseIterator<'a>(Option<&'a (dyn std::error::Error + 'static)>);

impl<'a> Iterator for ErrorCauseIterator<'a> {
  type Item = &'a (dyn std::error::Error + 'static);

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.0;
    self.0 = current.and_then(|err| err.source());
    current
  }
}

fn format_backtrace(backtrace: &_Backtrace, indent: usize) -> String {
  let indent_str = " ".repeat(indent);
  format!("{backtrace:?}")
    .lines()
    .map(|line| format!("{indent_str}{line}"))
    .join("\n")
}
