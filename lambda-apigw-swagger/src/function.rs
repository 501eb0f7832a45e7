use crate::config::read_json;
use crate::error::ConfigError;

use backtrace::Backtrace as _Backtrace;
use itertools::Itertools;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use std::path::Path;

/// Default directory containing one subdirectory per Lambda function.
pub const DEFAULT_FUNCTIONS_DIR: &str = "functions";

const FUNCTION_FILENAME: &str = "function.json";

/// Contents of a `function.json` file.
///
/// Keys other than `description` and `x-api-gateway` (e.g., runtime or memory settings used by
/// other tooling) are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FunctionConfig {
  /// Description copied into the rendered Swagger operation.
  #[serde(default)]
  pub description: Option<String>,
  /// Route exposed through API Gateway, if any.
  #[serde(default, rename = "x-api-gateway")]
  pub route: Option<FunctionRoute>,
}

/// The `x-api-gateway` section of a `function.json` file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FunctionRoute {
  /// Request path (e.g., `/orders/{id}`).
  #[serde(default)]
  pub path: Option<String>,
  /// HTTP method (case-insensitive).
  #[serde(default)]
  pub method: Option<String>,
  /// Swagger parameter objects for the operation.
  #[serde(default)]
  pub parameters: Option<Value>,
}

/// A Lambda function discovered under the functions directory.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefinition {
  /// Function name, taken from the name of its directory.
  pub name: String,
  /// Parsed `function.json`.
  pub config: FunctionConfig,
}

impl FunctionDefinition {
  /// Construct a definition from a function name and its parsed `function.json`.
  pub fn new<N>(name: N, config: FunctionConfig) -> Self
  where
    N: Into<String>,
  {
    Self {
      name: name.into(),
      config,
    }
  }

  /// Return the `(path, method)` pair if the function is exposed through API Gateway.
  ///
  /// Functions that declare only one of the two are not exposed.
  pub fn route(&self) -> Option<(&str, &str)> {
    let route = self.config.route.as_ref()?;
    Some((route.path.as_deref()?, route.method.as_deref()?))
  }

  /// Swagger parameters declared by the function, if any.
  pub fn parameters(&self) -> Option<&Value> {
    self
      .config
      .route
      .as_ref()
      .and_then(|route| route.parameters.as_ref())
  }
}

/// Parse the `function.json` in each immediate subdirectory of `functions_dir`.
///
/// A function whose definition is missing or fails to parse is logged and skipped so that the
/// remaining functions are still processed. Failing to list `functions_dir` itself is an error.
/// Functions are returned sorted by name.
pub fn scan_functions<P>(functions_dir: P) -> Result<Vec<FunctionDefinition>, ConfigError>
where
  P: AsRef<Path>,
{
  let functions_dir = functions_dir.as_ref();
  let entries = std::fs::read_dir(functions_dir).map_err(|err| ConfigError::FunctionsDir {
    path: functions_dir.to_owned(),
    source: Box::new(err),
    backtrace: _Backtrace::new(),
  })?;

  let definitions = entries
    .filter_map(|entry| match entry {
      Ok(entry) => Some(entry.path()),
      Err(err) => {
        warn!(
          "skipping unreadable entry in {}: {err}",
          functions_dir.display()
        );
        None
      }
    })
    .filter(|path| path.is_dir())
    .sorted()
    .filter_map(|function_dir| {
      let Some(name) = function_dir.file_name().and_then(|name| name.to_str()) else {
        warn!(
          "skipping function directory with non-UTF-8 name: {}",
          function_dir.display()
        );
        return None;
      };

      match read_json(&function_dir.join(FUNCTION_FILENAME)) {
        Ok(config) => {
          debug!("loaded function `{name}`");
          Some(FunctionDefinition::new(name, config))
        }
        Err(err) => {
          let cause = std::error::Error::source(&err)
            .map(|cause| format!(": {cause}"))
            .unwrap_or_default();
          warn!("skipping function `{name}`: {err}{cause}");
          None
        }
      }
    })
    .collect();

  Ok(definitions)
}
