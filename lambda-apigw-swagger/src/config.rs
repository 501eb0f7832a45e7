use crate::error::ConfigError;

// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use std::path::Path;

/// Default location of the project descriptor, relative to the current working directory.
pub const DEFAULT_PROJECT_PATH: &str = "project.json";

/// Key of the API Gateway section, both in `project.json` and in each `function.json`.
pub const GATEWAY_KEY: &str = "x-api-gateway";
const REST_API_ID_KEY: &str = "rest-api-id";

/// Project descriptor (`project.json`).
///
/// Only the fields this tool consumes are modeled here. Any other keys are left untouched when the
/// descriptor is rewritten by [`save_rest_api_id`](ProjectConfig::save_rest_api_id).
#[derive(Clone, Debug, Deserialize)]
pub struct ProjectConfig {
  /// Project name. Lambda functions are named `{project}_{function}`.
  pub name: String,
  /// Human-readable description passed to API Gateway on creation.
  #[serde(default)]
  pub description: Option<String>,
  /// AWS region (e.g., `us-east-1`). Falls back to the default AWS region provider chain.
  #[serde(default)]
  pub region: Option<String>,
  /// AWS account containing the Lambda functions.
  #[serde(default, alias = "accountId")]
  pub account_id: Option<String>,
  /// API Gateway settings.
  #[serde(default, rename = "x-api-gateway")]
  pub gateway: GatewayConfig,
}

/// The `x-api-gateway` section of the project descriptor.
#[derive(Clone, Debug, Deserialize)]
pub struct GatewayConfig {
  /// Identifier assigned by API Gateway when the REST API was created.
  #[serde(default, rename = "rest-api-id")]
  pub rest_api_id: Option<String>,
  /// Swagger `basePath` (default `/`).
  #[serde(default = "default_base_path")]
  pub base_path: String,
  /// Stage to deploy to (default `prod`).
  #[serde(default = "default_stage_name")]
  pub stage_name: String,
  /// Path-pattern overrides: regular expression (matched against the whole path) mapped to a
  /// partial Swagger path item applied as low-precedence defaults.
  #[serde(default)]
  pub paths: IndexMap<String, Value>,
  /// Partial Swagger operation used as defaults for every function-backed operation. The
  /// `x-amazon-apigateway-integration.uri` may contain a `{{functionName}}` placeholder.
  #[serde(default = "empty_object", rename = "swagger-func-template")]
  pub func_template: Value,
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self {
      rest_api_id: None,
      base_path: default_base_path(),
      stage_name: default_stage_name(),
      paths: IndexMap::new(),
      func_template: empty_object(),
    }
  }
}

fn default_base_path() -> String {
  "/".to_string()
}

fn default_stage_name() -> String {
  "prod".to_string()
}

fn empty_object() -> Value {
  Value::Object(Map::new())
}

impl ProjectConfig {
  /// Read and parse the project descriptor at `path`.
  pub fn load<P>(path: P) -> Result<Self, ConfigError>
  where
    P: AsRef<Path>,
  {
    read_json(path.as_ref())
  }

  /// Persist `rest_api_id` into the `x-api-gateway` section of the descriptor at `path`.
  ///
  /// The descriptor is re-read as a raw JSON document so that keys unknown to [`ProjectConfig`]
  /// survive the rewrite in their original order. The result is pretty-printed with two-space
  /// indentation.
  pub fn save_rest_api_id<P>(path: P, rest_api_id: &str) -> Result<(), ConfigError>
  where
    P: AsRef<Path>,
  {
    let path = path.as_ref();
    let mut document = read_json::<Value>(path)?;

    let Value::Object(root) = &mut document else {
      return Err(ConfigError::NotAnObject {
        path: path.to_owned(),
        pointer: "",
        backtrace: _Backtrace::new(),
      });
    };
    let Value::Object(gateway) = root
      .entry(GATEWAY_KEY)
      .or_insert_with(|| Value::Object(Map::new()))
    else {
      return Err(ConfigError::NotAnObject {
        path: path.to_owned(),
        pointer: "/x-api-gateway",
        backtrace: _Backtrace::new(),
      });
    };
    gateway.insert(
      REST_API_ID_KEY.to_string(),
      Value::String(rest_api_id.to_owned()),
    );

    let mut contents =
      serde_json::to_string_pretty(&document).map_err(|err| ConfigError::Serialize {
        path: path.to_owned(),
        source: Box::new(err),
        backtrace: _Backtrace::new(),
      })?;
    contents.push('\n');

    std::fs::write(path, contents).map_err(|err| ConfigError::Write {
      path: path.to_owned(),
      source: Box::new(err),
      backtrace: _Backtrace::new(),
    })
  }
}

/// Read `path` and deserialize it as JSON, tracking the path to any field that fails to parse.
pub(crate) fn read_json<T>(path: &Path) -> Result<T, ConfigError>
where
  T: DeserializeOwned,
{
  let contents = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
    path: path.to_owned(),
    source: Box::new(err),
    backtrace: _Backtrace::new(),
  })?;

  serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(&contents)).map_err(
    |err| ConfigError::Parse {
      path: path.to_owned(),
      source: Box::new(err),
      backtrace: _Backtrace::new(),
    },
  )
}
