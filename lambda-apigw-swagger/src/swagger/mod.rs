use crate::config::ProjectConfig;
use crate::error::RenderError;
use crate::function::FunctionDefinition;
use crate::integration::{
  lambda_function_name, lambda_invocation_uri, operation_key, substitute_function_name,
  template_integration_uri, API_GATEWAY_INTEGRATION_EXTENSION,
};
use crate::merge::{default_merge, default_merge_object};

use backtrace::Backtrace as _Backtrace;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use log::{debug, warn};
use regex::Regex;
use serde_json::{json, Map, Value};

#[cfg(test)]
mod tests;

/// Rendered Swagger path table: request path -> operation key (lower-case HTTP method, or
/// `x-amazon-apigateway-any-method`) -> operation object.
pub type Paths = IndexMap<String, Map<String, Value>>;

/// Render the full Swagger 2.0 document for `project`.
///
/// `rendered_at` becomes the document's `info.version`.
pub fn render_swagger(
  project: &ProjectConfig,
  functions: &[FunctionDefinition],
  rendered_at: DateTime<Utc>,
) -> Result<Value, RenderError> {
  let paths = render_paths(project, functions)?;
  Ok(render_document(project, paths, rendered_at))
}

/// Build the Swagger path table from the exposed functions and the project's path-pattern
/// overrides.
///
/// Each operation is populated in order of precedence from:
///  1. The function's own `description`, `parameters`, and integration URI.
///  2. The project's `swagger-func-template`.
///  3. Every path-pattern override whose regular expression matches the entire request path.
///
/// Lower-precedence sources only fill in fields that are still missing (see
/// [`default_merge`](crate::default_merge)). If several functions declare the same path and method,
/// the last one wins.
pub fn render_paths(
  project: &ProjectConfig,
  functions: &[FunctionDefinition],
) -> Result<Paths, RenderError> {
  let mut paths = Paths::new();

  for function in functions {
    let Some((path, method)) = function.route() else {
      debug!(
        "function `{}` does not declare a path and method; not exposing it",
        function.name
      );
      continue;
    };

    let operation = render_operation(project, function);
    let path_item = paths.entry(path.to_owned()).or_default();
    if path_item.insert(operation_key(method), operation).is_some() {
      warn!(
        "{} {path} is declared by multiple functions; using `{}`",
        method.to_uppercase(),
        function.name
      );
    }
  }

  for (pattern, path_item_defaults) in &project.gateway.paths {
    let Value::Object(path_item_defaults) = path_item_defaults else {
      warn!("ignoring path pattern `{pattern}`: value is not an object");
      continue;
    };
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
      RenderError::InvalidPathPattern {
        pattern: pattern.to_owned(),
        source: Box::new(err),
        backtrace: _Backtrace::new(),
      }
    })?;

    for (path, path_item) in paths.iter_mut().filter(|(path, _)| regex.is_match(path)) {
      debug!("applying path pattern `{pattern}` to {path}");
      default_merge_object(path_item, path_item_defaults);
    }
  }

  Ok(paths)
}

fn render_operation(project: &ProjectConfig, function: &FunctionDefinition) -> Value {
  let template = &project.gateway.func_template;
  let lambda_name = lambda_function_name(&project.name, &function.name);

  let mut operation = Map::new();
  if let Some(description) = &function.config.description {
    operation.insert(
      "description".to_string(),
      Value::String(description.to_owned()),
    );
  }

  let integration_uri = match (
    template_integration_uri(template),
    &project.region,
    &project.account_id,
  ) {
    (Some(uri_template), _, _) => Some(substitute_function_name(uri_template, &lambda_name)),
    (None, Some(region), Some(account_id)) => {
      Some(lambda_invocation_uri(region, account_id, &lambda_name))
    }
    (None, _, _) => {
      warn!(
        "no integration URI for `{lambda_name}`: set `x-amazon-apigateway-integration.uri` in \
         the function template or declare the project's region and account_id"
      );
      None
    }
  };
  if let Some(uri) = integration_uri {
    operation.insert(
      API_GATEWAY_INTEGRATION_EXTENSION.to_string(),
      json!({ "uri": uri }),
    );
  }

  if let Some(parameters) = function.parameters() {
    operation.insert("parameters".to_string(), parameters.to_owned());
  }

  // The template is only ever read, so each operation gets its own copy of every default.
  let mut operation = Value::Object(operation);
  default_merge(&mut operation, template);
  operation
}

/// Wrap a rendered path table in a Swagger 2.0 document.
pub fn render_document(
  project: &ProjectConfig,
  paths: Paths,
  rendered_at: DateTime<Utc>,
) -> Value {
  json!({
    "swagger": "2.0",
    "info": {
      "version": rendered_at.to_rfc3339_opts(SecondsFormat::Millis, true),
      "title": project.name,
    },
    "basePath": project.gateway.base_path,
    "schemes": ["https"],
    "paths": paths,
    "securityDefinitions": {
      "api_key": {
        "type": "apiKey",
        "name": "x-api-key",
        "in": "header",
      },
    },
    "definitions": {
      "Empty": {
        "type": "object",
        "title": "Empty Schema",
      },
    },
  })
}
