use serde_json::Value;
use sha2::{Digest, Sha256};

/// Swagger vendor extension that tells API Gateway which backend handles an operation.
pub const API_GATEWAY_INTEGRATION_EXTENSION: &str = "x-amazon-apigateway-integration";

/// Placeholder in the template's integration URI that is replaced with the Lambda function name.
pub const FUNCTION_NAME_PLACEHOLDER: &str = "{{functionName}}";

/// Swagger vendor extension used as the operation key for a catch-all (`ANY`) method.
pub const ANY_METHOD_EXTENSION: &str = "x-amazon-apigateway-any-method";

// Lambda AddPermission statement IDs are limited to 100 characters.
const MAX_STATEMENT_ID_LEN: usize = 100;
// Hex digits of the route digest appended to each statement ID.
const ROUTE_DIGEST_LEN: usize = 16;

/// Name of the deployed Lambda function that backs `function_name` (e.g., `orders_createOrder`).
pub fn lambda_function_name(project_name: &str, function_name: &str) -> String {
  format!("{project_name}_{function_name}")
}

/// Replace every `{{functionName}}` placeholder in `template` with `lambda_function_name`.
pub fn substitute_function_name(template: &str, lambda_function_name: &str) -> String {
  template.replace(FUNCTION_NAME_PLACEHOLDER, lambda_function_name)
}

/// URI that API Gateway uses to invoke a Lambda function in the same region and account.
pub fn lambda_invocation_uri(region: &str, account_id: &str, lambda_function_name: &str) -> String {
  format!(
    "arn:aws:apigateway:{region}:lambda:path/2015-03-31/functions/arn:aws\
     :lambda:{region}:{account_id}:function:{lambda_function_name}/invocations",
  )
}

/// Key of the operation object for `method` within a Swagger path item.
///
/// Standard methods are lower-cased, and `ANY` maps to [`ANY_METHOD_EXTENSION`].
pub fn operation_key(method: &str) -> String {
  if is_any_method(method) {
    ANY_METHOD_EXTENSION.to_string()
  } else {
    method.to_lowercase()
  }
}

fn is_any_method(method: &str) -> bool {
  method.eq_ignore_ascii_case("any")
}

/// Integration URI configured in the `swagger-func-template`, if any.
pub(crate) fn template_integration_uri(template: &Value) -> Option<&str> {
  template
    .get(API_GATEWAY_INTEGRATION_EXTENSION)
    .and_then(|integration| integration.get("uri"))
    .and_then(Value::as_str)
}

/// ARN identifying calls from API Gateway to a single route, as used in the `SourceArn` condition
/// of a Lambda resource policy.
///
/// Path parameters (e.g., `{id}` or `{proxy+}`) are replaced with wildcards since the ARN matches
/// the concrete request path. An `ANY` method matches every HTTP method.
pub fn execute_api_source_arn(
  region: &str,
  account_id: &str,
  rest_api_id: &str,
  method: &str,
  path: &str,
) -> String {
  let resource_path = path
    .split('/')
    .map(|segment| {
      if segment.starts_with('{') && segment.ends_with('}') {
        "*"
      } else {
        segment
      }
    })
    .collect::<Vec<_>>()
    .join("/");
  let resource_path = if resource_path.starts_with('/') {
    resource_path
  } else {
    format!("/{resource_path}")
  };

  let method = if is_any_method(method) {
    "*".to_string()
  } else {
    method.to_uppercase()
  };

  format!("arn:aws:execute-api:{region}:{account_id}:{rest_api_id}/*/{method}{resource_path}")
}

/// Lambda permission statement ID granting API Gateway access to `function_name` for a single
/// route.
///
/// The ID ends with a digest of the method and path, so it is stable across runs for an unchanged
/// route and changes whenever the route does (Lambda rejects a reused ID as a conflict).
pub fn permission_statement_id(
  rest_api_id: &str,
  function_name: &str,
  method: &str,
  path: &str,
) -> String {
  let method = method.to_uppercase();
  let route_digest = hex::encode(Sha256::digest(format!("{method} {path}")));

  let prefix = format!("apigw-{rest_api_id}-{function_name}-{method}")
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
        c
      } else {
        '-'
      }
    })
    .take(MAX_STATEMENT_ID_LEN - ROUTE_DIGEST_LEN - 1)
    .collect::<String>();

  format!("{prefix}-{}", &route_digest[..ROUTE_DIGEST_LEN])
}
