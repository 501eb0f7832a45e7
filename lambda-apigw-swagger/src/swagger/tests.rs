use crate::config::{GatewayConfig, ProjectConfig};
use crate::error::RenderError;
use crate::function::{FunctionConfig, FunctionDefinition, FunctionRoute};
use crate::swagger::{render_paths, render_swagger};

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn mock_project(func_template: Value, paths: Value) -> ProjectConfig {
  ProjectConfig {
    name: "orders".to_string(),
    description: None,
    region: None,
    account_id: None,
    gateway: GatewayConfig {
      rest_api_id: Some("abc123".to_string()),
      base_path: "/v1".to_string(),
      stage_name: "prod".to_string(),
      paths: serde_json::from_value::<IndexMap<String, Value>>(paths).unwrap(),
      func_template,
    },
  }
}

fn function(
  name: &str,
  description: Option<&str>,
  route: Option<(&str, &str)>,
) -> FunctionDefinition {
  FunctionDefinition::new(
    name,
    FunctionConfig {
      description: description.map(str::to_string),
      route: route.map(|(path, method)| FunctionRoute {
        path: Some(path.to_string()),
        method: Some(method.to_string()),
        parameters: None,
      }),
    },
  )
}

fn frozen_clock() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
}

fn integration_template() -> Value {
  json!({
    "consumes": ["application/json"],
    "produces": ["application/json"],
    "responses": { "200": { "description": "OK", "schema": { "$ref": "#/definitions/Empty" } } },
    "x-amazon-apigateway-integration": {
      "uri": "arn:aws:apigateway:us-east-1:lambda:path/2015-03-31/functions/arn:aws:lambda:us-east-1:1234567890:function:{{functionName}}/invocations",
      "httpMethod": "POST",
      "type": "aws_proxy"
    }
  })
}

#[test]
fn test_render_single_function() {
  let project = mock_project(integration_template(), json!({}));
  let functions = vec![function(
    "createOrder",
    Some("Create order"),
    Some(("/orders", "POST")),
  )];

  let document = render_swagger(&project, &functions, frozen_clock()).unwrap();

  assert_eq!(
    document,
    json!({
      "swagger": "2.0",
      "info": { "version": "2024-03-01T12:30:00.000Z", "title": "orders" },
      "basePath": "/v1",
      "schemes": ["https"],
      "paths": {
        "/orders": {
          "post": {
            "description": "Create order",
            "x-amazon-apigateway-integration": {
              "uri": "arn:aws:apigateway:us-east-1:lambda:path/2015-03-31/functions/arn:aws:lambda:us-east-1:1234567890:function:orders_createOrder/invocations",
              "httpMethod": "POST",
              "type": "aws_proxy"
            },
            "consumes": ["application/json"],
            "produces": ["application/json"],
            "responses": {
              "200": { "description": "OK", "schema": { "$ref": "#/definitions/Empty" } }
            }
          }
        }
      },
      "securityDefinitions": {
        "api_key": { "type": "apiKey", "name": "x-api-key", "in": "header" }
      },
      "definitions": { "Empty": { "type": "object", "title": "Empty Schema" } }
    })
  );
}

#[test]
fn test_render_is_deterministic_with_frozen_clock() {
  let project = mock_project(
    integration_template(),
    json!({ "/orders.*": { "options": { "summary": "CORS" } } }),
  );
  let functions = vec![
    function("listOrders", None, Some(("/orders", "get"))),
    function("getOrder", Some("Get order"), Some(("/orders/{id}", "get"))),
  ];

  let first = serde_json::to_string(&render_swagger(&project, &functions, frozen_clock()).unwrap())
    .unwrap();
  let second =
    serde_json::to_string(&render_swagger(&project, &functions, frozen_clock()).unwrap()).unwrap();
  assert_eq!(first, second);
  assert!(!first.contains('\n'));
}

#[test]
fn test_unexposed_functions_are_skipped() {
  let project = mock_project(integration_template(), json!({}));
  let mut path_only = function("pathOnly", None, None);
  path_only.config.route = Some(FunctionRoute {
    path: Some("/path-only".to_string()),
    ..Default::default()
  });
  let mut method_only = function("methodOnly", None, None);
  method_only.config.route = Some(FunctionRoute {
    method: Some("get".to_string()),
    ..Default::default()
  });
  let functions = vec![
    path_only,
    method_only,
    function("worker", Some("Background worker"), None),
    function("listOrders", None, Some(("/orders", "get"))),
  ];

  let paths = render_paths(&project, &functions).unwrap();
  assert_eq!(paths.keys().collect::<Vec<_>>(), vec!["/orders"]);
  assert_eq!(
    paths["/orders"].keys().collect::<Vec<_>>(),
    vec!["get"]
  );
}

#[test]
fn test_same_route_last_function_wins() {
  let project = mock_project(
    json!({
      "description": "template description",
      "summary": "template summary",
      "x-amazon-apigateway-integration": { "uri": "arn:{{functionName}}", "type": "aws_proxy" }
    }),
    json!({}),
  );
  let mut second = function("second", None, Some(("/orders", "get")));
  second.config.route.as_mut().unwrap().parameters =
    Some(json!([{ "name": "limit", "in": "query" }]));
  let functions = vec![
    function("first", Some("first description"), Some(("/orders", "get"))),
    second,
  ];

  let paths = render_paths(&project, &functions).unwrap();
  assert_eq!(
    Value::Object(paths["/orders"]["get"].as_object().unwrap().to_owned()),
    json!({
      "x-amazon-apigateway-integration": { "uri": "arn:orders_second", "type": "aws_proxy" },
      "parameters": [{ "name": "limit", "in": "query" }],
      "description": "template description",
      "summary": "template summary"
    })
  );
}

#[test]
fn test_path_pattern_overrides_are_low_precedence_defaults() {
  let project = mock_project(
    json!({ "x-amazon-apigateway-integration": { "uri": "arn:{{functionName}}" } }),
    json!({
      "/orders.*": {
        "get": {
          "description": "pattern description",
          "security": [{ "api_key": [] }],
          "x-amazon-apigateway-integration": {
            "uri": "arn:pattern",
            "passthroughBehavior": "when_no_match"
          }
        },
        "options": { "summary": "CORS preflight" }
      },
      "/health": { "get": { "security": [] } }
    }),
  );
  let functions = vec![
    function("listOrders", Some("List orders"), Some(("/orders", "get"))),
    function("getOrder", None, Some(("/orders/{id}", "get"))),
    function("listCustomers", None, Some(("/customers/orders", "get"))),
  ];

  let paths = render_paths(&project, &functions).unwrap();

  assert_eq!(
    Value::Object(paths["/orders"].to_owned()),
    json!({
      "get": {
        "description": "List orders",
        "x-amazon-apigateway-integration": {
          "uri": "arn:orders_listOrders",
          "passthroughBehavior": "when_no_match"
        },
        "security": [{ "api_key": [] }]
      },
      "options": { "summary": "CORS preflight" }
    })
  );
  assert_eq!(
    Value::Object(paths["/orders/{id}"].to_owned()),
    json!({
      "get": {
        "x-amazon-apigateway-integration": {
          "uri": "arn:orders_getOrder",
          "passthroughBehavior": "when_no_match"
        },
        "description": "pattern description",
        "security": [{ "api_key": [] }]
      },
      "options": { "summary": "CORS preflight" }
    })
  );
  // The pattern is anchored, so it must match the whole path.
  assert_eq!(
    Value::Object(paths["/customers/orders"].to_owned()),
    json!({ "get": { "x-amazon-apigateway-integration": { "uri": "arn:orders_listCustomers" } } })
  );
  // Patterns never introduce new paths.
  assert!(!paths.contains_key("/health"));
}

#[test]
fn test_template_is_not_shared_between_functions() {
  let project = mock_project(
    json!({
      "responses": { "200": { "description": "OK" } },
      "x-amazon-apigateway-integration": { "uri": "arn:{{functionName}}" }
    }),
    json!({ "/a": { "get": { "responses": { "404": { "description": "Not found" } } } } }),
  );
  let functions = vec![
    function("a", None, Some(("/a", "get"))),
    function("b", None, Some(("/b", "get"))),
  ];

  let paths = render_paths(&project, &functions).unwrap();
  assert_eq!(
    paths["/a"]["get"]["responses"],
    json!({ "200": { "description": "OK" }, "404": { "description": "Not found" } })
  );
  assert_eq!(
    paths["/b"]["get"]["responses"],
    json!({ "200": { "description": "OK" } })
  );
  assert_eq!(
    project.gateway.func_template["x-amazon-apigateway-integration"]["uri"],
    "arn:{{functionName}}"
  );
}

#[test]
fn test_integration_uri_from_region_and_account() {
  let mut project = mock_project(json!({ "produces": ["application/json"] }), json!({}));
  project.region = Some("eu-west-1".to_string());
  project.account_id = Some("1234567890".to_string());
  let functions = vec![function("createOrder", None, Some(("/orders", "post")))];

  let paths = render_paths(&project, &functions).unwrap();
  assert_eq!(
    paths["/orders"]["post"]["x-amazon-apigateway-integration"]["uri"],
    "arn:aws:apigateway:eu-west-1:lambda:path/2015-03-31/functions/arn:aws:lambda:eu-west-1\
     :1234567890:function:orders_createOrder/invocations"
  );
}

#[test]
fn test_invalid_path_pattern() {
  let project = mock_project(integration_template(), json!({ "/orders(": {} }));
  let functions = vec![function("listOrders", None, Some(("/orders", "get")))];

  let err = render_paths(&project, &functions).unwrap_err();
  let RenderError::InvalidPathPattern { pattern, .. } = err;
  assert_eq!(pattern, "/orders(");
}
