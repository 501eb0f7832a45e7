#![warn(missing_docs)]

//! Swagger 2.0 renderer for Amazon API Gateway REST APIs backed by AWS Lambda functions.
//!
//! A project is described by a `project.json` descriptor (see [`ProjectConfig`]) and a
//! `functions/` directory containing one `function.json` per Lambda function (see
//! [`scan_functions`]). Every function that declares a request path and HTTP method becomes an
//! operation in the rendered Swagger document, with defaults filled in from the project's
//! `swagger-func-template` and from any path-pattern overrides (see [`render_paths`]).
//!
//! This crate performs no network I/O. The `lambda-apigw` crate publishes the rendered document
//! to API Gateway.
//!
//! # Example
//!
//! ```rust,no_run
//! use lambda_apigw_swagger::{render_swagger, scan_functions, ProjectConfig};
//!
//! let project = ProjectConfig::load("project.json").unwrap();
//! let functions = scan_functions("functions").unwrap();
//! let swagger = render_swagger(&project, &functions, chrono::Utc::now()).unwrap();
//! println!("{}", serde_json::to_string(&swagger).unwrap());
//! ```

mod config;
/// Error handling.
pub mod error;
mod function;
/// API Gateway integration and Lambda permission naming helpers.
pub mod integration;
mod merge;
mod swagger;

pub use config::{GatewayConfig, ProjectConfig, DEFAULT_PROJECT_PATH, GATEWAY_KEY};
pub use error::{ConfigError, RenderError};
pub use function::{
  scan_functions, FunctionConfig, FunctionDefinition, FunctionRoute, DEFAULT_FUNCTIONS_DIR,
};
pub use merge::{default_merge, default_merge_object};
pub use swagger::{render_document, render_paths, render_swagger, Paths};
