#![warn(missing_docs)]

//! Create, publish and deploy Amazon API Gateway REST APIs for AWS Lambda projects.
//!
//! The `lambda-apigw` binary exposes two commands:
//!  * `create <name> [description] [clone_from]` creates a REST API and records its identifier in
//!    the project descriptor (`project.json`). Pass `--force` to create a new API even if the
//!    descriptor already references one.
//!  * `update` renders a Swagger 2.0 document from the project descriptor and the
//!    `functions/*/function.json` definitions (see the
//!    [`lambda-apigw-swagger`](lambda_apigw_swagger) crate), publishes it to the REST API,
//!    deploys it to the configured stage, and grants API Gateway permission to invoke each
//!    exposed Lambda function. Pass `--stdout` to write the document to `swagger.json` instead.
//!
//! Logging is configured through the `RUST_LOG` environment variable (default: `info`).

use crate::client::AwsGatewayClient;
use crate::commands::create::CreateArgs;
use crate::commands::update::UpdateArgs;
use crate::error::CommandError;

use clap::{Parser, Subcommand};
use lambda_apigw_swagger::{DEFAULT_FUNCTIONS_DIR, DEFAULT_PROJECT_PATH};

use std::path::PathBuf;

/// Remote API Gateway and Lambda operations.
pub mod client;
/// Command implementations.
pub mod commands;
/// Error handling.
pub mod error;

/// File written by `update --stdout`, relative to the current working directory.
pub const SWAGGER_FILENAME: &str = "swagger.json";

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "lambda-apigw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
  /// Path to the project descriptor.
  #[arg(long, short = 'c', global = true, default_value = DEFAULT_PROJECT_PATH)]
  pub config: PathBuf,

  /// Directory containing one subdirectory (with a `function.json`) per Lambda function.
  #[arg(long, global = true, default_value = DEFAULT_FUNCTIONS_DIR)]
  pub functions_dir: PathBuf,

  /// Subcommand to execute.
  #[command(subcommand)]
  pub command: Commands,
}

impl Cli {
  /// Local paths used by the selected command.
  pub fn context(&self) -> CommandContext {
    CommandContext {
      config_path: self.config.clone(),
      functions_dir: self.functions_dir.clone(),
      swagger_path: PathBuf::from(SWAGGER_FILENAME),
    }
  }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Create a REST API and save its identifier to the project descriptor.
  Create(CreateArgs),
  /// Publish and deploy the project's Swagger document.
  Update(UpdateArgs),
}

/// Local file locations shared by all commands.
#[derive(Clone, Debug)]
pub struct CommandContext {
  /// Project descriptor (`project.json`).
  pub config_path: PathBuf,
  /// Directory containing the function definitions.
  pub functions_dir: PathBuf,
  /// Output path for `update --stdout`.
  pub swagger_path: PathBuf,
}

/// Run the command selected on the command line against AWS.
pub async fn run(cli: Cli) -> Result<(), CommandError> {
  let context = cli.context();
  match cli.command {
    Commands::Create(args) => {
      commands::create::execute(&args, &context, AwsGatewayClient::from_env)
        .await
        .map(|_| ())
    }
    Commands::Update(args) => {
      commands::update::execute(&args, &context, AwsGatewayClient::from_env).await
    }
  }
}
