//! `create` command: create a REST API and record its identifier in the project descriptor.

use crate::client::GatewayClient;
use crate::error::CommandError;
use crate::CommandContext;

use backtrace::Backtrace as _Backtrace;
use clap::Args;
use lambda_apigw_swagger::ProjectConfig;
use log::{info, warn};

use std::future::Future;

/// Arguments for the `create` command.
#[derive(Debug, Args)]
pub struct CreateArgs {
  /// Name of the REST API.
  pub name: String,
  /// Description of the REST API.
  pub description: Option<String>,
  /// Identifier of an existing REST API to clone.
  pub clone_from: Option<String>,
  /// Create a new REST API even if the project already references one.
  #[arg(long, short = 'f')]
  pub force: bool,
}

/// Create a REST API and persist its identifier to the project descriptor.
///
/// `connect` is invoked with the project's region (if any) to construct the client, and only once
/// the local checks have passed. Returns the new REST API identifier.
pub async fn execute<C, F, Fut>(
  args: &CreateArgs,
  context: &CommandContext,
  connect: F,
) -> Result<String, CommandError>
where
  C: GatewayClient,
  F: FnOnce(Option<String>) -> Fut,
  Fut: Future<Output = C>,
{
  let project = ProjectConfig::load(&context.config_path)?;

  if let Some(rest_api_id) = &project.gateway.rest_api_id {
    if !args.force {
      return Err(CommandError::RestApiExists {
        rest_api_id: rest_api_id.to_owned(),
        backtrace: _Backtrace::new(),
      });
    }
    warn!("replacing reference to existing REST API `{rest_api_id}`");
  }

  let client = connect(project.region.clone()).await;
  let rest_api_id = client
    .create_rest_api(
      &args.name,
      args.description.as_deref(),
      args.clone_from.as_deref(),
    )
    .await
    .map_err(|source| CommandError::Remote {
      operation: "CreateRestApi",
      source,
      backtrace: _Backtrace::new(),
    })?;
  info!("API `{}` created with id {rest_api_id}", args.name);

  ProjectConfig::save_rest_api_id(&context.config_path, &rest_api_id)?;
  info!(
    "saved REST API id to {}",
    context.config_path.display()
  );

  Ok(rest_api_id)
}
