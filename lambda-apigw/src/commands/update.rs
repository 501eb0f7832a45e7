//! `update` command: render the Swagger document, publish it, deploy it, and grant API Gateway
//! permission to invoke each exposed function.

use crate::client::{GatewayClient, GrantOutcome};
use crate::error::{format_error, CommandError};
use crate::CommandContext;

use backtrace::Backtrace as _Backtrace;
use chrono::Utc;
use clap::Args;
use futures::future::join_all;
use lambda_apigw_swagger::integration::{
  execute_api_source_arn, lambda_function_name, permission_statement_id,
};
use lambda_apigw_swagger::{render_swagger, scan_functions, FunctionDefinition, ProjectConfig};
use log::{error, info};

use std::future::Future;

/// Arguments for the `update` command.
#[derive(Debug, Args)]
pub struct UpdateArgs {
  /// Write the Swagger document to `swagger.json` instead of publishing it.
  #[arg(long)]
  pub stdout: bool,
}

/// Render the project's Swagger document and either write it locally or publish and deploy it.
///
/// Local failures (missing descriptor, missing REST API id, unreadable functions directory,
/// invalid path pattern) abort before any remote call. A failed publish prevents the deployment,
/// and a failed deployment prevents the permission grants. Grants are independent of one
/// another: every grant is attempted, and any failures are reported together afterward.
pub async fn execute<C, F, Fut>(
  args: &UpdateArgs,
  context: &CommandContext,
  connect: F,
) -> Result<(), CommandError>
where
  C: GatewayClient,
  F: FnOnce(Option<String>) -> Fut,
  Fut: Future<Output = C>,
{
  let project = ProjectConfig::load(&context.config_path)?;
  let rest_api_id = project
    .gateway
    .rest_api_id
    .as_deref()
    .ok_or_else(|| CommandError::MissingRestApiId(context.config_path.clone(), _Backtrace::new()))?;

  let functions = scan_functions(&context.functions_dir)?;
  let swagger = render_swagger(&project, &functions, Utc::now())?;
  let swagger_json = serde_json::to_vec(&swagger)
    .map_err(|err| CommandError::SerializeSwagger(Box::new(err), _Backtrace::new()))?;

  if args.stdout {
    std::fs::write(&context.swagger_path, &swagger_json).map_err(|err| {
      CommandError::WriteSwagger {
        path: context.swagger_path.clone(),
        source: Box::new(err),
        backtrace: _Backtrace::new(),
      }
    })?;
    info!(
      "wrote Swagger document to {}",
      context.swagger_path.display()
    );
    return Ok(());
  }

  let account_id = project
    .account_id
    .as_deref()
    .ok_or_else(|| CommandError::MissingAccountId(context.config_path.clone(), _Backtrace::new()))?;

  let client = connect(project.region.clone()).await;
  let region = project
    .region
    .as_deref()
    .or_else(|| client.region())
    .ok_or_else(|| CommandError::MissingRegion(_Backtrace::new()))?;

  client
    .put_rest_api(rest_api_id, swagger_json)
    .await
    .map_err(|source| CommandError::Remote {
      operation: "PutRestApi",
      source,
      backtrace: _Backtrace::new(),
    })?;
  info!("specification updated for REST API {rest_api_id}");

  let stage_name = &project.gateway.stage_name;
  let deployment_id = client
    .create_deployment(rest_api_id, stage_name)
    .await
    .map_err(|source| CommandError::Remote {
      operation: "CreateDeployment",
      source,
      backtrace: _Backtrace::new(),
    })?;
  info!(
    "deployment to stage `{stage_name}` succeeded (deployment id: {})",
    deployment_id.as_deref().unwrap_or("unknown")
  );

  grant_invoke_permissions(
    &client,
    &project,
    &functions,
    &PermissionScope {
      region,
      account_id,
      rest_api_id,
    },
  )
  .await
}

struct PermissionScope<'a> {
  region: &'a str,
  account_id: &'a str,
  rest_api_id: &'a str,
}

async fn grant_invoke_permissions<C>(
  client: &C,
  project: &ProjectConfig,
  functions: &[FunctionDefinition],
  scope: &PermissionScope<'_>,
) -> Result<(), CommandError>
where
  C: GatewayClient,
{
  let grants = functions.iter().filter_map(|function| {
    let (path, method) = function.route()?;
    let lambda_name = lambda_function_name(&project.name, &function.name);
    let source_arn =
      execute_api_source_arn(scope.region, scope.account_id, scope.rest_api_id, method, path);
    let statement_id = permission_statement_id(scope.rest_api_id, &lambda_name, method, path);

    Some(async move {
      match client
        .add_invoke_permission(&lambda_name, &source_arn, &statement_id)
        .await
      {
        Ok(GrantOutcome::Granted) => {
          info!("permission granted to {lambda_name} for {source_arn}");
          Ok(())
        }
        Ok(GrantOutcome::AlreadyGranted) => {
          info!("permission already granted to {lambda_name} ({statement_id})");
          Ok(())
        }
        Err(err) => {
          error!(
            "failed to grant permission to {lambda_name}: {}",
            format_error(&*err, None, None)
          );
          Err(lambda_name)
        }
      }
    })
  });

  let failed = join_all(grants)
    .await
    .into_iter()
    .filter_map(Result::err)
    .collect::<Vec<_>>();

  if failed.is_empty() {
    Ok(())
  } else {
    Err(CommandError::PermissionGrants {
      failed,
      backtrace: _Backtrace::new(),
    })
  }
}
