use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_apigateway::primitives::Blob;
use aws_sdk_apigateway::types::PutMode;
use log::debug;

/// Error returned by a remote call.
pub type RemoteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Principal that is granted permission to invoke the Lambda functions.
pub const API_GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";
const INVOKE_FUNCTION_ACTION: &str = "lambda:InvokeFunction";

/// Result of a successful call to
/// [`add_invoke_permission`](GatewayClient::add_invoke_permission).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantOutcome {
  /// A new permission statement was added to the function's resource policy.
  Granted,
  /// The function's resource policy already contains a statement with the same ID.
  AlreadyGranted,
}

/// Remote operations needed to create, publish and deploy a REST API.
///
/// This trait is intended to be used with the [`#[async_trait]`](async_trait::async_trait)
/// attribute.
#[async_trait]
pub trait GatewayClient: Send + Sync {
  /// Region the client sends requests to, if known.
  fn region(&self) -> Option<&str>;

  /// Create a new REST API and return its identifier.
  ///
  /// # Arguments
  ///
  /// * `name` - Name of the REST API.
  /// * `description` - Optional description of the REST API.
  /// * `clone_from` - Optional identifier of an existing REST API to copy.
  async fn create_rest_api(
    &self,
    name: &str,
    description: Option<&str>,
    clone_from: Option<&str>,
  ) -> Result<String, RemoteError>;

  /// Replace the definition of an existing REST API with the given Swagger document.
  async fn put_rest_api(&self, rest_api_id: &str, swagger_json: Vec<u8>)
    -> Result<(), RemoteError>;

  /// Deploy the current definition of a REST API to a stage, returning the deployment ID if the
  /// service reported one.
  async fn create_deployment(
    &self,
    rest_api_id: &str,
    stage_name: &str,
  ) -> Result<Option<String>, RemoteError>;

  /// Allow API Gateway to invoke a Lambda function for requests matching `source_arn`.
  async fn add_invoke_permission(
    &self,
    function_name: &str,
    source_arn: &str,
    statement_id: &str,
  ) -> Result<GrantOutcome, RemoteError>;
}

/// [`GatewayClient`] backed by the AWS SDK.
pub struct AwsGatewayClient {
  apigateway: aws_sdk_apigateway::Client,
  lambda: aws_sdk_lambda::Client,
  region: Option<String>,
}

impl AwsGatewayClient {
  /// Construct a client from an already-loaded AWS SDK configuration.
  pub fn new(sdk_config: &SdkConfig) -> Self {
    Self {
      apigateway: aws_sdk_apigateway::Client::new(sdk_config),
      lambda: aws_sdk_lambda::Client::new(sdk_config),
      region: sdk_config.region().map(|region| region.to_string()),
    }
  }

  /// Load the AWS SDK configuration from the environment (credentials, profile, etc.) and
  /// construct a client.
  ///
  /// # Arguments
  ///
  /// * `region` - Region to use instead of the one resolved by the default provider chain.
  pub async fn from_env(region: Option<String>) -> Self {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
      loader = loader.region(Region::new(region));
    }
    let sdk_config = loader.load().await;
    debug!("loaded AWS config for region {:?}", sdk_config.region());

    Self::new(&sdk_config)
  }
}

#[async_trait]
impl GatewayClient for AwsGatewayClient {
  fn region(&self) -> Option<&str> {
    self.region.as_deref()
  }

  async fn create_rest_api(
    &self,
    name: &str,
    description: Option<&str>,
    clone_from: Option<&str>,
  ) -> Result<String, RemoteError> {
    let output = self
      .apigateway
      .create_rest_api()
      .name(name)
      .set_description(description.map(str::to_owned))
      .set_clone_from(clone_from.map(str::to_owned))
      .send()
      .await?;

    output
      .id()
      .map(str::to_owned)
      .ok_or_else(|| "CreateRestApi response does not contain a REST API id".into())
  }

  async fn put_rest_api(
    &self,
    rest_api_id: &str,
    swagger_json: Vec<u8>,
  ) -> Result<(), RemoteError> {
    self
      .apigateway
      .put_rest_api()
      .rest_api_id(rest_api_id)
      .mode(PutMode::Overwrite)
      .body(Blob::new(swagger_json))
      .send()
      .await?;

    Ok(())
  }

  async fn create_deployment(
    &self,
    rest_api_id: &str,
    stage_name: &str,
  ) -> Result<Option<String>, RemoteError> {
    let output = self
      .apigateway
      .create_deployment()
      .rest_api_id(rest_api_id)
      .stage_name(stage_name)
      .send()
      .await?;

    Ok(output.id().map(str::to_owned))
  }

  async fn add_invoke_permission(
    &self,
    function_name: &str,
    source_arn: &str,
    statement_id: &str,
  ) -> Result<GrantOutcome, RemoteError> {
    let result = self
      .lambda
      .add_permission()
      .function_name(function_name)
      .statement_id(statement_id)
      .action(INVOKE_FUNCTION_ACTION)
      .principal(API_GATEWAY_PRINCIPAL)
      .source_arn(source_arn)
      .send()
      .await;

    match result {
      Ok(_) => Ok(GrantOutcome::Granted),
      Err(err)
        if err
          .as_service_error()
          .map(|service_err| service_err.is_resource_conflict_exception())
          .unwrap_or(false) =>
      {
        Ok(GrantOutcome::AlreadyGranted)
      }
      Err(err) => Err(err.into()),
    }
  }
}
