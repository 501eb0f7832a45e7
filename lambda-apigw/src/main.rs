use clap::Parser;
use env_logger::Env;
use lambda_apigw::error::format_error;
use lambda_apigw::Cli;
use log::{error, log_enabled, Level};

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
  env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));

  let cli = Cli::parse();
  match lambda_apigw::run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      // Stack traces are only useful when debugging the tool itself.
      let backtrace = if log_enabled!(Level::Debug) {
        err.backtrace()
      } else {
        None
      };
      error!("{}", format_error(&err, Some(err.name()), backtrace));
      ExitCode::FAILURE
    }
  }
}
