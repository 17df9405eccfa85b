use std::process::ExitCode;

use barbershop_frontend::{
    api::ApiError,
    cli::{self, Cli, LOGIN_HINT},
};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ApiError>() {
                Some(ApiError::Unauthorized) => eprintln!("{LOGIN_HINT}"),
                Some(api_err) => {
                    log::debug!("{} ({})", api_err, api_err.code());
                    eprintln!("Error: {}", api_err.user_message());
                }
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
