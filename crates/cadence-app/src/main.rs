mod boot;
mod cli;
mod repl;

use std::process::ExitCode;
use std::sync::Arc;

use cadence_common::{CadenceError, SessionId};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: cli::Args) -> Result<(), CadenceError> {
    let config = boot::load_config(&args)?;

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("cadence={}", config.logging.level.as_filter()));
    init_logging(&directive);
    tracing::info!("Cadence v{} starting...", env!("CARGO_PKG_VERSION"));

    let client = boot::gemini_client(&config)?;
    let calendar = boot::calendar(&config).await?;
    let service = boot::chat_service(&config, Arc::new(client), calendar)?;

    let session = args
        .session
        .map(SessionId::from)
        .unwrap_or_default();
    tracing::info!(session = %session, "Session ready");

    let stdin = BufReader::new(tokio::io::stdin());
    repl::run(&service, &session, stdin, tokio::io::stdout()).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Logging may not be installed yet if config loading failed.
            eprintln!("cadence: {e}");
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
