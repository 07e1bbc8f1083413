mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use ledremote_lib::error::ConfigError;
use ledremote_lib::error::ServerError;
use ledremote_lib::server::Server;
use ledremote_lib::server::ServerConfig;
use ledremote_lib::status::FileStore;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] logging::LoggingError),
    #[error("{0}")]
    Server(#[from] ServerError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    logging::init(|key| std::env::var(key).ok())?;

    let config = ServerConfig::from_lookup(|key| std::env::var(key).ok())?;
    log::debug!("{:?}", config);

    if let Err(e) = tokio::fs::create_dir_all(&config.status_dir).await {
        log::warn!(
            "Could not create status directory {}: {}",
            config.status_dir.display(),
            e
        );
    }

    let store = Arc::new(FileStore::new(&config.status_dir));
    let server = Server::bind(&config, store).await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received");
        }
        shutdown.cancel();
    });

    server.run_until_cancelled(cancel).await;
    Ok(())
}
