mod cli;
mod logging;

use crate::cli::Cli;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tvsync_catalog::ClientHandle;
use tvsync_catalog::client::SonarrClient;
use tvsync_config::{Config, LogConfig};
use tvsync_library::{ErrorCollector, Syncer};

/// Configuration was missing, unreadable or invalid.
const EXIT_CONFIG: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, file) = match load(&cli) {
        Ok(loaded) => loaded,
        Err(err) => {
            logging::init(&LogConfig::default());
            tracing::error!(error = ?err, "Cannot load configuration");
            return ExitCode::from(EXIT_CONFIG);
        },
    };
    logging::init(&config.log);
    match &file {
        Some(path) => tracing::debug!(path = %path.display(), "Loaded configuration file"),
        None => tracing::warn!("Configuration file not found, using defaults and environment"),
    }
    if let Err(err) = config.validate() {
        tracing::error!(error = ?err, "Invalid configuration");
        return ExitCode::from(EXIT_CONFIG);
    }

    let client: ClientHandle = match SonarrClient::new("sonarr", &config.sonarr.api_url, config.sonarr.api_key.clone()) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            tracing::error!(error = ?err, "Invalid Sonarr settings");
            return ExitCode::from(EXIT_CONFIG);
        },
    };
    let errors = Arc::new(ErrorCollector::default());
    let concurrency = NonZeroUsize::new(config.sync.concurrency).unwrap_or(NonZeroUsize::MIN);
    let syncer = Syncer::new(client, errors.clone()).with_concurrency(concurrency);

    let source = config.app.path.clone();
    let target = PathBuf::from(&config.sonarr.tv_path);
    let mut task = tokio::spawn(async move { syncer.run(&source, &target).await });

    tokio::select! {
        joined = &mut task => match joined {
            Ok(Ok(summary)) => {
                tracing::info!(
                    discovered = summary.discovered,
                    registered = summary.registered,
                    failed = summary.failed,
                    reported = errors.len(),
                    "Finished"
                );
                ExitCode::SUCCESS
            },
            Ok(Err(err)) => {
                tracing::error!(error = ?err, "Sync aborted");
                ExitCode::FAILURE
            },
            Err(err) => {
                tracing::error!(error = %err, "Sync task failed");
                ExitCode::FAILURE
            },
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(failed = errors.len(), "Interrupted");
            task.abort();
            ExitCode::FAILURE
        },
    }
}

fn load(cli: &Cli) -> tvsync_config::error::Result<(Config, Option<PathBuf>)> {
    let file = tvsync_config::discover(cli.config.as_deref())?;
    let figment = cli.merge_into(Config::figment(file.as_deref())?);
    Ok((Config::from_figment(&figment)?, file))
}
