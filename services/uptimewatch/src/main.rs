//! uptimewatch CLI
//!
//! Command-line interface for the status poller.

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Level;

use uptimewatch::locale::Catalog;
use uptimewatch::{load_config, Config};

#[derive(Parser)]
#[command(name = "uptimewatch")]
#[command(about = "Client-side status poller with local uptime reconciliation")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Status endpoint base URL (overrides config file)
    #[arg(long)]
    url: Option<String>,

    /// Display language (overrides config file)
    #[arg(long)]
    language: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = clap::value_parser!(Level))]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut config = if let Some(path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", path);
        load_config(path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(language) = args.language {
        config.language = language;
    }

    let catalog = match &config.translations {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default(),
    };
    let (label_tx, label_rx) = watch::channel(catalog.pack(&config.language).days);

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    #[cfg(unix)]
    spawn_language_reload(args.config.clone(), label_tx);
    #[cfg(not(unix))]
    let _keep_labels_open = label_tx;

    tracing::info!("Watching {}", config.status_url());
    uptimewatch::run(config, cancel, label_rx).await?;
    Ok(())
}

/// Re-read the config on SIGHUP so the displayed labels can switch language
/// without restarting the process
#[cfg(unix)]
fn spawn_language_reload(config_path: Option<PathBuf>, label_tx: watch::Sender<String>) {
    tokio::spawn(async move {
        let mut hangup =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!("Not listening for SIGHUP: {}", e);
                    return;
                }
            };
        while hangup.recv().await.is_some() {
            match reload_days_label(config_path.as_ref()) {
                Some(label) => {
                    if label_tx.send(label).is_err() {
                        break;
                    }
                }
                None => tracing::warn!("SIGHUP received but no reloadable config"),
            }
        }
    });
}

#[cfg(unix)]
fn reload_days_label(config_path: Option<&PathBuf>) -> Option<String> {
    let path = config_path?;
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Config reload failed: {}", e);
            return None;
        }
    };
    let catalog = match &config.translations {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Translations reload failed: {}", e);
                return None;
            }
        },
        None => Catalog::default(),
    };
    Some(catalog.pack(&config.language).days)
}
