// # listsyncd - listsync Daemon
//
// Thin integration layer only: reads configuration from environment
// variables, wires the remote client and the local store into the engine,
// and serves the HTTP surface. All synchronization logic lives in
// listsync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `LISTSYNC_API_KEY`: MailChimp API key (required)
// - `LISTSYNC_BASE_URL`: remote API base URL override (optional; the
//   endpoint is otherwise derived from the key's datacenter suffix)
// - `LISTSYNC_BIND_ADDR`: socket address to serve on (default 127.0.0.1:8000)
// - `LISTSYNC_LOG_LEVEL`: trace|debug|info|warn|error (default info)
//
// ## Example
//
// ```bash
// export LISTSYNC_API_KEY=0123456789abcdef0123456789abcdef-us6
// export LISTSYNC_BIND_ADDR=0.0.0.0:8000
//
// listsyncd
// ```

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use listsync_core::config::{HttpConfig, RemoteApiConfig, SyncConfig};
use listsync_core::{MemoryStore, SyncEngine};
use listsync_remote_mailchimp::MailchimpClient;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Load configuration from environment variables
fn config_from_env() -> Result<SyncConfig> {
    let api_key = env::var("LISTSYNC_API_KEY").context(
        "LISTSYNC_API_KEY is required. Set it via: export LISTSYNC_API_KEY=your_key",
    )?;

    let config = SyncConfig {
        remote: RemoteApiConfig {
            api_key,
            base_url: env::var("LISTSYNC_BASE_URL").ok(),
        },
        http: HttpConfig {
            bind_addr: env::var("LISTSYNC_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
        },
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn log_level_from_env() -> Result<Level> {
    let level = env::var("LISTSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => anyhow::bail!(
            "LISTSYNC_LOG_LEVEL '{other}' is not valid. \
            Valid levels: trace, debug, info, warn, error"
        ),
    }
}

async fn run(config: SyncConfig) -> Result<()> {
    let remote = MailchimpClient::from_config(&config.remote)?;
    let store = MemoryStore::new();
    let engine = Arc::new(SyncEngine::new(Box::new(store), Box::new(remote)));

    let app = listsyncd::api::router(engine);

    let listener = tokio::net::TcpListener::bind(&config.http.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http.bind_addr))?;
    info!("listening on http://{}", config.http.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let level = match log_level_from_env() {
        Ok(level) => level,
        Err(err) => {
            eprintln!("{err}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("failed to install tracing subscriber");
        return DaemonExitCode::ConfigError.into();
    }

    let config = match config_from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err:#}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    match run(config).await {
        Ok(()) => DaemonExitCode::CleanShutdown.into(),
        Err(err) => {
            error!("runtime error: {err:#}");
            DaemonExitCode::RuntimeError.into()
        }
    }
}
