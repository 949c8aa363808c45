// # usyncd - User Sync Daemon
//
// Thin integration layer for the usync system. The daemon is
// responsible for:
//
// 1. Reading configuration from environment variables
// 2. Initializing the runtime and tracing
// 3. Wiring collaborators (remote source, store, notifier) to the engine
// 4. Serving the HTTP trigger and read endpoints
//
// All reconciliation logic lives in usync-core. The daemon makes no
// decisions about records; it only wires and serves.
//
// ## Example
//
// ```bash
// export USYNC_REMOTE_URL=https://jsonplaceholder.typicode.com
// export USYNC_STORE_TYPE=sqlite
// export USYNC_STORE_PATH=/var/lib/usync/users.db
// export USYNC_NOTIFIER_TYPE=log
//
// usyncd
// ```

mod config;
mod error;
mod routes;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use usync_core::traits::{RemoteSource, SyncNotifier, UserStore};
use usync_core::{EngineConfig, NotifierConfig, StoreConfig, SyncEngine};

use config::Config;
use routes::{AppState, app_router};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum UsyncExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<UsyncExitCode> for ExitCode {
    fn from(code: UsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return UsyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e}");
        return UsyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return UsyncExitCode::ConfigError.into();
    }

    info!("Starting usyncd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return UsyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {e}");
            UsyncExitCode::RuntimeError
        } else {
            UsyncExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let remote = build_remote(&config)?;
    let store = build_store(&config)?;
    let notifier = build_notifier(&config)?;

    info!(
        remote = remote.source_name(),
        notifier = notifier.notifier_name(),
        store_type = %config.store_type,
        "collaborators wired"
    );

    let (engine, mut events) = SyncEngine::new(remote, store, notifier, EngineConfig::default());

    // Drain engine events into the log.
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(?event, "engine event");
        }
    });

    let state = AppState {
        engine: Arc::new(engine),
    };
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("usyncd listening on {}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down daemon");
    Ok(())
}

fn build_remote(config: &Config) -> Result<Arc<dyn RemoteSource>> {
    #[cfg(feature = "http-remote")]
    {
        let source = usync_remote_http::HttpRemoteSource::from_config(&config.remote_config())?;
        Ok(Arc::new(source))
    }

    #[cfg(not(feature = "http-remote"))]
    {
        let _ = config;
        anyhow::bail!("usyncd was built without the http-remote feature")
    }
}

fn build_store(config: &Config) -> Result<Arc<dyn UserStore>> {
    match config.store_config() {
        StoreConfig::Sqlite { path } => {
            #[cfg(feature = "sqlite")]
            {
                let store = usync_store_sqlite::SqliteUserStore::open(&path)?;
                Ok(Arc::new(store))
            }

            #[cfg(not(feature = "sqlite"))]
            {
                let _ = path;
                anyhow::bail!("usyncd was built without the sqlite feature")
            }
        }
        StoreConfig::Memory => Ok(Arc::new(usync_core::MemoryUserStore::new())),
    }
}

fn build_notifier(config: &Config) -> Result<Arc<dyn SyncNotifier>> {
    match config.notifier_config() {
        notifier_config @ NotifierConfig::Smtp { .. } => {
            #[cfg(feature = "smtp")]
            {
                let notifier = usync_notify_smtp::SmtpNotifier::from_config(&notifier_config)?;
                Ok(Arc::new(notifier))
            }

            #[cfg(not(feature = "smtp"))]
            {
                let _ = notifier_config;
                anyhow::bail!("usyncd was built without the smtp feature")
            }
        }
        NotifierConfig::Log => Ok(Arc::new(usync_core::LogNotifier::new())),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to setup SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to setup SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigint.recv() => info!("Received SIGINT"),
    }
}

/// Wait for CTRL-C (fallback for non-Unix platforms)
#[cfg(not(unix))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to wait for CTRL-C: {e}");
    }
}
