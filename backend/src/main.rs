//! Backend entry-point: loads settings, prepares storage, reconciles the
//! administrator account and serves the REST API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use leopay::inbound::http::health::{HealthState, ServiceInfo};
use leopay::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use leopay::settings::{AppSettings, Environment};

use server::{ServerConfig, build_http_state, create_server, drain_on};

fn init_tracing(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = if environment.is_production() {
        fmt().with_env_filter(filter).json().try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                warn!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

async fn connect(database: PoolConfig) -> io::Result<DbPool> {
    run_migrations(database.database_url().to_owned())
        .await
        .map_err(|e| io::Error::other(format!("database migrations failed: {e}")))?;
    DbPool::new(database)
        .await
        .map_err(|e| io::Error::other(format!("create database pool: {e}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = AppSettings::load_from_args(std::env::args_os()).map_err(io::Error::other)?;
    let runtime = settings.validate().map_err(io::Error::other)?;
    init_tracing(runtime.environment);

    let mut config = ServerConfig::new(&runtime);
    if let Some(database) = runtime.database {
        config = config.with_db_pool(connect(database).await?);
    }

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let http_state = build_http_state(&config, clock.clone())
        .await
        .map_err(|e| io::Error::other(format!("administrator bootstrap failed: {e}")))?;
    let service_info = ServiceInfo::new(config.environment.as_str(), clock);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, service_info, &config)?;
    drain_on(server.handle(), health_state, shutdown_signal());
    info!(
        bind_addr = %config.bind_addr,
        environment = %config.environment,
        "server listening"
    );
    server.await
}
