//! postboard API server.
//!
//! Loads configuration, connects to MySQL, wires the token, account and
//! post services into the router and serves until SIGINT/SIGTERM. In-flight
//! requests are allowed to finish before the process exits.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use postboard::account::{AccountService, MySqlAccountStore};
use postboard::auth::{PasswordHasher, TokenService};
use postboard::config::{app::AppConfig, db::create_pool};
use postboard::db::{mysql_adapter::MySqlDb, port::Db};
use postboard::post::{MySqlPostStore, PostService};
use postboard::time::system_clock::SystemClock;
use postboard::web::{build_router, health::DbReadiness, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env().context("load configuration")?;
    info!(config = %cfg.redacted(), "starting postboard-api");

    let pool = create_pool(&cfg.db)?;
    let db: Arc<dyn Db> = Arc::new(MySqlDb::new(pool));

    let clock = Arc::new(SystemClock);
    let tokens = Arc::new(TokenService::new(&cfg.auth, clock.clone()));
    let accounts = AccountService::new(
        Arc::new(MySqlAccountStore::new(db.clone())),
        PasswordHasher::new(cfg.auth.hash_cost),
    );
    let posts = PostService::new(Arc::new(MySqlPostStore::new(db.clone(), clock)));
    let state = AppState {
        tokens,
        accounts,
        posts,
        readiness: Arc::new(DbReadiness::new(db)),
    };

    let app = build_router(state, &cfg.http, &cfg.cors);

    let addr = cfg.http.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
