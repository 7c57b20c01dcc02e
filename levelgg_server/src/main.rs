//! LevelGG tournament server.
//!
//! Serves the registration, captaincy and draft API over HTTP, backed by
//! PostgreSQL or, with `--memory`, by an empty in-process store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use levelgg::{
    auth::AuthManager,
    db::{Database, MemoryRepository, PgRepository, Repository},
};
use levelgg_server::{api, config::ServerConfig, logging, metrics};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run the LevelGG tournament server

USAGE:
  levelgg_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url        URL      Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/levelgg]
  --metrics-bind  IP:PORT  Prometheus scrape address   [default: env METRICS_BIND, disabled when unset]

FLAGS:
  --memory                 Use an empty in-memory store instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Pool size                    [default: 20]
  JWT_SECRET               Identity provider token secret (required, 32+ chars)
  JWT_TOKEN_TTL_SECS       Lifetime of tokens issued by this server [default: 3600]
  METRICS_BIND             Prometheus scrape address
  RUST_LOG                 Log filter                   [default: info,sqlx=warn,hyper=warn]
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    metrics_bind: Option<SocketAddr>,
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        metrics_bind: pargs.opt_value_from_str("--metrics-bind")?,
        memory: pargs.contains("--memory"),
    };

    let config = ServerConfig::from_env(args.bind, args.database_url, args.metrics_bind)?;
    config.validate()?;

    logging::init();
    info!("Starting LevelGG server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exposed at http://{addr}/metrics");
    }

    let repo: Arc<dyn Repository> = if args.memory {
        info!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryRepository::new())
    } else {
        info!("Connecting to database: {}", config.database.redacted_url());
        let db = Database::new(&config.database)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
        db.migrate()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to apply migrations: {}", e))?;
        info!("Database connected and migrated");
        Arc::new(PgRepository::new(Arc::new(db.pool().clone())))
    };

    let auth_manager = Arc::new(
        AuthManager::new(config.security.jwt_secret.clone()).with_token_duration(
            chrono::Duration::seconds(config.security.token_ttl_secs),
        ),
    );

    let app = api::create_router(api::AppState::new(repo, auth_manager));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for CTRL+C: {e}");
        std::future::pending::<()>().await;
    }
}
