//! Vidhub API server binary.
//!
//! Reads configuration from flags or the environment (a `.env` file is
//! honoured), runs migrations and serves the REST API.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use vidhub_api::config::ApiConfig;
use vidhub_core::auth::jwt::{TokenConfig, parse_ttl};
use vidhub_core::store::{IdentityStore, MemoryIdentityStore, PgIdentityStore};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "vidhub_api_server", about = "Vidhub API server")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/vidhub"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep identities in process memory instead of PostgreSQL (development only).
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Secret used to sign access tokens.
    #[arg(long, env = "ACCESS_TOKEN_SECRET", hide_env_values = true)]
    access_token_secret: String,

    /// Access token lifetime, e.g. `15m`, `1h`, `1d`.
    #[arg(long, env = "ACCESS_TOKEN_EXPIRY", default_value = "15m")]
    access_token_expiry: String,

    /// Secret used to sign refresh tokens.
    #[arg(long, env = "REFRESH_TOKEN_SECRET", hide_env_values = true)]
    refresh_token_secret: String,

    /// Refresh token lifetime, e.g. `10d`.
    #[arg(long, env = "REFRESH_TOKEN_EXPIRY", default_value = "10d")]
    refresh_token_expiry: String,

    /// Browser origin allowed to send credentialed requests.
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origin: Option<String>,

    /// Mark auth cookies `Secure`.
    #[arg(long, env = "COOKIE_SECURE", default_value_t = true, action = clap::ArgAction::Set)]
    cookie_secure: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vidhub_api=debug,vidhub_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    // Misconfigured token signing is fatal at startup, never per request.
    let tokens = TokenConfig::new(
        args.access_token_secret,
        args.refresh_token_secret,
        parse_ttl(&args.access_token_expiry)?,
        parse_ttl(&args.refresh_token_expiry)?,
    )?;

    let store: Arc<dyn IdentityStore> = if args.in_memory {
        warn!("using in-memory identity store; data is lost on exit");
        Arc::new(MemoryIdentityStore::new())
    } else {
        info!(
            max_connections = args.max_connections,
            "connecting to PostgreSQL"
        );
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&args.database_url)
            .await?;

        info!("running database migrations");
        vidhub_core::migrate::migrate(&pool).await?;
        Arc::new(PgIdentityStore::new(pool))
    };

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        tokens,
        cors_origin: args.cors_origin,
        cookie_secure: args.cookie_secure,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = vidhub_api::router(vidhub_api::AppState { store, config });

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
