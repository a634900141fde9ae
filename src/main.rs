use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobboard_api::auth::AuthConfig;
use jobboard_config::AppConfig;
use jobboard_domain::repositories::{JobRepository, UserRepository};
use jobboard_infrastructure::database::postgres::{
    PostgresJobRepository, PostgresUserRepository,
};
use jobboard_infrastructure::{create_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("jobboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Job board CRUD backend")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config/jobboard.toml"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("Log format")
                .value_parser(["json", "pretty"])
                .default_value("pretty"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let log_level = matches.get_one::<String>("log-level").unwrap();
    let log_format = matches.get_one::<String>("log-format").unwrap();

    init_logging(log_level, log_format)?;

    info!("starting job board backend");
    info!("configuration file: {config_path}");

    let config =
        AppConfig::load(Some(config_path)).context("failed to load configuration")?;

    let pool = create_pool(
        &config.database.url,
        config.database.max_connections,
        Duration::from_secs(config.database.connect_timeout_seconds),
    )
    .await
    .context("failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let jobs: Arc<dyn JobRepository> = Arc::new(PostgresJobRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool));

    let app = jobboard_api::create_app(
        jobs,
        users,
        AuthConfig {
            jwt_secret: config.auth.jwt_secret.clone(),
            jwt_expiration_hours: config.auth.jwt_expiration_hours,
        },
    );

    let listener = tokio::net::TcpListener::bind(&config.api.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.api.bind_address))?;
    info!("API server listening on http://{}", config.api.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
    }

    Ok(())
}
