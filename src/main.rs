//! Server: reads configuration from the environment, prepares the database, serves the API.

use doctor_directory::{app, apply_migrations, connect, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "doctor_directory=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let config = AppConfig::from_env()?;
    let pool = connect(&config).await?;
    if config.auto_migrate {
        let applied = apply_migrations(&pool).await?;
        tracing::info!(count = applied.len(), "migrations applied");
    }

    let router = app(AppState::new(pool), &config);
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
