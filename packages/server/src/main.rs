use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server_core::{build_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:data/weighttrack.db?mode=rwc".to_string());
    if database_url.starts_with("sqlite:data/") {
        std::fs::create_dir_all("data")?;
    }

    let pool = server_core::db::connect(&database_url).await?;
    server_core::db::ensure_schema(&pool).await?;

    let state = AppState::new(pool);
    let app = build_app(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
