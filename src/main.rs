// src/main.rs

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use ghostwriter::api::app_router;
use ghostwriter::config::Config;
use ghostwriter::db;
use ghostwriter::state::create_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ghostwriter backend");
    info!("Inference endpoint: {}", config.ollama_base_url);
    info!("Model: {}", config.ollama_model);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool, Path::new(&config.migrations_path)).await?;

    let bind_address = config.bind_address();
    let state = Arc::new(create_app_state(pool, config));
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
