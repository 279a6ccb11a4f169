mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::store::{PgSalesStore, SalesStore};
use crate::logging::LoggingConfig;
use crate::services::scheduler_service::JobSchedulerService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    logging::init_logging(&LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let config = Arc::new(config);
    let store: Arc<dyn SalesStore> = Arc::new(PgSalesStore::new(pool.clone()));

    let mut scheduler =
        JobSchedulerService::new(Arc::new(pool.clone()), store.clone(), config.clone()).await?;
    scheduler.start().await?;

    let state = AppState { pool, store };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Dukadash backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
