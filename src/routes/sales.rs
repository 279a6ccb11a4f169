use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::Sale;
use crate::services::ingest_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales))
        .route("/upload", post(upload_sales))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RejectedRowDto {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub inserted: u64,
    pub rejected: Vec<RejectedRowDto>,
    pub skipped_blank_rows: usize,
    pub total_rows_in_db: i64,
}

/// Body is the raw CSV text. Row-level rejects come back in the response;
/// file-level problems fail the whole call with a 400.
pub async fn upload_sales(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<UploadResponse>, AppError> {
    info!("POST /sales/upload - Ingesting CSV ({} bytes)", body.len());

    let outcome = ingest_service::ingest_csv(&body).map_err(|e| {
        error!("CSV upload rejected: {}", e);
        AppError::Ingest(e)
    })?;

    let rejected: Vec<RejectedRowDto> = outcome
        .rejected
        .iter()
        .map(|r| RejectedRowDto {
            row: r.row,
            reason: r.reason.to_string(),
        })
        .collect();

    let inserted = state.store.insert_batch(outcome.accepted).await.map_err(|e| {
        error!("Batch insert failed: {}", e);
        AppError::Store(e)
    })?;

    let total_rows_in_db = state.store.count().await?;

    info!(
        "Upload completed: {} inserted, {} rejected, {} blank rows skipped",
        inserted,
        rejected.len(),
        outcome.skipped_blank
    );

    Ok(Json(UploadResponse {
        message: "Upload successful".to_string(),
        inserted,
        rejected,
        skipped_blank_rows: outcome.skipped_blank,
        total_rows_in_db,
    }))
}

pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Sale>>, AppError> {
    info!("GET /sales - Listing sales");

    let sales = match (params.from, params.to) {
        (Some(from), Some(to)) => state.store.fetch_by_date_range(from, to).await?,
        (None, None) => state.store.fetch_all().await?,
        _ => {
            return Err(AppError::Validation(
                "both `from` and `to` are required for a date range".to_string(),
            ))
        }
    };

    Ok(Json(sales))
}
