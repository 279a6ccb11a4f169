use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::db;
use crate::errors::AppError;
use crate::models::{AnalysisReport, SavedReport};
use crate::services::analysis_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports))
        .route("/run", post(run_analysis))
}

#[derive(Debug, Deserialize)]
pub struct RunQuery {
    pub save: Option<bool>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub report: AnalysisReport,
    pub saved_report_id: Option<i32>,
}

pub async fn run_analysis(
    State(state): State<AppState>,
    Query(params): Query<RunQuery>,
) -> Result<Json<RunResponse>, AppError> {
    info!("POST /reports/run - Running sales analysis");

    let range = match (params.from, params.to) {
        (Some(from), Some(to)) => Some((from, to)),
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "both `from` and `to` are required for a date range".to_string(),
            ))
        }
    };

    let report = analysis_service::run_analysis(state.store.as_ref(), range).await?;

    let saved_report_id = if params.save.unwrap_or(true) {
        let name = format!(
            "analysis_{}",
            report.generated_at.format("%Y%m%dT%H%M%SZ")
        );
        let saved = db::report_queries::insert(&state.pool, &name, &report)
            .await
            .map_err(|e| {
                error!("Failed to save report: {}", e);
                AppError::Db(e)
            })?;
        Some(saved.id)
    } else {
        None
    };

    Ok(Json(RunResponse {
        report,
        saved_report_id,
    }))
}

pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavedReport>>, AppError> {
    info!("GET /reports - Listing saved reports");

    let reports = db::report_queries::fetch_recent(&state.pool, 50)
        .await
        .map_err(|e| {
            error!("Failed to fetch reports: {}", e);
            AppError::Db(e)
        })?;

    Ok(Json(reports))
}
