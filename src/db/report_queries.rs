use sqlx::PgPool;

use crate::models::{AnalysisReport, SavedReport};

/// Persist a finished report as JSONB, returning the saved row.
pub async fn insert(
    pool: &PgPool,
    name: &str,
    report: &AnalysisReport,
) -> Result<SavedReport, sqlx::Error> {
    let summary = serde_json::to_value(report)
        .map_err(|e| sqlx::Error::Protocol(format!("report serialization failed: {}", e)))?;

    sqlx::query_as::<_, SavedReport>(
        "INSERT INTO analysis_reports (name, summary)
         VALUES ($1, $2)
         RETURNING id, name, created_at, summary",
    )
    .bind(name)
    .bind(summary)
    .fetch_one(pool)
    .await
}

pub async fn fetch_recent(pool: &PgPool, limit: i64) -> Result<Vec<SavedReport>, sqlx::Error> {
    sqlx::query_as::<_, SavedReport>(
        "SELECT id, name, created_at, summary
         FROM analysis_reports
         ORDER BY created_at DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
