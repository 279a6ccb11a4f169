use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::db;
use crate::errors::AppError;
use crate::external::store::SalesStore;
use crate::services::{analysis_service, notification_service};

// Context passed to job functions
#[derive(Clone)]
pub struct JobContext {
    pub pool: Arc<PgPool>,
    pub store: Arc<dyn SalesStore>,
    pub config: Arc<AppConfig>,
}

pub struct JobSchedulerService {
    scheduler: JobScheduler,
    context: JobContext,
}

impl JobSchedulerService {
    pub async fn new(
        pool: Arc<PgPool>,
        store: Arc<dyn SalesStore>,
        config: Arc<AppConfig>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            context: JobContext {
                pool,
                store,
                config,
            },
        })
    }

    /// Register and start the scheduled jobs.
    pub async fn start(&mut self) -> Result<(), AppError> {
        info!("🚀 Starting job scheduler...");

        let cron = self.context.config.report.cron.clone();
        self.schedule_job(&cron, "daily_report", run_daily_report).await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;

        info!("✅ Job scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    #[allow(dead_code)]
    pub async fn stop(&mut self) -> Result<(), AppError> {
        info!("🛑 Stopping job scheduler...");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::External(format!("Failed to stop scheduler: {}", e)))?;
        Ok(())
    }

    async fn schedule_job<F, Fut>(
        &mut self,
        schedule: &str,
        job_name: &'static str,
        job_fn: F,
    ) -> Result<(), AppError>
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let context = self.context.clone();
        let job_fn = Arc::new(job_fn);

        let job = Job::new_async(schedule, move |_uuid, _l| {
            let context = context.clone();
            let job_fn = job_fn.clone();
            Box::pin(async move {
                execute_job(job_name, context, job_fn).await;
            })
        })
        .map_err(|e| AppError::External(format!("Failed to create job {}: {}", job_name, e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::External(format!("Failed to add job {}: {}", job_name, e)))?;

        info!("📅 Scheduled: {} [cron: {}]", job_name, schedule);
        Ok(())
    }
}

async fn execute_job<F, Fut>(job_name: &str, context: JobContext, job_fn: Arc<F>)
where
    F: Fn(JobContext) -> Fut,
    Fut: std::future::Future<Output = Result<(), AppError>>,
{
    info!("🏃 Starting job: {}", job_name);
    let started_at = Utc::now();

    let result = job_fn(context).await;
    let duration_ms = (Utc::now() - started_at).num_milliseconds();

    match result {
        Ok(()) => info!("✅ Job completed: {} ({}ms)", job_name, duration_ms),
        Err(e) => error!("❌ Job failed: {} - {} ({}ms)", job_name, e, duration_ms),
    }
}

/// The daily report job: aggregate everything on record, persist the report,
/// then email it.
pub async fn run_daily_report(ctx: JobContext) -> Result<(), AppError> {
    info!("📊 Running scheduled sales report...");

    let report = analysis_service::run_analysis(ctx.store.as_ref(), None).await?;
    let name = format!("analysis_{}", report.generated_at.format("%Y%m%dT%H%M%SZ"));

    let saved = db::report_queries::insert(&ctx.pool, &name, &report).await?;
    info!("💾 Saved report {} (id {})", name, saved.id);

    if ctx.config.report.recipient.is_empty() {
        warn!("REPORT_RECIPIENT not set, skipping report email");
        return Ok(());
    }

    notification_service::send_report_email(
        &ctx.config.smtp,
        &ctx.config.report.recipient,
        &report,
    )
    .await
}
