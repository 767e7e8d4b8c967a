//! Interval scheduler for periodic maintenance tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use animhub_core::error::AppError;

use crate::executor::JobExecutor;

/// Runs registered jobs on fixed intervals
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Executor the scheduled ticks dispatch into
    executor: Arc<JobExecutor>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("job_types", &self.executor.registered_types())
            .finish()
    }
}

impl CronScheduler {
    /// Create a new scheduler
    pub async fn new(executor: Arc<JobExecutor>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            executor,
        })
    }

    /// Run `job_type` every `interval`.
    ///
    /// Failures are logged and the schedule continues.
    pub async fn register_repeated(
        &self,
        job_type: &str,
        interval: Duration,
    ) -> Result<(), AppError> {
        if !self.executor.has_handler(job_type) {
            return Err(AppError::configuration(format!(
                "No handler registered for scheduled job '{}'",
                job_type
            )));
        }

        let executor = Arc::clone(&self.executor);
        let name = job_type.to_string();
        let job = CronJob::new_repeated_async(interval, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let name = name.clone();
            Box::pin(async move {
                tracing::debug!("Running scheduled job '{}'", name);
                if let Err(e) = executor.execute(&name).await {
                    tracing::error!("Scheduled job '{}' failed: {}", name, e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create {} schedule: {}", job_type, e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add {} schedule: {}", job_type, e))
        })?;

        tracing::info!(
            "Registered: {} (every {}s)",
            job_type,
            interval.as_secs()
        );
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Scheduler shut down");
        Ok(())
    }
}
