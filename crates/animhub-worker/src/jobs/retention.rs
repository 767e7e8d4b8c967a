//! Age-based retention sweep of the upload, output, and descriptor trees.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use animhub_core::types::JobId;
use animhub_storage::JobLeases;

use crate::executor::{JobExecutionError, JobHandler};

/// Summary of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// When the sweep started.
    pub started_at: Option<DateTime<Utc>>,
    /// Files deleted.
    pub files_removed: u64,
    /// Bytes reclaimed by deleted files.
    pub bytes_freed: u64,
    /// Empty directories deleted.
    pub dirs_removed: u64,
    /// Old files kept because their job is still rendering.
    pub skipped_active: u64,
    /// Removals or metadata reads that failed and were ignored.
    pub errors: u64,
}

/// Deletes files older than a fixed age, then empty directories.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    roots: Vec<PathBuf>,
    max_age: Duration,
    leases: JobLeases,
}

impl RetentionSweeper {
    /// Create a sweeper over `roots`.
    pub fn new(roots: Vec<PathBuf>, max_age: Duration, leases: JobLeases) -> Self {
        Self {
            roots,
            max_age,
            leases,
        }
    }

    /// Sweep relative to the current time.
    pub fn sweep(&self) -> SweepReport {
        self.sweep_at(SystemTime::now())
    }

    /// Sweep as if the clock read `now`.
    ///
    /// Individual failures are counted and skipped. The roots themselves are
    /// never removed.
    pub fn sweep_at(&self, now: SystemTime) -> SweepReport {
        let mut report = SweepReport {
            started_at: Some(Utc::now()),
            ..Default::default()
        };
        let active = self.leases.snapshot();

        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }
            self.sweep_root(root, now, &active, &mut report);
        }

        report
    }

    fn sweep_root(
        &self,
        root: &Path,
        now: SystemTime,
        active: &HashSet<JobId>,
        report: &mut SweepReport,
    ) {
        for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    report.errors += 1;
                    continue;
                }
            };
            let path = entry.path();

            if entry.file_type().is_dir() {
                if !is_empty_dir(path) {
                    continue;
                }
                // A directory emptied by this pass has a fresh mtime and goes on the next one.
                let stale = entry
                    .metadata()
                    .ok()
                    .and_then(|m| m.modified().ok())
                    .is_some_and(|modified| age_of(modified, now) > self.max_age);
                if !stale {
                    continue;
                }
                if belongs_to_active_job(root, path, active) {
                    report.skipped_active += 1;
                    continue;
                }
                if std::fs::remove_dir(path).is_ok() {
                    report.dirs_removed += 1;
                }
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Cannot stat file");
                    report.errors += 1;
                    continue;
                }
            };

            let Some(born) = metadata.created().or_else(|_| metadata.modified()).ok() else {
                report.errors += 1;
                continue;
            };
            if age_of(born, now) <= self.max_age {
                continue;
            }

            if belongs_to_active_job(root, path, active) {
                report.skipped_active += 1;
                continue;
            }

            match std::fs::remove_file(path) {
                Ok(()) => {
                    report.files_removed += 1;
                    report.bytes_freed += metadata.len();
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Failed to remove file");
                    report.errors += 1;
                }
            }
        }
    }
}

fn age_of(stamp: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(stamp).unwrap_or(Duration::ZERO)
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

/// Whether any path component below `root` is named after an active job.
fn belongs_to_active_job(root: &Path, path: &Path, active: &HashSet<JobId>) -> bool {
    if active.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .and_then(|name| name.split('_').next())
            .and_then(|prefix| prefix.parse::<JobId>().ok())
            .is_some_and(|id| active.contains(&id))
    })
}

/// Runs [`RetentionSweeper`] as a scheduled job.
#[derive(Debug)]
pub struct RetentionJobHandler {
    sweeper: RetentionSweeper,
}

impl RetentionJobHandler {
    /// Job type the sweep is registered under.
    pub const JOB_TYPE: &'static str = "retention_sweep";

    /// Create a new retention handler
    pub fn new(sweeper: RetentionSweeper) -> Self {
        Self { sweeper }
    }
}

#[async_trait]
impl JobHandler for RetentionJobHandler {
    fn job_type(&self) -> &str {
        Self::JOB_TYPE
    }

    async fn execute(&self) -> Result<Option<Value>, JobExecutionError> {
        let sweeper = self.sweeper.clone();
        let report = tokio::task::spawn_blocking(move || sweeper.sweep())
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Sweep task failed: {e}")))?;

        info!(
            files_removed = report.files_removed,
            dirs_removed = report.dirs_removed,
            bytes_freed = report.bytes_freed,
            skipped_active = report.skipped_active,
            errors = report.errors,
            "Retention sweep complete"
        );

        let value = serde_json::to_value(&report)
            .map_err(|e| JobExecutionError::Permanent(format!("Report encoding failed: {e}")))?;
        Ok(Some(value))
    }
}
