//! In-memory registry of jobs whose files are in use.
//!
//! A render holds a [`JobLease`] from descriptor generation until the
//! artifact has been located; the retention sweep skips every file whose
//! name carries a leased identifier.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use animhub_core::types::JobId;

/// Shared set of active job identifiers, counted per holder.
#[derive(Debug, Clone, Default)]
pub struct JobLeases {
    active: Arc<Mutex<HashMap<JobId, usize>>>,
}

impl JobLeases {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, usize>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark `id` in use until the returned guard is dropped.
    pub fn acquire(&self, id: JobId) -> JobLease {
        *self.lock().entry(id).or_insert(0) += 1;
        trace!(job_id = %id, "Lease acquired");
        JobLease {
            id,
            leases: self.clone(),
        }
    }

    /// Whether any holder currently uses `id`.
    pub fn is_active(&self, id: &JobId) -> bool {
        self.lock().contains_key(id)
    }

    /// Copy of the identifiers in use right now.
    pub fn snapshot(&self) -> HashSet<JobId> {
        self.lock().keys().copied().collect()
    }

    fn release(&self, id: &JobId) {
        let mut active = self.lock();
        if let Some(count) = active.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                active.remove(id);
            }
        }
        trace!(job_id = %id, "Lease released");
    }
}

/// Guard that keeps one job marked as in use.
#[derive(Debug)]
pub struct JobLease {
    id: JobId,
    leases: JobLeases,
}

impl JobLease {
    /// Identifier this lease protects.
    pub fn id(&self) -> &JobId {
        &self.id
    }
}

impl Drop for JobLease {
    fn drop(&mut self) {
        self.leases.release(&self.id);
    }
}
