//! Background tagging jobs
//!
//! Each triggered batch is tracked as a job with an id and a pollable
//! status, so callers can observe when a fire-and-forget batch finishes.

use super::runner::TaggingReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Lifecycle of a background tagging job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

/// A tracked tagging job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagJob {
    pub id: u64,
    pub status: JobStatus,
    pub records_queued: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<TaggingReport>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// In-process registry of tagging jobs
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<u64, TagJob>>,
    next_id: AtomicU64,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new queued job, returning its id
    pub fn create(&self, records_queued: usize) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let job = TagJob {
            id,
            status: JobStatus::Queued,
            records_queued,
            report: None,
            created_at: Utc::now(),
            finished_at: None,
        };
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.insert(id, job);
        }
        id
    }

    /// Mark a job as running
    pub fn start(&self, id: u64) {
        self.update(id, |job| job.status = JobStatus::Running);
    }

    /// Mark a job as done with its final report
    pub fn finish(&self, id: u64, report: TaggingReport) {
        self.update(id, |job| {
            job.status = JobStatus::Done;
            job.report = Some(report);
            job.finished_at = Some(Utc::now());
        });
    }

    /// Mark a job as failed
    pub fn fail(&self, id: u64) {
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.finished_at = Some(Utc::now());
        });
    }

    /// Snapshot of a job's current state
    pub fn get(&self, id: u64) -> Option<TagJob> {
        self.jobs.lock().ok()?.get(&id).cloned()
    }

    fn update(&self, id: u64, f: impl FnOnce(&mut TagJob)) {
        if let Ok(mut jobs) = self.jobs.lock() {
            if let Some(job) = jobs.get_mut(&id) {
                f(job);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_lifecycle() {
        let registry = JobRegistry::new();
        let id = registry.create(42);

        let job = registry.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.records_queued, 42);

        registry.start(id);
        assert_eq!(registry.get(id).unwrap().status, JobStatus::Running);

        registry.finish(
            id,
            TaggingReport {
                queued: 42,
                success: 40,
                failed: 2,
                no_content: 0,
            },
        );
        let job = registry.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.report.unwrap().success, 40);
        assert!(job.finished_at.is_some());
    }

    #[test]
    fn ids_are_unique_and_missing_jobs_are_none() {
        let registry = JobRegistry::new();
        let a = registry.create(1);
        let b = registry.create(1);
        assert_ne!(a, b);
        assert!(registry.get(999).is_none());
    }
}
