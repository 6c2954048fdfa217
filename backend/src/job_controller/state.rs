//! Manages the state of long-running, asynchronous batch jobs.
//!
//! Certificate generation and email campaigns run outside the request/response
//! cycle. Their workers report progress to this module, and browsers poll it
//! through `GET /api/jobs/{job_id}/progress`.
//!
//! The main components are:
//! - `JobsState`: A clonable, thread-safe struct that holds the shared state of all jobs.
//!   It is injected into the Actix application state in `main.rs`.
//! - `JobUpdate`: A message struct used to communicate changes from the HTTP
//!   handlers back to the central state manager.
//! - `start_job_updater`: A long-running task that listens for `JobUpdate` messages
//!   on an MPSC channel and applies them to the shared `JobsState`.
//! - `prune_finished`: drops terminal jobs older than the retention window so
//!   the registry does not grow without bound.

use crate::job_controller::record::JobRecord;
use chrono::{DateTime, TimeDelta, Utc};
use common::requests::ReportProgressRequest;
use log::{debug, info};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// A thread-safe, shareable container for the state of all batch jobs.
#[derive(Clone)]
pub struct JobsState {
    /// A map from a unique job ID to its current `JobRecord`.
    ///
    /// Readers (the progress endpoint) take the read lock; only the
    /// registration handler and `start_job_updater` write.
    pub jobs: Arc<RwLock<HashMap<String, JobRecord>>>,

    /// Sender side of the update channel consumed by `start_job_updater`.
    pub tx: mpsc::Sender<JobUpdate>,

    /// How long a finished job stays queryable.
    pub retention: TimeDelta,
}

impl JobsState {
    /// Builds an empty registry together with the receiver the updater task
    /// must consume.
    pub fn new(capacity: usize, retention: TimeDelta) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
            retention,
        };
        (state, rx)
    }
}

/// Removes finished jobs whose last change is older than `retention`.
/// Returns how many were dropped.
pub fn prune_finished(
    jobs: &mut HashMap<String, JobRecord>,
    now: DateTime<Utc>,
    retention: TimeDelta,
) -> usize {
    let before = jobs.len();
    jobs.retain(|_, record| !record.is_expired(now, retention));
    let removed = before - jobs.len();
    if removed > 0 {
        debug!("Evicted {} finished jobs", removed);
    }
    removed
}

/// What happened to a job.
#[derive(Debug)]
pub enum JobChange {
    Report(ReportProgressRequest),
    Cancel,
}

/// Represents a change for a specific job.
#[derive(Debug)]
pub struct JobUpdate {
    /// The unique identifier of the job being updated.
    pub(crate) job_id: String,
    pub(crate) change: JobChange,
}

/// Starts the central job state updater task.
///
/// This function should be spawned as a long-running background task (as seen
/// in `main.rs`). It runs until every sender has been dropped.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        apply_update(&state, update).await;
    }
}

/// Applies a single update under the write lock.
pub async fn apply_update(state: &JobsState, update: JobUpdate) {
    let mut jobs = state.jobs.write().await;
    prune_finished(&mut jobs, Utc::now(), state.retention);
    let Some(record) = jobs.get_mut(&update.job_id) else {
        debug!("Dropping update for unknown job {}", update.job_id);
        return;
    };

    let was_terminal = record.status.is_terminal();
    let applied = match update.change {
        JobChange::Report(report) => record.apply(report),
        JobChange::Cancel => record.cancel(),
    };

    if !applied {
        debug!("Job {} already finished, update ignored", update.job_id);
    } else if !was_terminal && record.status.is_terminal() {
        info!(
            "Job {} finished: {} ({} ok, {} failed of {})",
            update.job_id, record.status, record.succeeded, record.failed, record.total
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::jobs::{JobKind, JobStatus};

    fn finished(age: TimeDelta) -> JobRecord {
        let mut record = JobRecord::new(JobKind::EmailCampaign, 1);
        record.apply(ReportProgressRequest {
            succeeded: 1,
            ..Default::default()
        });
        record.updated_at -= age;
        record
    }

    #[test]
    fn prune_drops_only_expired_finished_jobs() {
        let mut jobs = HashMap::new();
        jobs.insert("old".to_string(), finished(TimeDelta::minutes(30)));
        jobs.insert("fresh".to_string(), finished(TimeDelta::seconds(5)));
        let mut idle = JobRecord::new(JobKind::CertificateGeneration, 3);
        idle.updated_at -= TimeDelta::hours(2);
        jobs.insert("idle".to_string(), idle);

        let removed = prune_finished(&mut jobs, Utc::now(), TimeDelta::minutes(10));

        assert_eq!(removed, 1);
        assert!(!jobs.contains_key("old"));
        assert!(jobs.contains_key("fresh"));
        assert_eq!(jobs["idle"].status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn updater_sweeps_expired_jobs() {
        let (state, _rx) = JobsState::new(4, TimeDelta::minutes(10));
        {
            let mut jobs = state.jobs.write().await;
            jobs.insert("old".to_string(), finished(TimeDelta::hours(1)));
            jobs.insert("live".to_string(), JobRecord::new(JobKind::EmailCampaign, 2));
        }

        apply_update(
            &state,
            JobUpdate {
                job_id: "live".to_string(),
                change: JobChange::Report(ReportProgressRequest {
                    succeeded: 1,
                    ..Default::default()
                }),
            },
        )
        .await;

        let jobs = state.jobs.read().await;
        assert!(!jobs.contains_key("old"));
        assert_eq!(jobs["live"].status, JobStatus::Processing);
    }
}
