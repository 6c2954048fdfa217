//! Server-side bookkeeping for a single batch job.
//!
//! A `JobRecord` is created as `Pending` when a batch is registered and is then
//! only changed by the `start_job_updater` task. Once it reaches a terminal
//! status it is frozen: late reports from workers are ignored so the
//! progress seen by pollers never changes after completion. Finished records
//! are evicted from the registry once they are older than the retention window.

use chrono::{DateTime, TimeDelta, Utc};
use common::jobs::payload::ProgressPayload;
use common::jobs::{percent_of, JobKind, JobStatus};
use common::requests::ReportProgressRequest;

/// Message stored on a job cancelled from the UI.
pub const CANCELLED_MESSAGE: &str = "Cancelado por el usuario";

/// Message stored when every unit of a batch failed.
pub const ALL_FAILED_MESSAGE: &str = "Todas las unidades del lote fallaron";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub kind: JobKind,
    pub total: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub status: JobStatus,
    pub error_message: Option<String>,
    /// Last time the record changed.
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(kind: JobKind, total: u32) -> Self {
        Self {
            kind,
            total,
            succeeded: 0,
            failed: 0,
            status: JobStatus::Pending,
            error_message: None,
            updated_at: Utc::now(),
        }
    }

    pub fn processed(&self) -> u32 {
        self.succeeded + self.failed
    }

    /// Applies a worker report. Returns `false` when the record was already
    /// terminal and the report was dropped.
    ///
    /// Counters are clamped so `succeeded + failed` never exceeds `total`.
    /// A report that accounts for the last unit finishes the job even when
    /// the worker did not send a final status.
    pub fn apply(&mut self, report: ReportProgressRequest) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        let remaining = self.total - self.processed();
        let succeeded = report.succeeded.min(remaining);
        let failed = report.failed.min(remaining - succeeded);
        self.succeeded += succeeded;
        self.failed += failed;

        match report.status {
            Some(JobStatus::Failed) => {
                self.status = JobStatus::Failed;
                self.error_message = report.error_message.filter(|m| !m.is_empty());
            }
            Some(status) if status.is_terminal() => self.finish(),
            Some(status) => self.status = status,
            None if self.status == JobStatus::Pending && self.processed() > 0 => {
                self.status = JobStatus::Processing;
            }
            None => {}
        }

        if !self.status.is_terminal() && self.total > 0 && self.processed() == self.total {
            self.finish();
        }
        self.updated_at = Utc::now();
        true
    }

    /// Only running jobs can be cancelled.
    pub fn can_cancel(&self) -> bool {
        self.status == JobStatus::Processing
    }

    /// Marks a running job failed on user request.
    pub fn cancel(&mut self) -> bool {
        if !self.can_cancel() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(CANCELLED_MESSAGE.to_string());
        self.updated_at = Utc::now();
        true
    }

    /// A finished record that has not changed for `retention`.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: TimeDelta) -> bool {
        self.status.is_terminal() && now - self.updated_at >= retention
    }

    /// Picks the terminal status from the counters.
    fn finish(&mut self) {
        self.status = if self.failed == 0 {
            JobStatus::Completed
        } else if self.succeeded == 0 && self.failed == self.total {
            self.error_message = Some(ALL_FAILED_MESSAGE.to_string());
            JobStatus::Failed
        } else {
            JobStatus::Partial
        };
    }

    /// Change token handed to pollers: MD5 of the counters and status.
    pub fn state_hash(&self) -> String {
        let state = format!(
            "{}-{}-{}-{}",
            self.processed(),
            self.succeeded,
            self.failed,
            self.status
        );
        format!("{:x}", md5::compute(state))
    }

    pub fn to_payload(&self) -> ProgressPayload {
        ProgressPayload {
            success: true,
            progress: Some(f64::from(percent_of(self.processed(), self.total))),
            succeeded: self.succeeded,
            failed: self.failed,
            total: self.total,
            status: Some(self.status),
            is_complete: self.status.is_terminal(),
            state_hash: Some(self.state_hash()),
            error_message: self.error_message.clone(),
            error: None,
            last_updated: Some(self.updated_at.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(succeeded: u32, failed: u32) -> ReportProgressRequest {
        ReportProgressRequest {
            succeeded,
            failed,
            ..Default::default()
        }
    }

    #[test]
    fn first_report_moves_job_to_processing() {
        let mut record = JobRecord::new(JobKind::CertificateGeneration, 10);
        assert!(record.apply(report(2, 1)));
        assert_eq!(record.status, JobStatus::Processing);
        assert_eq!(record.processed(), 3);
        assert_eq!(record.to_payload().progress, Some(30.0));
    }

    #[test]
    fn last_unit_finishes_the_batch() {
        let mut record = JobRecord::new(JobKind::EmailCampaign, 3);
        record.apply(report(3, 0));
        assert_eq!(record.status, JobStatus::Completed);

        let mut record = JobRecord::new(JobKind::EmailCampaign, 3);
        record.apply(report(2, 1));
        assert_eq!(record.status, JobStatus::Partial);

        let mut record = JobRecord::new(JobKind::EmailCampaign, 3);
        record.apply(report(0, 3));
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some(ALL_FAILED_MESSAGE));
    }

    #[test]
    fn counters_are_clamped_to_total() {
        let mut record = JobRecord::new(JobKind::CertificateGeneration, 4);
        record.apply(report(3, 5));
        assert_eq!(record.succeeded, 3);
        assert_eq!(record.failed, 1);
        assert_eq!(record.to_payload().progress, Some(100.0));
    }

    #[test]
    fn terminal_records_ignore_late_reports() {
        let mut record = JobRecord::new(JobKind::CertificateGeneration, 5);
        record.apply(ReportProgressRequest {
            status: Some(JobStatus::Failed),
            error_message: Some("LibreOffice no responde".into()),
            ..Default::default()
        });
        let frozen = record.clone();

        assert!(!record.apply(report(1, 0)));
        assert!(!record.cancel());
        assert_eq!(record, frozen);
        assert_eq!(record.error_message.as_deref(), Some("LibreOffice no responde"));
    }

    #[test]
    fn cancel_marks_running_job_failed() {
        let mut record = JobRecord::new(JobKind::EmailCampaign, 5);
        record.apply(report(1, 0));
        assert!(record.cancel());
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some(CANCELLED_MESSAGE));
    }

    #[test]
    fn pending_jobs_cannot_be_cancelled() {
        let mut record = JobRecord::new(JobKind::EmailCampaign, 5);
        assert!(!record.can_cancel());
        assert!(!record.cancel());
        assert_eq!(record.status, JobStatus::Pending);
    }

    #[test]
    fn last_updated_is_sent_and_moves_forward() {
        let mut record = JobRecord::new(JobKind::EmailCampaign, 3);
        record.updated_at -= TimeDelta::seconds(5);
        let before = record.to_payload().last_updated.unwrap();

        record.apply(report(1, 0));
        let after = record.to_payload().last_updated.unwrap();

        let before = DateTime::parse_from_rfc3339(&before).unwrap();
        let after = DateTime::parse_from_rfc3339(&after).unwrap();
        assert!(after > before);
    }

    #[test]
    fn only_old_finished_records_expire() {
        let now = Utc::now();
        let retention = TimeDelta::minutes(10);

        let mut finished = JobRecord::new(JobKind::CertificateGeneration, 1);
        finished.apply(report(1, 0));
        assert!(!finished.is_expired(now, retention));
        finished.updated_at = now - TimeDelta::minutes(11);
        assert!(finished.is_expired(now, retention));

        let mut stalled = JobRecord::new(JobKind::CertificateGeneration, 2);
        stalled.updated_at = now - TimeDelta::hours(1);
        assert!(!stalled.is_expired(now, retention));
    }

    #[test]
    fn state_hash_only_changes_with_state() {
        let mut record = JobRecord::new(JobKind::CertificateGeneration, 5);
        let initial = record.state_hash();
        assert_eq!(initial, record.state_hash());
        assert_eq!(initial.len(), 32);

        record.apply(report(0, 0));
        assert_eq!(initial, record.state_hash());

        record.apply(report(1, 0));
        assert_ne!(initial, record.state_hash());
    }

    #[test]
    fn payload_round_trips_into_client_progress() {
        let mut record = JobRecord::new(JobKind::CertificateGeneration, 4);
        record.apply(report(1, 1));
        let progress = common::jobs::JobProgress::try_from(record.to_payload()).unwrap();
        assert_eq!(progress.percent, 50);
        assert_eq!(progress.status, JobStatus::Processing);
        assert_eq!(progress.fingerprint.as_str(), record.state_hash());
    }
}
