//! Shared model for server-side batch jobs (bulk certificate generation and
//! bulk email campaigns) as seen by the client.
//!
//! The backend stores and serves these values; the frontend poller reads them
//! back through [`payload::ProgressPayload`] and hands [`JobProgress`]
//! snapshots to the UI.

pub mod payload;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a batch job.
///
/// `Completed`, `Partial` and `Failed` are terminal: once a job reaches one of
/// them its progress no longer changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[serde(alias = "draft")]
    Pending,
    #[serde(alias = "in_progress")]
    Processing,
    #[serde(alias = "sent")]
    Completed,
    /// Finished, but some units of work failed.
    Partial,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Partial | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Partial => "partial",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of batch operation a job tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    CertificateGeneration,
    EmailCampaign,
}

/// Opaque token summarising a job's observable state.
///
/// Two snapshots with equal fingerprints are treated as "nothing changed".
/// The value is only ever compared for equality; its structure is not
/// interpreted and may differ between server versions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateFingerprint(String);

impl StateFingerprint {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Composite fingerprint used when the server does not send `state_hash`.
    pub fn from_parts(succeeded: u32, failed: u32, status: JobStatus) -> Self {
        Self(format!("{}-{}-{}", succeeded, failed, status))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snapshot of a batch job's progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    /// Units of work in the batch.
    pub total: u32,
    pub succeeded: u32,
    pub failed: u32,
    /// 0..=100.
    pub percent: u8,
    pub status: JobStatus,
    pub fingerprint: StateFingerprint,
    /// Only present when `status` is `Failed`.
    pub error_message: Option<String>,
}

impl JobProgress {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Units already handled, successfully or not.
    pub fn processed(&self) -> u32 {
        self.succeeded + self.failed
    }
}

/// Integer percentage of `done` over `total`, 0 for an empty batch.
pub fn percent_of(done: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (u64::from(done) * 100) / u64::from(total);
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Partial.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_accepts_legacy_names() {
        let draft: JobStatus = serde_json::from_str("\"draft\"").unwrap();
        let sent: JobStatus = serde_json::from_str("\"sent\"").unwrap();
        assert_eq!(draft, JobStatus::Pending);
        assert_eq!(sent, JobStatus::Completed);
        assert_eq!(serde_json::to_string(&JobStatus::Partial).unwrap(), "\"partial\"");
    }

    #[test]
    fn composite_fingerprint_tracks_counters_and_status() {
        let a = StateFingerprint::from_parts(3, 1, JobStatus::Processing);
        let b = StateFingerprint::from_parts(3, 1, JobStatus::Processing);
        let c = StateFingerprint::from_parts(3, 1, JobStatus::Completed);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "3-1-processing");
    }

    #[test]
    fn percent_handles_empty_and_full_batches() {
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(3, 3), 100);
        assert_eq!(percent_of(5, 3), 100);
    }
}
