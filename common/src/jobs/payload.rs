//! Wire format of the job-status endpoint.
//!
//! Field names follow the payload the certificate views have always returned
//! (`exitosos`, `fallidos`, `error_mensaje`); English aliases are accepted on
//! input so other producers can report progress too.

use super::{percent_of, JobProgress, JobStatus, StateFingerprint};
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_success() -> bool {
    true
}

/// JSON body returned by `GET /api/jobs/{job_id}/progress`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    #[serde(default = "default_success")]
    pub success: bool,
    /// Percentage reported by the server, may be fractional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(rename = "exitosos", alias = "succeeded", default)]
    pub succeeded: u32,
    #[serde(rename = "fallidos", alias = "failed", default)]
    pub failed: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_hash: Option<String>,
    #[serde(
        rename = "error_mensaje",
        alias = "error_message",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,
    /// Set together with `success: false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Default for ProgressPayload {
    fn default() -> Self {
        Self {
            success: true,
            progress: None,
            succeeded: 0,
            failed: 0,
            total: 0,
            status: None,
            is_complete: false,
            state_hash: None,
            error_message: None,
            error: None,
            last_updated: None,
        }
    }
}

impl ProgressPayload {
    /// Envelope for a request the server could not answer.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Why a payload could not be turned into a [`JobProgress`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("server rejected the progress request: {0}")]
    Rejected(String),
    #[error("inconsistent counters: {succeeded} succeeded + {failed} failed > {total} total")]
    Inconsistent {
        succeeded: u32,
        failed: u32,
        total: u32,
    },
}

impl TryFrom<ProgressPayload> for JobProgress {
    type Error = PayloadError;

    fn try_from(payload: ProgressPayload) -> Result<Self, Self::Error> {
        if !payload.success {
            return Err(PayloadError::Rejected(
                payload.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let ProgressPayload {
            progress,
            succeeded,
            failed,
            total,
            status,
            is_complete,
            state_hash,
            error_message,
            ..
        } = payload;

        if u64::from(succeeded) + u64::from(failed) > u64::from(total) {
            return Err(PayloadError::Inconsistent {
                succeeded,
                failed,
                total,
            });
        }

        let mut status = status.unwrap_or(if is_complete {
            JobStatus::Completed
        } else {
            JobStatus::Processing
        });
        if is_complete && !status.is_terminal() {
            status = JobStatus::Completed;
        }

        let percent = match progress {
            Some(p) if p.is_finite() => p.round().clamp(0.0, 100.0) as u8,
            _ => percent_of(succeeded + failed, total),
        };

        let fingerprint = match state_hash {
            Some(hash) if !hash.is_empty() => StateFingerprint::new(hash),
            _ => StateFingerprint::from_parts(succeeded, failed, status),
        };

        let error_message = match status {
            JobStatus::Failed => error_message.filter(|m| !m.is_empty()),
            _ => None,
        };

        Ok(JobProgress {
            total,
            succeeded,
            failed,
            percent,
            status,
            fingerprint,
            error_message,
        })
    }
}
