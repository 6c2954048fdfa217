use crate::jobs::{JobKind, JobStatus};
use serde::{Deserialize, Serialize};

/// Request payload for registering a new batch job.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterJobRequest {
    pub kind: JobKind,
    /// Units of work in the batch (certificates to render, emails to send).
    pub total: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterJobResponse {
    pub job_id: String,
}

/// Progress reported by a server-side worker.
///
/// Counters are increments, not absolute values. `status` moves the job to a
/// new lifecycle state; workers usually send `processing` once and the final
/// status at the end.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ReportProgressRequest {
    #[serde(default)]
    pub succeeded: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default, alias = "error_mensaje")]
    pub error_message: Option<String>,
}
