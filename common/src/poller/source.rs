//! Seams between the poller and its environment.
//!
//! The browser build plugs in an HTTP source and a `setTimeout` based ticker;
//! tests plug in scripted sources and tokio's virtual clock.

use crate::jobs::payload::PayloadError;
use crate::jobs::JobProgress;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// A single failed poll. Never fatal to the loop.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("could not decode progress payload: {0}")]
    Decode(String),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Read-only access to a job's current progress.
pub trait ProgressSource {
    fn fetch(&self, job_id: &str) -> impl Future<Output = Result<JobProgress, PollError>>;
}

/// One-shot timer used to schedule the next poll.
pub trait Ticker {
    fn sleep(&self, period: Duration) -> impl Future<Output = ()>;
}
