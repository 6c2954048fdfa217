//! Browser bindings for the job poller.
//!
//! `HttpProgressSource` reads `GET {base}/{job_id}/progress` with `gloo-net`
//! and `BrowserTicker` waits with `setTimeout` through `gloo-timers`. Together
//! they plug the runtime-agnostic `AdaptivePoller` from `common` into the page.

use common::jobs::payload::ProgressPayload;
use common::jobs::JobProgress;
use common::poller::{AdaptivePoller, PollError, ProgressSource, Ticker};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use std::future::Future;
use std::time::Duration;

/// Default mount point of the job endpoints on the backend.
pub const DEFAULT_ENDPOINT: &str = "/api/jobs";

pub type BrowserPoller = AdaptivePoller<HttpProgressSource, BrowserTicker>;

pub fn browser_poller(endpoint: &str) -> BrowserPoller {
    AdaptivePoller::new(HttpProgressSource::new(endpoint), BrowserTicker)
}

#[derive(Clone, Debug)]
pub struct HttpProgressSource {
    base_url: String,
}

impl HttpProgressSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn progress_url(&self, job_id: &str) -> String {
        format!("{}/{}/progress", self.base_url, job_id)
    }

    pub fn cancel_url(&self, job_id: &str) -> String {
        format!("{}/{}/cancel", self.base_url, job_id)
    }
}

impl ProgressSource for HttpProgressSource {
    fn fetch(&self, job_id: &str) -> impl Future<Output = Result<JobProgress, PollError>> {
        let url = self.progress_url(job_id);
        async move {
            let resp = Request::get(&url)
                .send()
                .await
                .map_err(|e| PollError::Transport(e.to_string()))?;
            if !resp.ok() {
                return Err(PollError::Status(resp.status()));
            }
            let payload: ProgressPayload = resp
                .json()
                .await
                .map_err(|e| PollError::Decode(e.to_string()))?;
            Ok(JobProgress::try_from(payload)?)
        }
    }
}

/// Asks the backend to cancel a running job.
pub async fn request_cancel(endpoint: &str, job_id: &str) -> Result<(), String> {
    let url = HttpProgressSource::new(endpoint).cancel_url(job_id);
    let resp = Request::post(&url).send().await.map_err(|e| e.to_string())?;
    if resp.ok() {
        Ok(())
    } else {
        Err(format!("HTTP {}", resp.status()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTicker;

impl Ticker for BrowserTicker {
    fn sleep(&self, period: Duration) -> impl Future<Output = ()> {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis)
    }
}
