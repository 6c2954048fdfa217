//! Batch job registry endpoints.
//!
//! The provided routes are:
//! - `POST /api/jobs`: registers a certificate-generation or email-campaign
//!   batch and returns its `job_id`.
//! - `GET /api/jobs/{job_id}/progress`: the status endpoint browsers poll. It
//!   returns the `ProgressPayload` shape, including the `state_hash` pollers
//!   use to detect change cheaply.
//! - `POST /api/jobs/{job_id}/report`: progress increments from workers.
//! - `POST /api/jobs/{job_id}/cancel`: cancellation requested from the UI,
//!   accepted only while the job is processing.

mod cancel;
mod get_progress;
mod register;
mod report;

use crate::job_controller::state::{JobChange, JobUpdate, JobsState};
use actix_web::web::{get, post, scope};
use actix_web::{HttpResponse, Scope};
use common::jobs::payload::ProgressPayload;

const API_PATH: &str = "/api/jobs";

/// Configures and returns the Actix scope for job routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(register::process))
        .route("/{job_id}/progress", get().to(get_progress::process))
        .route("/{job_id}/report", post().to(report::process))
        .route("/{job_id}/cancel", post().to(cancel::process))
}

/// Queues a change for the updater task after checking the job exists.
async fn forward(state: &JobsState, job_id: String, change: JobChange) -> HttpResponse {
    if !state.jobs.read().await.contains_key(&job_id) {
        return HttpResponse::NotFound().json(ProgressPayload::rejected("Job ID not found"));
    }

    match state.tx.send(JobUpdate { job_id, change }).await {
        Ok(()) => HttpResponse::Accepted().finish(),
        Err(e) => {
            HttpResponse::InternalServerError().body(format!("Job updater unavailable: {}", e))
        }
    }
}
