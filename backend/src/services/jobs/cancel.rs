use crate::job_controller::state::{JobChange, JobsState};
use actix_web::{web, HttpResponse, Responder};
use common::jobs::payload::ProgressPayload;

/// Handler for `POST /api/jobs/{job_id}/cancel`.
///
/// Only a job that is processing can be cancelled. Pending and finished jobs
/// answer `409 Conflict` and keep their state.
pub(crate) async fn process(
    job_id: web::Path<String>,
    state: web::Data<JobsState>,
) -> impl Responder {
    let job_id = job_id.into_inner();
    let running = state.jobs.read().await.get(&job_id).map(|r| r.can_cancel());
    match running {
        None => HttpResponse::NotFound().json(ProgressPayload::rejected("Job ID not found")),
        Some(false) => {
            HttpResponse::Conflict().json(ProgressPayload::rejected("El proceso no está en ejecución"))
        }
        Some(true) => super::forward(&state, job_id, JobChange::Cancel).await,
    }
}
