use crate::job_controller::state::{JobChange, JobsState};
use actix_web::{web, HttpResponse, Responder};
use common::requests::ReportProgressRequest;

/// Handler for `POST /api/jobs/{job_id}/report`.
///
/// Server-side workers push their increments here. The change is queued for
/// the updater task and applied asynchronously, hence `202 Accepted`.
pub(crate) async fn process(
    job_id: web::Path<String>,
    state: web::Data<JobsState>,
    payload: web::Json<ReportProgressRequest>,
) -> impl Responder {
    super::forward(
        &state,
        job_id.into_inner(),
        JobChange::Report(payload.into_inner()),
    )
    .await
}
