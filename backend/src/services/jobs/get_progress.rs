use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::payload::ProgressPayload;

/// Handler for `GET /api/jobs/{job_id}/progress`.
///
/// Pure read: pollers may call it as often as they like. Unknown jobs get a
/// `success: false` envelope with a 404.
pub(crate) async fn process(
    job_id: web::Path<String>,
    state: web::Data<JobsState>,
) -> impl Responder {
    let jobs = state.jobs.read().await;
    match jobs.get(&job_id.into_inner()) {
        Some(record) => HttpResponse::Ok().json(record.to_payload()),
        None => HttpResponse::NotFound().json(ProgressPayload::rejected("No hay procesamiento activo")),
    }
}
