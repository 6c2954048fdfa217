use crate::job_controller::record::JobRecord;
use crate::job_controller::state::{prune_finished, JobsState};
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use common::requests::{RegisterJobRequest, RegisterJobResponse};
use log::info;
use uuid::Uuid;

/// Handler for `POST /api/jobs`.
///
/// Registers a new batch as `Pending` and returns its `job_id`, which the
/// worker uses to report progress and the browser uses to poll. Finished
/// jobs past the retention window are evicted first.
pub(crate) async fn process(
    state: web::Data<JobsState>,
    payload: web::Json<RegisterJobRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let job_id = Uuid::new_v4().to_string();

    let mut jobs = state.jobs.write().await;
    prune_finished(&mut jobs, Utc::now(), state.retention);
    jobs.insert(job_id.clone(), JobRecord::new(req.kind, req.total));
    drop(jobs);
    info!("Registered {:?} job {} with {} units", req.kind, job_id, req.total);

    HttpResponse::Ok().json(RegisterJobResponse { job_id })
}
