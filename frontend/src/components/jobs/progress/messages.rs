use common::jobs::JobProgress;

#[derive(Clone)]
pub enum Msg {
    Progress(JobProgress),
    Completed(JobProgress),
    Cancel,
    CancelFailed(String),
}
