//! Defines the properties for the `JobProgressComponent`.

use crate::api::progress::DEFAULT_ENDPOINT;
use common::jobs::JobProgress;
use yew::prelude::*;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Properties for the `JobProgressComponent`.
#[derive(Properties, PartialEq, Clone)]
pub struct JobProgressProps {
    /// Identifier returned by the backend when the batch was registered.
    pub job_id: String,

    /// Base URL of the job endpoints. `{endpoint}/{job_id}/progress` is polled.
    #[prop_or_else(default_endpoint)]
    pub endpoint: String,

    /// Reload the page shortly after the job finishes, so server-rendered
    /// lists (generated certificates, sent emails) pick up the result.
    #[prop_or_default]
    pub reload_on_complete: bool,

    /// Notified once when the job reaches a terminal status.
    #[prop_or_default]
    pub on_complete: Option<Callback<JobProgress>>,
}
