//! Component state for the batch progress panel.

use crate::api::progress::{browser_poller, BrowserPoller};
use common::jobs::JobProgress;

/// Main state container for the `JobProgressComponent`.
///
/// Fields are `pub` because they are accessed by `view` and `update` modules.
pub struct JobProgressComponent {
    /// Poller bound to the component's endpoint. Stopped on `destroy`.
    pub poller: BrowserPoller,

    /// Latest snapshot delivered by the poller, `None` until the first poll.
    pub progress: Option<JobProgress>,

    /// Set once `on_complete` fired for the current job.
    pub finished: bool,

    /// A cancel request is on its way to the backend.
    pub cancelling: bool,
}

impl JobProgressComponent {
    pub fn new(endpoint: &str) -> Self {
        Self {
            poller: browser_poller(endpoint),
            progress: None,
            finished: false,
            cancelling: false,
        }
    }
}
