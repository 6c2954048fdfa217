//! Adaptive progress poller for server-side batch jobs.
//!
//! The poller repeatedly asks a [`ProgressSource`] for a job's progress,
//! compares the returned fingerprint with the previous one and adjusts its own
//! cadence along a fixed ladder (see [`session`]). It stops on its own when
//! the job reaches a terminal status.
//!
//! The poller never spawns anything itself. [`AdaptivePoller::start`] hands
//! back a [`PollTask`] that the caller drives on its local executor
//! (`spawn_local` in the browser, a `LocalSet` in tests). Scheduling is
//! wait-then-reschedule: the next tick is only armed once the previous
//! response resolved, so at most one request is in flight per poller.
//!
//! Cancellation relies on a generation counter. Every `start` and `stop`
//! bumps it, and a running task re-checks it after each await point, so a
//! response that resolves after `stop` returned is dropped without reaching
//! any callback.

pub mod session;
pub mod source;

pub use session::{PollerSession, LADDER};
pub use source::{PollError, ProgressSource, Ticker};

use crate::jobs::JobProgress;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

/// Polling loop returned by [`AdaptivePoller::start`].
pub type PollTask = Pin<Box<dyn Future<Output = ()>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Stopped,
}

struct Shared {
    state: PollerState,
    generation: u64,
    session: Option<PollerSession>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.state == PollerState::Polling && self.generation == generation
    }
}

/// Watches one job at a time. Cloning yields another handle to the same
/// poller, which is how UI callbacks get to call [`AdaptivePoller::stop`].
pub struct AdaptivePoller<S, T> {
    source: Rc<S>,
    ticker: Rc<T>,
    shared: Rc<RefCell<Shared>>,
}

impl<S, T> Clone for AdaptivePoller<S, T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            ticker: Rc::clone(&self.ticker),
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S, T> AdaptivePoller<S, T>
where
    S: ProgressSource + 'static,
    T: Ticker + 'static,
{
    pub fn new(source: S, ticker: T) -> Self {
        Self {
            source: Rc::new(source),
            ticker: Rc::new(ticker),
            shared: Rc::new(RefCell::new(Shared {
                state: PollerState::Idle,
                generation: 0,
                session: None,
            })),
        }
    }

    pub fn state(&self) -> PollerState {
        self.shared.borrow().state
    }

    pub fn is_active(&self) -> bool {
        self.state() == PollerState::Polling
    }

    /// Period the next tick will be scheduled with, while polling.
    pub fn current_interval(&self) -> Option<Duration> {
        self.shared.borrow().session.as_ref().map(PollerSession::interval)
    }

    pub fn no_change_streak(&self) -> Option<u32> {
        self.shared
            .borrow()
            .session
            .as_ref()
            .map(PollerSession::no_change_streak)
    }

    /// Begins polling `job_id`.
    ///
    /// Returns `None` without touching the running loop when this poller is
    /// already polling; call [`stop`](Self::stop) first to switch jobs.
    /// `on_update` runs for every observed change, the first poll included.
    /// `on_complete` runs once when the job reaches a terminal status.
    pub fn start<U, C>(
        &self,
        job_id: impl Into<String>,
        on_update: U,
        on_complete: C,
    ) -> Option<PollTask>
    where
        U: Fn(&JobProgress) + 'static,
        C: FnOnce(JobProgress) + 'static,
    {
        let job_id = job_id.into();
        let generation = {
            let mut shared = self.shared.borrow_mut();
            if shared.state == PollerState::Polling {
                debug!("poller already active, ignoring start for job {}", job_id);
                return None;
            }
            shared.generation += 1;
            shared.state = PollerState::Polling;
            shared.session = Some(PollerSession::new());
            shared.generation
        };
        debug!("polling job {} (generation {})", job_id, generation);

        let source = Rc::clone(&self.source);
        let ticker = Rc::clone(&self.ticker);
        let shared = Rc::clone(&self.shared);

        let task: PollTask = Box::pin(async move {
            let mut on_complete = Some(on_complete);
            loop {
                let result = source.fetch(&job_id).await;
                if !shared.borrow().is_current(generation) {
                    debug!("dropping progress for job {} received after stop", job_id);
                    return;
                }

                match result {
                    Err(err) => warn!("progress poll for job {} failed: {}", job_id, err),
                    Ok(mut progress) => {
                        let observation = match shared.borrow_mut().session.as_mut() {
                            Some(session) => session.observe(&mut progress),
                            None => return,
                        };
                        if observation.interval_changed {
                            debug!(
                                "job {}: polling every {} ms",
                                job_id,
                                observation.interval.as_millis()
                            );
                        }
                        if observation.changed {
                            on_update(&progress);
                        }

                        if progress.is_terminal() {
                            {
                                let mut shared = shared.borrow_mut();
                                // on_update may have stopped us.
                                if !shared.is_current(generation) {
                                    return;
                                }
                                shared.state = PollerState::Stopped;
                                shared.session = None;
                            }
                            info!("job {} finished with status {}", job_id, progress.status);
                            if let Some(on_complete) = on_complete.take() {
                                on_complete(progress);
                            }
                            return;
                        }
                    }
                }

                let period = match shared.borrow().session.as_ref() {
                    Some(session) => session.interval(),
                    None => return,
                };
                ticker.sleep(period).await;
                if !shared.borrow().is_current(generation) {
                    return;
                }
            }
        });
        Some(task)
    }

    /// Cancels the running loop, if any. Safe to call at any time.
    pub fn stop(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.generation += 1;
        shared.session = None;
        if shared.state == PollerState::Polling {
            debug!("poller stopped (generation {})", shared.generation);
            shared.state = PollerState::Stopped;
        }
    }
}
