//! Update function for the batch progress panel.
//!
//! Elm-style: receives the current `JobProgressComponent` state, the `Context`
//! and a `Msg`, mutates the state and returns whether the view should
//! re-render. Network side effects (cancel request, page reload) are spawned
//! from here and report back through messages.

use log::{info, warn};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::progress::request_cancel;

use super::helpers::{completion_message, show_toast};
use super::messages::Msg;
use super::state::JobProgressComponent;

/// Delay before reloading so the user can read the final state.
const RELOAD_DELAY_MS: u32 = 1500;

pub fn update(
    component: &mut JobProgressComponent,
    ctx: &Context<JobProgressComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::Progress(progress) => {
            component.progress = Some(progress);
            true
        }
        Msg::Completed(progress) => {
            component.finished = true;
            component.cancelling = false;
            show_toast(&completion_message(
                progress.status,
                progress.error_message.as_deref(),
            ));
            if let Some(on_complete) = &ctx.props().on_complete {
                on_complete.emit(progress.clone());
            }
            component.progress = Some(progress);

            if ctx.props().reload_on_complete {
                spawn_local(async {
                    gloo_timers::future::TimeoutFuture::new(RELOAD_DELAY_MS).await;
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                });
            }
            true
        }
        Msg::Cancel => {
            if component.finished || component.cancelling {
                return false;
            }
            component.cancelling = true;
            let link = ctx.link().clone();
            let endpoint = ctx.props().endpoint.clone();
            let job_id = ctx.props().job_id.clone();
            spawn_local(async move {
                match request_cancel(&endpoint, &job_id).await {
                    // The poller picks up the failed status on its next tick.
                    Ok(()) => info!("Cancellation requested for job {}", job_id),
                    Err(e) => link.send_message(Msg::CancelFailed(e)),
                }
            });
            true
        }
        Msg::CancelFailed(error) => {
            warn!("Cancel request failed: {}", error);
            component.cancelling = false;
            show_toast("No se pudo cancelar el proceso.");
            true
        }
    }
}
