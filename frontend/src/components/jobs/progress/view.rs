//! View rendering for the batch progress panel: a bar, the counters and,
//! while the job runs, a cancel button.

use common::jobs::JobStatus;

use super::helpers::{format_count, status_class, status_label};
use super::messages::Msg;
use super::state::JobProgressComponent;
use yew::prelude::*;

pub fn view(component: &JobProgressComponent, ctx: &Context<JobProgressComponent>) -> Html {
    let Some(progress) = &component.progress else {
        return html! {
            <div class="job-progress job-progress--loading">{"Consultando el estado del proceso..."}</div>
        };
    };

    let bar_style = format!("width: {}%;", progress.percent);
    let show_cancel = !component.finished && progress.status == JobStatus::Processing;

    html! {
        <div class={classes!("job-progress", status_class(progress.status))}>
            <div class="job-progress__header">
                <span class="job-progress__status">{ status_label(progress.status) }</span>
                <span class="job-progress__percent">{ format!("{}%", progress.percent) }</span>
            </div>
            <div class="job-progress__track">
                <div class="job-progress__bar" style={bar_style}></div>
            </div>
            <div class="job-progress__counters">
                <span>{ format!("Exitosos: {}", format_count(progress.succeeded)) }</span>
                <span>{ format!("Fallidos: {}", format_count(progress.failed)) }</span>
                <span>{ format!("Total: {}", format_count(progress.total)) }</span>
            </div>
            {
                if let Some(error) = &progress.error_message {
                    html! { <div class="job-progress__error">{ error.clone() }</div> }
                } else {
                    html! {}
                }
            }
            {
                if show_cancel {
                    html! {
                        <button
                            class="icon-btn"
                            disabled={component.cancelling}
                            onclick={ctx.link().callback(|_| Msg::Cancel)}
                        >
                            <i class="material-icons">{"cancel"}</i>
                            <span class="icon-label">{"Cancelar"}</span>
                        </button>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
