use crate::components::jobs::progress::helpers::{format_count, status_label};
use crate::components::jobs::progress::JobProgressComponent;
use common::jobs::JobProgress;
use log::info;
use yew::{html, Component, Context, Html};

/// Reads the job to follow from `?job=<id>` in the page URL.
fn job_id_from_location() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get("job").filter(|id| !id.is_empty())
}

/// One-line summary of a finished batch, shown under the panel.
fn result_summary(progress: &JobProgress) -> String {
    format!(
        "{}: {} correctos, {} con error de {}",
        status_label(progress.status),
        format_count(progress.succeeded),
        format_count(progress.failed),
        format_count(progress.total)
    )
}

pub enum AppMsg {
    JobFinished(JobProgress),
}

pub struct App {
    job_id: Option<String>,
    result: Option<JobProgress>,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            job_id: job_id_from_location(),
            result: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::JobFinished(progress) => {
                info!("Job finished as {}", progress.status);
                self.result = Some(progress);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.job_id {
            Some(job_id) => {
                let on_complete = ctx.link().callback(AppMsg::JobFinished);
                html! {
                    <div>
                        <JobProgressComponent
                            job_id={job_id.clone()}
                            reload_on_complete={false}
                            on_complete={Some(on_complete)}
                        />
                        if let Some(result) = &self.result {
                            <p class="job-result">{ result_summary(result) }</p>
                        }
                    </div>
                }
            }
            None => html! {
                <div>{"No se indicó ningún proceso para seguir."}</div>
            },
        }
    }
}
