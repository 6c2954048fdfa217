//! Batch progress panel: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! Responsibilities
//! - Start the adaptive poller for `job_id` on first render and stop it when
//!   the component is destroyed or pointed at another job.
//! - Translate the poller's `on_update`/`on_complete` callbacks into `Msg`s.
//! - Leave all drawing to `view`, all state changes to `update`.

use yew::platform::spawn_local;
use yew::prelude::*;

pub(crate) mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::JobProgressProps;
pub use state::JobProgressComponent;

impl Component for JobProgressComponent {
    type Message = Msg;
    type Properties = JobProgressProps;

    fn create(ctx: &Context<Self>) -> Self {
        JobProgressComponent::new(&ctx.props().endpoint)
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if props.job_id == old_props.job_id && props.endpoint == old_props.endpoint {
            return true;
        }
        self.poller.stop();
        *self = JobProgressComponent::new(&props.endpoint);
        start_polling(self, ctx);
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            start_polling(self, ctx);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.poller.stop();
    }
}

fn start_polling(component: &JobProgressComponent, ctx: &Context<JobProgressComponent>) {
    if ctx.props().job_id.is_empty() {
        return;
    }
    let update_link = ctx.link().clone();
    let complete_link = ctx.link().clone();

    let task = component.poller.start(
        ctx.props().job_id.clone(),
        move |progress| update_link.send_message(Msg::Progress(progress.clone())),
        move |progress| complete_link.send_message(Msg::Completed(progress)),
    );
    if let Some(task) = task {
        spawn_local(task);
    }
}
