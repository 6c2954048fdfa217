use crate::app::App;

mod api;
mod app;
mod components;
mod logger;

fn main() {
    logger::init(log::LevelFilter::Info);
    yew::Renderer::<App>::new().render();
}
