//! Small presentation helpers for the progress panel.

use common::jobs::JobStatus;
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Spanish label shown next to the progress bar.
pub fn status_label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "En cola",
        JobStatus::Processing => "Procesando",
        JobStatus::Completed => "Completado",
        JobStatus::Partial => "Completado con errores",
        JobStatus::Failed => "Fallido",
    }
}

/// CSS modifier for the bar colour.
pub fn status_class(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending | JobStatus::Processing => "job-progress--running",
        JobStatus::Completed => "job-progress--ok",
        JobStatus::Partial => "job-progress--warning",
        JobStatus::Failed => "job-progress--error",
    }
}

/// Counter with Spanish digit grouping (`12.345`).
pub fn format_count(value: u32) -> String {
    value.to_formatted_string(&Locale::es)
}

/// Message for the toast shown when a job finishes.
pub fn completion_message(status: JobStatus, error: Option<&str>) -> String {
    match (status, error) {
        (JobStatus::Failed, Some(error)) => format!("El proceso falló: {}", error),
        (JobStatus::Failed, None) => "El proceso falló.".to_string(),
        (JobStatus::Partial, _) => "Proceso finalizado con errores.".to_string(),
        _ => "Proceso completado.".to_string(),
    }
}

/// Inline style of the toast element.
const TOAST_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("bottom", "20px"),
    ("left", "50%"),
    ("transform", "translateX(-50%)"),
    ("background", "rgba(0, 0, 0, 0.8)"),
    ("color", "#fff"),
    ("padding", "10px 20px"),
    ("border-radius", "4px"),
    ("z-index", "10000"),
    ("font-family", "Arial, sans-serif"),
];

/// Displays a temporary notification message at the bottom of the screen.
///
/// The toast removes itself after three seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                for (property, value) in TOAST_STYLE {
                    style.set_property(property, value).ok();
                }

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}
