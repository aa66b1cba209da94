//! Views are JSON documents naming the page, carrying the pending flash and
//! the page data alongside.

use axum::Json;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::flash::{Flash, FlashSlot};

#[derive(Serialize)]
struct Page<T: Serialize> {
    view: &'static str,
    flash: Option<Flash>,
    #[serde(flatten)]
    data: T,
}

/// Renders `view`, consuming the pending flash message.
pub async fn render<T: Serialize>(flash: &FlashSlot, view: &'static str, data: T) -> Response {
    let page = Page {
        view,
        flash: flash.take().await,
        data,
    };
    Json(page).into_response()
}

pub fn redirect(to: &str) -> Response {
    Redirect::to(to).into_response()
}
