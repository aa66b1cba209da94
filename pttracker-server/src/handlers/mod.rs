//! Request handlers. Each one validates through the tracker, then either
//! renders a view or redirects, leaving any outcome message in the flash slot.

pub mod exercises;
pub mod workouts;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use pttracker::TrackerError;

use crate::app::{AppState, SharedState};
use crate::views::render;

pub const ACTIVE_LIST: &str = "/exercises/view/active";
pub const SESSION_HISTORY: &str = "/session/history";

/// A datastore failure; answered with a bare 500.
#[derive(Debug)]
pub struct AppError(TrackerError);

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

pub type HandlerResult = Result<Response, AppError>;

/// Moves a user-facing error into the flash slot; anything else is handed
/// back for a 500.
pub async fn recover(state: &AppState, err: TrackerError) -> Result<(), AppError> {
    if !err.is_user_facing() {
        return Err(err.into());
    }
    warn!("Refused: {}", err);
    state.flash.error(err.to_string()).await;
    Ok(())
}

pub async fn home(State(state): State<SharedState>) -> HandlerResult {
    let totals = state.tracker.totals().await?;
    Ok(render(&state.flash, "home", totals).await)
}

pub async fn reports() -> &'static str {
    "data goes here"
}
