use axum::Router;
use axum::routing::{get, post};
use pttracker::Tracker;
use std::sync::Arc;

use crate::flash::FlashSlot;
use crate::handlers::{self, exercises, workouts};

/// Everything a handler needs, built once per process.
pub struct AppState {
    pub tracker: Tracker,
    pub flash: FlashSlot,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            flash: FlashSlot::default(),
        }
    }
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/exercises/view", post(exercises::pick_status))
        .route("/exercises/view/{status}", get(exercises::list))
        .route(
            "/exercise/new",
            get(exercises::new_form).post(exercises::create),
        )
        .route("/exercise/{id}", get(exercises::show))
        .route("/exercise/{id}/status", post(exercises::toggle_status))
        .route(
            "/exercise/update/{id}",
            get(exercises::edit_form).post(exercises::update),
        )
        .route("/exercise/delete/{id}", post(exercises::delete))
        .route("/session/new", get(workouts::new_session))
        .route("/session/completed", post(workouts::complete))
        .route("/session/history", get(workouts::history))
        .route("/session/{id}", get(workouts::show))
        .route("/reports", get(handlers::reports))
        .with_state(state)
}
