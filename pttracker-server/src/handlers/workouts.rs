use axum::Form;
use axum::extract::{Path, State};
use log::info;
use pttracker::TrackerError;
use pttracker::db::models::{CompletedExercise, SessionExercise, SessionSummary};
use pttracker::validation::{checked_exercise_ids, parse_id};
use serde::Serialize;

use crate::app::SharedState;
use crate::handlers::{HandlerResult, SESSION_HISTORY, recover};
use crate::views::{redirect, render};

#[derive(Serialize)]
struct NewSession {
    exercises: Vec<SessionExercise>,
}

#[derive(Serialize)]
struct History {
    sessions: Vec<SessionSummary>,
}

#[derive(Serialize)]
struct SessionPage {
    session_id: i64,
    exercises: Vec<CompletedExercise>,
}

pub async fn new_session(State(state): State<SharedState>) -> HandlerResult {
    let exercises = state.tracker.session_exercises().await?;
    Ok(render(&state.flash, "new_session", NewSession { exercises }).await)
}

/// Each checked box arrives as `<exercise id>=t`.
pub async fn complete(
    State(state): State<SharedState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> HandlerResult {
    let checked = checked_exercise_ids(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    match state.tracker.complete_session(&checked).await {
        Ok(saved) => {
            info!(
                "Logged session {} ({} exercises)",
                saved.session_id, saved.exercise_count
            );
            state
                .flash
                .success(format!(
                    "Session logged. Good work! {} exercise(s) completed.",
                    saved.exercise_count
                ))
                .await;
            Ok(redirect("/"))
        }
        Err(err) => {
            recover(&state, err).await?;
            Ok(redirect("/session/new"))
        }
    }
}

pub async fn history(State(state): State<SharedState>) -> HandlerResult {
    let sessions = state.tracker.session_history().await?;
    Ok(render(&state.flash, "session_history", History { sessions }).await)
}

pub async fn show(State(state): State<SharedState>, Path(raw_id): Path<String>) -> HandlerResult {
    let result = match parse_id(&raw_id) {
        Some(session_id) => state
            .tracker
            .session(session_id)
            .await
            .map(|exercises| SessionPage {
                session_id,
                exercises,
            }),
        None => Err(TrackerError::SessionNotFound(raw_id)),
    };

    match result {
        Ok(page) => Ok(render(&state.flash, "session", page).await),
        Err(err) => {
            recover(&state, err).await?;
            Ok(redirect(SESSION_HISTORY))
        }
    }
}
