use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use log::{debug, info};
use pttracker::TrackerError;
use pttracker::db::models::{ExerciseListItem, ExerciseStatus};
use pttracker::validation::parse_id;
use serde::{Deserialize, Serialize};

use crate::app::SharedState;
use crate::handlers::{ACTIVE_LIST, HandlerResult, recover};
use crate::views::{redirect, render};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExerciseForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReturnTo {
    pub from: Option<String>,
}

#[derive(Serialize)]
struct ExerciseList {
    status: ExerciseStatus,
    exercises: Vec<ExerciseListItem>,
}

#[derive(Serialize)]
struct EditPage<'a> {
    id: i64,
    name: &'a str,
    description: &'a str,
}

fn list_path(status: ExerciseStatus) -> String {
    format!("/exercises/view/{}", status)
}

fn parse_status(raw: Option<&str>) -> ExerciseStatus {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}

async fn not_found(state: &SharedState, raw_id: &str) -> HandlerResult {
    recover(state, TrackerError::ExerciseNotFound(raw_id.to_string())).await?;
    Ok(redirect(ACTIVE_LIST))
}

pub async fn list(State(state): State<SharedState>, Path(status): Path<String>) -> HandlerResult {
    let Ok(status) = status.parse::<ExerciseStatus>() else {
        debug!("Unknown list status {:?}, showing active", status);
        return Ok(redirect(ACTIVE_LIST));
    };

    let exercises = state.tracker.list_exercises(status).await?;
    Ok(render(&state.flash, "all_exercises", ExerciseList { status, exercises }).await)
}

pub async fn pick_status(Form(form): Form<StatusForm>) -> HandlerResult {
    Ok(redirect(&list_path(parse_status(Some(form.status.as_str())))))
}

pub async fn new_form(State(state): State<SharedState>) -> HandlerResult {
    Ok(render(&state.flash, "add_exercise", ExerciseForm::default()).await)
}

pub async fn create(
    State(state): State<SharedState>,
    Form(form): Form<ExerciseForm>,
) -> HandlerResult {
    match state
        .tracker
        .create_exercise(&form.name, &form.description)
        .await
    {
        Ok(exercise) => {
            info!("Added exercise {} ({:?})", exercise.id, exercise.name);
            state.flash.success("New exercise added").await;
            Ok(redirect(ACTIVE_LIST))
        }
        Err(err) => {
            recover(&state, err).await?;
            Ok(render(&state.flash, "add_exercise", form).await)
        }
    }
}

pub async fn toggle_status(
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
    Query(query): Query<ReturnTo>,
    form: Result<Form<ReturnTo>, FormRejection>,
) -> HandlerResult {
    // The list to return to normally arrives as a form field; a bodyless post
    // may carry it in the query string instead.
    let from = form.ok().and_then(|Form(f)| f.from).or(query.from);
    if let Some(id) = parse_id(&raw_id) {
        match state.tracker.toggle_exercise_status(id).await? {
            Some(active) => {
                let status = if active { "active" } else { "inactive" };
                info!("Exercise {} is now {}", id, status);
            }
            None => debug!("Ignoring status toggle for unknown exercise {}", id),
        }
    }
    Ok(redirect(&list_path(parse_status(from.as_deref()))))
}

pub async fn show(State(state): State<SharedState>, Path(raw_id): Path<String>) -> HandlerResult {
    let Some(id) = parse_id(&raw_id) else {
        return not_found(&state, &raw_id).await;
    };

    match state.tracker.exercise_details(id).await {
        Ok(details) => Ok(render(&state.flash, "exercise", details).await),
        Err(err) => {
            recover(&state, err).await?;
            Ok(redirect(ACTIVE_LIST))
        }
    }
}

pub async fn edit_form(
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
) -> HandlerResult {
    let Some(id) = parse_id(&raw_id) else {
        return not_found(&state, &raw_id).await;
    };

    match state.tracker.exercise(id).await {
        Ok(exercise) => {
            let page = EditPage {
                id: exercise.id,
                name: &exercise.name,
                description: &exercise.description,
            };
            Ok(render(&state.flash, "update_exercise", page).await)
        }
        Err(err) => {
            recover(&state, err).await?;
            Ok(redirect(ACTIVE_LIST))
        }
    }
}

pub async fn update(
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
    Form(form): Form<ExerciseForm>,
) -> HandlerResult {
    let Some(id) = parse_id(&raw_id) else {
        return not_found(&state, &raw_id).await;
    };

    match state
        .tracker
        .update_exercise(id, &form.name, &form.description)
        .await
    {
        Ok(()) => {
            info!("Updated exercise {} ({:?})", id, form.name);
            state.flash.success("Exercise updated").await;
            Ok(redirect(&format!("/exercise/{id}")))
        }
        Err(err @ TrackerError::ExerciseNotFound(_)) => {
            recover(&state, err).await?;
            Ok(redirect(ACTIVE_LIST))
        }
        Err(err) => {
            recover(&state, err).await?;
            let page = EditPage {
                id,
                name: &form.name,
                description: &form.description,
            };
            Ok(render(&state.flash, "update_exercise", page).await)
        }
    }
}

pub async fn delete(State(state): State<SharedState>, Path(raw_id): Path<String>) -> HandlerResult {
    let Some(id) = parse_id(&raw_id) else {
        return not_found(&state, &raw_id).await;
    };

    match state.tracker.delete_exercise(id).await {
        Ok(()) => {
            info!("Deleted exercise {}", id);
            state.flash.success("Exercise deleted").await;
            Ok(redirect(ACTIVE_LIST))
        }
        Err(err @ TrackerError::DeleteBlocked { .. }) => {
            recover(&state, err).await?;
            Ok(redirect(&format!("/exercise/{id}")))
        }
        Err(err) => {
            recover(&state, err).await?;
            Ok(redirect(ACTIVE_LIST))
        }
    }
}
