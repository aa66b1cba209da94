//! Exercise catalog operations.

use log::debug;
use serde::Serialize;

use crate::db::models::{Exercise, ExerciseListItem, ExerciseStatus};
use crate::db::operations::{
    add_exercise, delete_exercise, exercise_names, list_exercises, single_exercise_completed_count,
    single_exercise_info, toggle_exercise_status, update_exercise_data,
};
use crate::error::{Result, TrackerError};
use crate::tracker::Tracker;
use crate::validation::{ensure_unique_name, validate_name_length};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseDetails {
    pub exercise: Exercise,
    pub completed_count: i64,
}

/// The unique index only folds ASCII case, so it backs up rather than
/// replaces the check in `ensure_unique_name`.
fn duplicate_or_database(err: sqlx::Error, name: &str) -> TrackerError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            TrackerError::DuplicateName(name.to_string())
        }
        _ => TrackerError::Database(err),
    }
}

impl Tracker {
    pub async fn list_exercises(&self, status: ExerciseStatus) -> Result<Vec<ExerciseListItem>> {
        Ok(list_exercises(&self.db_pool, status).await?)
    }

    async fn check_name(&self, name: &str, excluding: Option<i64>) -> Result<()> {
        validate_name_length(name)?;
        let existing = exercise_names(&self.db_pool, excluding).await?;
        ensure_unique_name(name, &existing)
    }

    pub async fn create_exercise(&self, name: &str, description: &str) -> Result<Exercise> {
        self.check_name(name, None).await?;
        add_exercise(&self.db_pool, name, description)
            .await
            .map_err(|e| duplicate_or_database(e, name))
    }

    pub async fn exercise(&self, id: i64) -> Result<Exercise> {
        single_exercise_info(&self.db_pool, id)
            .await?
            .ok_or_else(|| TrackerError::ExerciseNotFound(id.to_string()))
    }

    pub async fn exercise_details(&self, id: i64) -> Result<ExerciseDetails> {
        let exercise = self.exercise(id).await?;
        let completed_count = single_exercise_completed_count(&self.db_pool, id).await?;
        Ok(ExerciseDetails {
            exercise,
            completed_count,
        })
    }

    /// Renaming an exercise to its own current name is allowed; the duplicate
    /// check skips the exercise being edited.
    pub async fn update_exercise(&self, id: i64, name: &str, description: &str) -> Result<()> {
        self.exercise(id).await?;
        self.check_name(name, Some(id)).await?;
        let changed = update_exercise_data(&self.db_pool, id, name, description)
            .await
            .map_err(|e| duplicate_or_database(e, name))?;
        if changed == 0 {
            return Err(TrackerError::ExerciseNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Flips the active flag and returns the new value, or `None` when the
    /// exercise does not exist.
    pub async fn toggle_exercise_status(&self, id: i64) -> Result<Option<bool>> {
        let active = toggle_exercise_status(&self.db_pool, id).await?;
        if active.is_none() {
            debug!("toggle_exercise_status: no exercise {}", id);
        }
        Ok(active)
    }

    pub async fn delete_exercise(&self, id: i64) -> Result<()> {
        self.exercise(id).await?;
        if delete_exercise(&self.db_pool, id).await? > 0 {
            return Ok(());
        }

        let completed = single_exercise_completed_count(&self.db_pool, id).await?;
        if completed > 0 {
            Err(TrackerError::DeleteBlocked { id, completed })
        } else {
            Err(TrackerError::ExerciseNotFound(id.to_string()))
        }
    }
}
