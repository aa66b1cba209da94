//! Workout session operations.

use log::warn;
use serde::Serialize;

use crate::db::models::{CompletedExercise, SessionExercise, SessionSummary};
use crate::db::operations::{
    exercise_id_exists, next_session_id, save_workout_session, session_exercise_list,
    session_history, single_session, total_exercise_count, total_session_count,
};
use crate::error::{Result, TrackerError};
use crate::tracker::Tracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletedSession {
    pub session_id: i64,
    pub exercise_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_exercise_count: i64,
    pub total_session_count: i64,
}

impl Tracker {
    /// Active exercises, all unchecked, for the start-session form.
    pub async fn session_exercises(&self) -> Result<Vec<SessionExercise>> {
        Ok(session_exercise_list(&self.db_pool).await?)
    }

    /// Records a session from the checked exercise ids.
    ///
    /// Ids that do not name a stored exercise are dropped. With nothing left
    /// the session is refused and no id is drawn.
    pub async fn complete_session(&self, checked: &[i64]) -> Result<CompletedSession> {
        let mut exercise_ids = Vec::with_capacity(checked.len());
        for &id in checked {
            if exercise_ids.contains(&id) {
                continue;
            }
            if exercise_id_exists(&self.db_pool, id).await? {
                exercise_ids.push(id);
            } else {
                warn!("Dropping unknown exercise {} from session", id);
            }
        }

        if exercise_ids.is_empty() {
            return Err(TrackerError::EmptySession);
        }

        let session_id = next_session_id(&self.db_pool).await?;
        let exercise_count = save_workout_session(&self.db_pool, &exercise_ids, session_id).await?;

        Ok(CompletedSession {
            session_id,
            exercise_count,
        })
    }

    pub async fn session_history(&self) -> Result<Vec<SessionSummary>> {
        Ok(session_history(&self.db_pool).await?)
    }

    /// Exercises completed in one session; a session only exists through its
    /// completion records, so an empty result means an unknown id.
    pub async fn session(&self, session_id: i64) -> Result<Vec<CompletedExercise>> {
        let exercises = single_session(&self.db_pool, session_id).await?;
        if exercises.is_empty() {
            return Err(TrackerError::SessionNotFound(session_id.to_string()));
        }
        Ok(exercises)
    }

    pub async fn totals(&self) -> Result<Totals> {
        Ok(Totals {
            total_exercise_count: total_exercise_count(&self.db_pool).await?,
            total_session_count: total_session_count(&self.db_pool).await?,
        })
    }
}
