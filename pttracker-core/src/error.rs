use thiserror::Error;

/// Outcome of a refused tracker operation.
///
/// The `Display` text of the user-facing variants is what the web layer shows
/// in its flash message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("Name must be between 1 and 254 characters.")]
    NameLength,
    #[error("An exercise named \"{0}\" already exists.")]
    DuplicateName(String),
    #[error("You must check off at least 1 exercise to save a workout session.")]
    EmptySession,
    #[error("The specified exercise ({0}) was not found.")]
    ExerciseNotFound(String),
    #[error("The specified session ({0}) was not found.")]
    SessionNotFound(String),
    #[error("This exercise has been completed {completed} time(s) and cannot be deleted.")]
    DeleteBlocked { id: i64, completed: i64 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl TrackerError {
    /// Validation, not-found and integrity-guard errors; everything the user
    /// can act on. Datastore failures are not.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, TrackerError::Database(_))
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
