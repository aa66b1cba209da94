use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

// Exercise models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub date_added: NaiveDateTime,
}

/// One row of an exercise list, with how many sessions included it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ExerciseListItem {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub completed_count: i64,
}

/// An active exercise as offered on the start-session form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SessionExercise {
    pub exercise_id: i64,
    pub name: String,
    #[sqlx(default)]
    pub completed: bool,
}

// Workout session models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SessionSummary {
    pub session_id: i64,
    pub exercise_count: i64,
    pub date_completed: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CompletedExercise {
    pub exercise_id: i64,
    pub name: String,
    pub date_completed: NaiveDateTime,
}

/// Which exercises a list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStatus {
    #[default]
    Active,
    Inactive,
    All,
}

impl ExerciseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseStatus::Active => "active",
            ExerciseStatus::Inactive => "inactive",
            ExerciseStatus::All => "all",
        }
    }

    /// The `active` column value this status filters on, `None` for all rows.
    pub fn active_flag(&self) -> Option<bool> {
        match self {
            ExerciseStatus::Active => Some(true),
            ExerciseStatus::Inactive => Some(false),
            ExerciseStatus::All => None,
        }
    }
}

impl FromStr for ExerciseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ExerciseStatus::Active),
            "inactive" => Ok(ExerciseStatus::Inactive),
            "all" => Ok(ExerciseStatus::All),
            other => Err(format!("unknown exercise status: {other}")),
        }
    }
}

impl fmt::Display for ExerciseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_exact() {
        assert_eq!("active".parse(), Ok(ExerciseStatus::Active));
        assert_eq!("inactive".parse(), Ok(ExerciseStatus::Inactive));
        assert_eq!("all".parse(), Ok(ExerciseStatus::All));
        assert!("Active".parse::<ExerciseStatus>().is_err());
        assert!("archived".parse::<ExerciseStatus>().is_err());
    }

    #[test]
    fn status_maps_to_active_flag() {
        assert_eq!(ExerciseStatus::Active.active_flag(), Some(true));
        assert_eq!(ExerciseStatus::Inactive.active_flag(), Some(false));
        assert_eq!(ExerciseStatus::All.active_flag(), None);
        assert_eq!(ExerciseStatus::Inactive.to_string(), "inactive");
    }
}
