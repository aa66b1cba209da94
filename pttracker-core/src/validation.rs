//! Input rules shared by the create, update and session-completion paths.

use crate::error::{Result, TrackerError};

pub const MAX_NAME_CHARS: usize = 254;

/// Form value marking an exercise as checked on the session form.
pub const CHECKED_MARKER: &str = "t";

pub fn validate_name_length(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(TrackerError::NameLength);
    }
    Ok(())
}

/// `existing` must already exclude the exercise being edited.
pub fn ensure_unique_name(name: &str, existing: &[String]) -> Result<()> {
    let wanted = name.to_lowercase();
    if existing.iter().any(|n| n.to_lowercase() == wanted) {
        return Err(TrackerError::DuplicateName(name.to_string()));
    }
    Ok(())
}

/// Exercise ids checked on a session form, in submission order and without
/// repeats. Keys that are not integer ids are skipped.
pub fn checked_exercise_ids<'a, I>(fields: I) -> Vec<i64>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut ids = Vec::new();
    for (key, value) in fields {
        if value != CHECKED_MARKER {
            continue;
        }
        if let Some(id) = parse_id(key) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
