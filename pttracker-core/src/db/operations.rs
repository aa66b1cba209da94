//! One function per persistence operation. Each issues a single parameterized
//! statement, except the session saves which insert one row per exercise.

use chrono::Utc;
use log::debug;
use sqlx::{Result, SqlitePool};

use crate::db::models::{
    CompletedExercise, Exercise, ExerciseListItem, ExerciseStatus, SessionExercise,
    SessionSummary,
};

// Exercises
pub async fn list_exercises(
    pool: &SqlitePool,
    status: ExerciseStatus,
) -> Result<Vec<ExerciseListItem>> {
    debug!("list_exercises status={}", status);
    let sql = match status {
        ExerciseStatus::Active | ExerciseStatus::Inactive => {
            "SELECT e.id, e.name, e.active, COUNT(c.exercise_id) AS completed_count
             FROM exercises e
             LEFT JOIN exercises_completed c ON c.exercise_id = e.id
             WHERE e.active = ?1
             GROUP BY e.id
             ORDER BY e.name COLLATE NOCASE"
        }
        ExerciseStatus::All => {
            "SELECT e.id, e.name, e.active, COUNT(c.exercise_id) AS completed_count
             FROM exercises e
             LEFT JOIN exercises_completed c ON c.exercise_id = e.id
             GROUP BY e.id
             ORDER BY e.active DESC, e.name COLLATE NOCASE"
        }
    };

    let mut query = sqlx::query_as::<sqlx::Sqlite, ExerciseListItem>(sql);
    if let Some(active) = status.active_flag() {
        query = query.bind(active);
    }
    query.fetch_all(pool).await
}

pub async fn add_exercise(pool: &SqlitePool, name: &str, description: &str) -> Result<Exercise> {
    debug!("add_exercise name={:?}", name);
    sqlx::query_as::<_, Exercise>(
        "INSERT INTO exercises (name, description, date_added) VALUES (?1, ?2, ?3)
         RETURNING id, name, description, active, date_added",
    )
    .bind(name)
    .bind(description)
    .bind(Utc::now().naive_utc())
    .fetch_one(pool)
    .await
}

/// Every stored exercise name, skipping `excluding` when one is given.
pub async fn exercise_names(pool: &SqlitePool, excluding: Option<i64>) -> Result<Vec<String>> {
    debug!("exercise_names excluding={:?}", excluding);
    sqlx::query_scalar::<_, String>("SELECT name FROM exercises WHERE ?1 IS NULL OR id <> ?1")
        .bind(excluding)
        .fetch_all(pool)
        .await
}

pub async fn update_exercise_status(pool: &SqlitePool, active: bool, id: i64) -> Result<u64> {
    debug!("update_exercise_status id={} active={}", id, active);
    let result = sqlx::query("UPDATE exercises SET active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Flips the active flag in place and returns the new value, or `None` when no
/// exercise has that id.
pub async fn toggle_exercise_status(pool: &SqlitePool, id: i64) -> Result<Option<bool>> {
    debug!("toggle_exercise_status id={}", id);
    sqlx::query_scalar::<_, bool>(
        "UPDATE exercises SET active = NOT active WHERE id = ?1 RETURNING active",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_exercise_data(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    description: &str,
) -> Result<u64> {
    debug!("update_exercise_data id={} name={:?}", id, name);
    let result = sqlx::query("UPDATE exercises SET name = ?1, description = ?2 WHERE id = ?3")
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn exercise_id_exists(pool: &SqlitePool, id: i64) -> Result<bool> {
    debug!("exercise_id_exists id={}", id);
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises WHERE id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found > 0)
}

/// Deletes the exercise only while it has no completion records.
/// Returns the number of rows removed, so 0 means missing or still referenced.
pub async fn delete_exercise(pool: &SqlitePool, id: i64) -> Result<u64> {
    debug!("delete_exercise id={}", id);
    let result = sqlx::query(
        "DELETE FROM exercises
         WHERE id = ?1
           AND NOT EXISTS (SELECT 1 FROM exercises_completed WHERE exercise_id = ?1)",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn single_exercise_info(pool: &SqlitePool, id: i64) -> Result<Option<Exercise>> {
    debug!("single_exercise_info id={}", id);
    sqlx::query_as::<_, Exercise>(
        "SELECT id, name, description, active, date_added FROM exercises WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn single_exercise_completed_count(pool: &SqlitePool, id: i64) -> Result<i64> {
    debug!("single_exercise_completed_count id={}", id);
    sqlx::query_scalar("SELECT COUNT(*) FROM exercises_completed WHERE exercise_id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn total_exercise_count(pool: &SqlitePool) -> Result<i64> {
    debug!("total_exercise_count");
    sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
        .fetch_one(pool)
        .await
}

// Workout sessions
pub async fn session_exercise_list(pool: &SqlitePool) -> Result<Vec<SessionExercise>> {
    debug!("session_exercise_list");
    sqlx::query_as::<_, SessionExercise>(
        "SELECT id AS exercise_id, name FROM exercises
         WHERE active = 1
         ORDER BY name COLLATE NOCASE",
    )
    .fetch_all(pool)
    .await
}

/// Draws the next session id. SQLite serializes writers, so concurrent callers
/// never receive the same value and later draws are always larger.
pub async fn next_session_id(pool: &SqlitePool) -> Result<i64> {
    let result = sqlx::query("INSERT INTO session_id_seq (drawn_at) VALUES (?1)")
        .bind(Utc::now().naive_utc())
        .execute(pool)
        .await?;
    let id = result.last_insert_rowid();
    debug!("next_session_id -> {}", id);
    Ok(id)
}

/// Inserts one completion record per exercise inside a single transaction.
/// Either every record is written or none is.
pub async fn save_workout_session(
    pool: &SqlitePool,
    exercise_ids: &[i64],
    session_id: i64,
) -> Result<u64> {
    let completed_at = Utc::now().naive_utc();
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for &exercise_id in exercise_ids {
        inserted += sqlx::query(
            "INSERT INTO exercises_completed (exercise_id, session_id, date_completed)
             VALUES (?1, ?2, ?3)",
        )
        .bind(exercise_id)
        .bind(session_id)
        .bind(completed_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    debug!(
        "save_workout_session session={} records={}",
        session_id, inserted
    );
    Ok(inserted)
}

/// Legacy save: one independent insert per exercise with no rollback, so a
/// failure partway through leaves the earlier records in place. Prefer
/// [`save_workout_session`].
pub async fn save_workout_session_per_row(
    pool: &SqlitePool,
    exercise_ids: &[i64],
    session_id: i64,
) -> Result<u64> {
    debug!(
        "save_workout_session_per_row session={} exercises={}",
        session_id,
        exercise_ids.len()
    );
    let mut inserted = 0;
    for &exercise_id in exercise_ids {
        inserted += sqlx::query(
            "INSERT INTO exercises_completed (exercise_id, session_id, date_completed)
             VALUES (?1, ?2, ?3)",
        )
        .bind(exercise_id)
        .bind(session_id)
        .bind(Utc::now().naive_utc())
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}

pub async fn session_history(pool: &SqlitePool) -> Result<Vec<SessionSummary>> {
    debug!("session_history");
    sqlx::query_as::<_, SessionSummary>(
        "SELECT session_id,
                COUNT(exercise_id) AS exercise_count,
                MIN(date_completed) AS date_completed
         FROM exercises_completed
         GROUP BY session_id
         ORDER BY session_id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn single_session(pool: &SqlitePool, session_id: i64) -> Result<Vec<CompletedExercise>> {
    debug!("single_session id={}", session_id);
    sqlx::query_as::<_, CompletedExercise>(
        "SELECT e.id AS exercise_id, e.name, c.date_completed
         FROM exercises_completed c
         JOIN exercises e ON e.id = c.exercise_id
         WHERE c.session_id = ?1
         ORDER BY e.name COLLATE NOCASE",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

pub async fn total_session_count(pool: &SqlitePool) -> Result<i64> {
    debug!("total_session_count");
    sqlx::query_scalar("SELECT COUNT(DISTINCT session_id) FROM exercises_completed")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    async fn seeded() -> (SqlitePool, i64, i64, i64) {
        let pool = connect_in_memory().await.unwrap();
        let squats = add_exercise(&pool, "Squats", "3x10").await.unwrap();
        let bridges = add_exercise(&pool, "bridges", "").await.unwrap();
        let clams = add_exercise(&pool, "Clamshells", "each side").await.unwrap();
        (pool, squats.id, bridges.id, clams.id)
    }

    #[tokio::test]
    async fn new_exercises_default_to_active() {
        let (pool, squats, _, _) = seeded().await;
        let exercise = single_exercise_info(&pool, squats).await.unwrap().unwrap();
        assert_eq!(exercise.name, "Squats");
        assert_eq!(exercise.description, "3x10");
        assert!(exercise.active);
    }

    #[tokio::test]
    async fn list_filters_by_flag_and_orders_by_name() {
        let (pool, squats, bridges, clams) = seeded().await;
        update_exercise_status(&pool, false, clams).await.unwrap();

        let active = list_exercises(&pool, ExerciseStatus::Active).await.unwrap();
        let ids: Vec<i64> = active.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![bridges, squats]);
        assert!(active.iter().all(|e| e.active));

        let inactive = list_exercises(&pool, ExerciseStatus::Inactive).await.unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].id, clams);

        let all = list_exercises(&pool, ExerciseStatus::All).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![bridges, squats, clams]);
    }

    #[tokio::test]
    async fn list_counts_completions_per_exercise() {
        let (pool, squats, bridges, _) = seeded().await;
        let first = next_session_id(&pool).await.unwrap();
        save_workout_session(&pool, &[squats, bridges], first).await.unwrap();
        let second = next_session_id(&pool).await.unwrap();
        save_workout_session(&pool, &[squats], second).await.unwrap();

        let all = list_exercises(&pool, ExerciseStatus::All).await.unwrap();
        let count_for = |id: i64| all.iter().find(|e| e.id == id).unwrap().completed_count;
        assert_eq!(count_for(squats), 2);
        assert_eq!(count_for(bridges), 1);
    }

    #[tokio::test]
    async fn exercise_names_can_exclude_one_id() {
        let (pool, squats, _, _) = seeded().await;
        let mut all = exercise_names(&pool, None).await.unwrap();
        all.sort();
        assert_eq!(all, vec!["Clamshells", "Squats", "bridges"]);

        let others = exercise_names(&pool, Some(squats)).await.unwrap();
        assert_eq!(others.len(), 2);
        assert!(!others.contains(&"Squats".to_string()));
    }

    #[tokio::test]
    async fn case_insensitive_unique_index_rejects_duplicates() {
        let (pool, _, _, _) = seeded().await;
        let err = add_exercise(&pool, "SQUATS", "").await.unwrap_err();
        let is_unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique);
    }

    #[tokio::test]
    async fn toggle_flips_in_a_single_statement() {
        let (pool, squats, _, _) = seeded().await;
        assert_eq!(toggle_exercise_status(&pool, squats).await.unwrap(), Some(false));
        assert_eq!(toggle_exercise_status(&pool, squats).await.unwrap(), Some(true));
        assert_eq!(toggle_exercise_status(&pool, 9999).await.unwrap(), None);

        let exercise = single_exercise_info(&pool, squats).await.unwrap().unwrap();
        assert!(exercise.active);
    }

    #[tokio::test]
    async fn session_ids_increase() {
        let pool = connect_in_memory().await.unwrap();
        let a = next_session_id(&pool).await.unwrap();
        let b = next_session_id(&pool).await.unwrap();
        let c = next_session_id(&pool).await.unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn delete_is_refused_while_completions_exist() {
        let (pool, squats, bridges, _) = seeded().await;
        let session = next_session_id(&pool).await.unwrap();
        save_workout_session(&pool, &[squats], session).await.unwrap();

        assert_eq!(delete_exercise(&pool, squats).await.unwrap(), 0);
        assert!(exercise_id_exists(&pool, squats).await.unwrap());

        assert_eq!(delete_exercise(&pool, bridges).await.unwrap(), 1);
        assert!(!exercise_id_exists(&pool, bridges).await.unwrap());
    }

    #[tokio::test]
    async fn transactional_save_rolls_back_on_failure() {
        let (pool, squats, _, _) = seeded().await;
        let session = next_session_id(&pool).await.unwrap();

        // 9999 violates the foreign key after squats was inserted
        let result = save_workout_session(&pool, &[squats, 9999], session).await;
        assert!(result.is_err());
        assert!(single_session(&pool, session).await.unwrap().is_empty());
        assert_eq!(single_exercise_completed_count(&pool, squats).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn per_row_save_keeps_rows_written_before_a_failure() {
        let (pool, squats, _, _) = seeded().await;
        let session = next_session_id(&pool).await.unwrap();

        let result = save_workout_session_per_row(&pool, &[squats, 9999], session).await;
        assert!(result.is_err());
        assert_eq!(single_session(&pool, session).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn history_and_single_session_views() {
        let (pool, squats, bridges, clams) = seeded().await;
        let first = next_session_id(&pool).await.unwrap();
        save_workout_session(&pool, &[squats, bridges, clams], first)
            .await
            .unwrap();
        let second = next_session_id(&pool).await.unwrap();
        save_workout_session(&pool, &[bridges], second).await.unwrap();

        let history = session_history(&pool).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].session_id, second);
        assert_eq!(history[0].exercise_count, 1);
        assert_eq!(history[1].session_id, first);
        assert_eq!(history[1].exercise_count, 3);

        let names: Vec<String> = single_session(&pool, first)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["bridges", "Clamshells", "Squats"]);

        assert_eq!(total_session_count(&pool).await.unwrap(), 2);
        assert_eq!(total_exercise_count(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn session_form_lists_only_active_exercises_unchecked() {
        let (pool, squats, bridges, clams) = seeded().await;
        update_exercise_status(&pool, false, squats).await.unwrap();

        let list = session_exercise_list(&pool).await.unwrap();
        let ids: Vec<i64> = list.iter().map(|e| e.exercise_id).collect();
        assert_eq!(ids, vec![bridges, clams]);
        assert!(list.iter().all(|e| !e.completed));
    }

    #[tokio::test]
    async fn update_data_changes_one_row() {
        let (pool, squats, _, _) = seeded().await;
        let changed = update_exercise_data(&pool, squats, "Wall squats", "2x15")
            .await
            .unwrap();
        assert_eq!(changed, 1);
        let exercise = single_exercise_info(&pool, squats).await.unwrap().unwrap();
        assert_eq!(exercise.name, "Wall squats");
        assert_eq!(exercise.description, "2x15");

        assert_eq!(update_exercise_data(&pool, 4242, "x", "").await.unwrap(), 0);
    }
}
