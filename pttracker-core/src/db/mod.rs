pub mod models;
pub mod operations;

use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Opens the process-wide pool for `database_url` and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url {database_url:?}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open database {database_url:?}"))?;

    info!("Connected to {}", database_url);
    init_database(&pool).await?;
    Ok(pool)
}

/// In-memory database with the full schema applied.
///
/// Pinned to a single connection that never expires: every new connection to
/// `sqlite::memory:` would see its own empty database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory database")?;

    init_database(&pool).await?;
    Ok(pool)
}

struct Migration {
    name: &'static str,
    up_sql: &'static str,
}

const MIGRATION_2026_10_16_090000_0000_SETUP_TABLES: &str =
    include_str!("../../../migrations/2026-10-16-090000-0000_setup_tables/up.sql");

const MIGRATIONS: &[Migration] = &[Migration {
    name: "2026-10-16-090000-0000_setup_tables",
    up_sql: MIGRATION_2026_10_16_090000_0000_SETUP_TABLES,
}];

async fn init_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER NOT NULL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s','now') AS INTEGER))
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn is_migration_applied(pool: &SqlitePool, migration_name: &str) -> Result<bool> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations WHERE name = ?1")
        .bind(migration_name)
        .fetch_one(pool)
        .await?;
    Ok(applied > 0)
}

fn parse_sql_statements(sql: &str) -> Vec<String> {
    sql.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("--")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Runs one migration and records it in `_migrations` as a single
/// transaction, so a failing statement leaves neither schema changes nor a
/// record behind.
async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in parse_sql_statements(migration.up_sql) {
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {} failed at: {}", migration.name, statement))?;
    }

    sqlx::query("INSERT INTO _migrations (name) VALUES (?1)")
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit()
        .await
        .with_context(|| format!("failed to commit migration {}", migration.name))
}

pub async fn init_database(pool: &SqlitePool) -> Result<()> {
    init_migrations_table(pool).await?;

    for migration in MIGRATIONS {
        if is_migration_applied(pool, migration.name).await? {
            debug!("Migration {} already applied", migration.name);
            continue;
        }

        info!("Applying migration {}", migration.name);
        apply_migration(pool, migration).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_lines_and_blank_statements_are_dropped() {
        let sql = "-- header\nCREATE TABLE a (x INTEGER);\n\n-- note\nCREATE TABLE b (y TEXT);\n;";
        let statements = parse_sql_statements(sql);
        assert_eq!(
            statements,
            vec!["CREATE TABLE a (x INTEGER)", "CREATE TABLE b (y TEXT)"]
        );
    }

    #[tokio::test]
    async fn failed_migration_leaves_nothing_behind() {
        let pool = connect_in_memory().await.unwrap();
        let broken = Migration {
            name: "broken",
            up_sql: "CREATE TABLE half_done (x INTEGER);\nINSERT INTO no_such_table VALUES (1);",
        };

        assert!(apply_migration(&pool, &broken).await.is_err());
        assert!(!is_migration_applied(&pool, "broken").await.unwrap());

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'half_done'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 0);
    }

    #[tokio::test]
    async fn migrations_are_applied_once() {
        let pool = connect_in_memory().await.unwrap();
        init_database(&pool).await.unwrap();

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
             AND name IN ('exercises', 'exercises_completed', 'session_id_seq')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 3);
    }
}
