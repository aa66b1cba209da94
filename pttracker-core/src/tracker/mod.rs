//! The tracker ties input rules to the persistence operations.
//!
//! A `Tracker` owns the pool and is handed to whatever serves requests; it
//! holds no per-request state.

mod exercises;
mod workouts;

pub use exercises::ExerciseDetails;
pub use workouts::{CompletedSession, Totals};

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

#[derive(Debug, Clone)]
pub struct Tracker {
    pub db_pool: SqlitePool,
}

impl Tracker {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(&config.database_url).await?;
        Ok(Self::new(pool))
    }

    pub async fn in_memory() -> Result<Self> {
        Ok(Self::new(db::connect_in_memory().await?))
    }
}
