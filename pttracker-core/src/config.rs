use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed local database used outside production.
pub const LOCAL_DATABASE_URL: &str = "sqlite://pttracker.db";
pub const TEST_DATABASE_URL: &str = "sqlite://pttracker_test.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:4567";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when running in production")]
    MissingDatabaseUrl,
    #[error("unknown environment {0:?} (expected development, production or test)")]
    UnknownEnvironment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    pub bind: String,
}

impl Config {
    /// Production reads its connection string from the environment; every
    /// other environment falls back to a fixed local database.
    pub fn resolve(
        environment: Environment,
        database_url: Option<String>,
        bind: Option<String>,
    ) -> Result<Self, ConfigError> {
        let database_url = match (environment, database_url.filter(|u| !u.trim().is_empty())) {
            (_, Some(url)) => url,
            (Environment::Production, None) => return Err(ConfigError::MissingDatabaseUrl),
            (Environment::Development, None) => LOCAL_DATABASE_URL.to_string(),
            (Environment::Test, None) => TEST_DATABASE_URL.to_string(),
        };

        Ok(Self {
            environment,
            database_url,
            bind: bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
        })
    }
}
