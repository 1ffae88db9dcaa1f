// Compound Search Service Configuration
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub host: String,
    pub port: u16,

    // Storage backend: Postgres when a URL is given, otherwise the seeded in-memory store
    pub database_url: Option<String>,
    pub seed_file: Option<PathBuf>,

    // Pool
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,

    pub cors_allowed_origin: Option<String>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Which store the service should be wired to at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres(String),
    Memory(PathBuf),
}

impl SearchConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,

            database_url: get("DATABASE_URL"),
            seed_file: get("COMPOUNDS_SEED_FILE").map(PathBuf::from),

            max_connections: get("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            acquire_timeout_secs: get("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("DB_ACQUIRE_TIMEOUT_SECS must be a number of seconds")?,

            cors_allowed_origin: get("CORS_ALLOWED_ORIGIN"),
            log_format: match get("LOG_FORMAT").as_deref() {
                None | Some("pretty") => LogFormat::Pretty,
                Some("json") => LogFormat::Json,
                Some(other) => bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
            },
        })
    }

    pub fn backend(&self) -> Result<StoreBackend> {
        match (&self.database_url, &self.seed_file) {
            (Some(url), _) => Ok(StoreBackend::Postgres(url.clone())),
            (None, Some(path)) => Ok(StoreBackend::Memory(path.clone())),
            (None, None) => bail!("Either DATABASE_URL or COMPOUNDS_SEED_FILE must be set"),
        }
    }
}
