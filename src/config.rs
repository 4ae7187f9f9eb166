//! Service configuration loaded from environment variables.
//!
//! `DATABASE_URL` wins when set. Otherwise the connection string is built from
//! `DB_PASS` (required), `DB_USER` (default `IntervalServer`) and `DB_HOST`
//! (default `cluster0.sju0f.mongodb.net`):
//!
//! ```bash
//! export DB_PASS="secret"
//! ```
//!
//! Optional: `HOST` (default `0.0.0.0`), `PORT` (default `5000`), `DB_NAME`
//! (default `Interval`), `USERS_COLLECTION` (default `users`),
//! `RESORTS_COLLECTION` (default `AllResorts`), `RUST_LOG` (default `info`).

use std::env;
use std::fmt;

const DEFAULT_DB_HOST: &str = "cluster0.sju0f.mongodb.net";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub users_collection: String,
    pub resorts_collection: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => 5000,
        };

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let user = or("DB_USER", "IntervalServer");
                let pass = get("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?;
                let host = or("DB_HOST", DEFAULT_DB_HOST);
                format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                    user, pass, host
                )
            }
        };

        Ok(Self {
            host: or("HOST", "0.0.0.0"),
            port,
            database_url,
            database_name: or("DB_NAME", "Interval"),
            users_collection: or("USERS_COLLECTION", "users"),
            resorts_collection: or("RESORTS_COLLECTION", "AllResorts"),
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
