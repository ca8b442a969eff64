use std::{env, path::PathBuf, str::FromStr};

use chrono::Duration;
use log::warn;
use radio_collab::{SurrealOptions, Tokens};
use radio_server::{ServerConfig, DEFAULT_PORT};
use thiserror::Error;

/// Used when `RADIO_JWT_SECRET` is not set. Anyone can forge tokens with it.
pub const INSECURE_JWT_SECRET: &str = "dev-secret-change-me";
const INSECURE_DATABASE_USER: &str = "root";
const INSECURE_DATABASE_PASS: &str = "root";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where songs and users are kept
#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    /// In-process, lost on exit
    Memory,
    Surreal(SurrealOptions),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a variable if it is set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = parse(&get, "RADIO_SERVER_PORT", "a port number")?.unwrap_or(DEFAULT_PORT);
        let token_ttl_in_days = parse(&get, "RADIO_TOKEN_TTL_DAYS", "a number of days")?
            .unwrap_or(Tokens::DEFAULT_TTL_IN_DAYS);

        let token_ttl = Duration::try_days(token_ttl_in_days)
            .filter(|_| (1..=Tokens::MAX_TTL_IN_DAYS).contains(&token_ttl_in_days))
            .ok_or(ConfigError::Invalid {
                key: "RADIO_TOKEN_TTL_DAYS",
                expected: "between 1 and 3650 days",
                value: token_ttl_in_days.to_string(),
            })?;

        let static_dir = get("RADIO_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| ServerConfig::default().static_dir);

        let database = match get("RADIO_DATABASE_URL") {
            None => DatabaseConfig::Memory,
            Some(url) if url.eq_ignore_ascii_case("memory") => DatabaseConfig::Memory,
            Some(url) => DatabaseConfig::Surreal(SurrealOptions {
                url,
                username: get("RADIO_DATABASE_USER")
                    .unwrap_or_else(|| INSECURE_DATABASE_USER.to_string()),
                password: get("RADIO_DATABASE_PASS")
                    .unwrap_or_else(|| INSECURE_DATABASE_PASS.to_string()),
                namespace: get("RADIO_DATABASE_NS").unwrap_or_else(|| "radio".to_string()),
                database: get("RADIO_DATABASE_DB").unwrap_or_else(|| "main".to_string()),
            }),
        };

        Ok(Self {
            server: ServerConfig { port, static_dir },
            database,
            jwt_secret: get("RADIO_JWT_SECRET").unwrap_or_else(|| INSECURE_JWT_SECRET.to_string()),
            token_ttl,
        })
    }

    /// Logs a warning for every setting that falls back to an unsafe default
    pub fn warn_insecure_defaults(&self) {
        if self.jwt_secret == INSECURE_JWT_SECRET {
            warn!("RADIO_JWT_SECRET is not set, tokens are signed with a public default secret. Do not use this in production!");
        }

        match &self.database {
            DatabaseConfig::Memory => {
                warn!("RADIO_DATABASE_URL is not set, using an in-memory database. Nothing will be persisted!")
            }
            DatabaseConfig::Surreal(options) => {
                if options.username == INSECURE_DATABASE_USER
                    && options.password == INSECURE_DATABASE_PASS
                {
                    warn!("Connecting to the database with default root credentials. Do not use this in production!");
                }
            }
        }
    }
}

fn parse<T, G>(get: &G, key: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
                key,
                expected,
                value,
            })
        })
        .transpose()
}
