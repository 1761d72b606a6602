//! Process Configuration
//!
//! Read once at startup. Parsing takes a key lookup function so tests never
//! touch the real environment.

use std::net::SocketAddr;
use std::time::Duration;

use auth::application::config::{
    CookieConfig, DEFAULT_RENEW_BEFORE, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOKEN_TTL,
};
use auth::{AuthConfig, SigningKey};
use storage::{BackendConfig, BackendKind, MongoConfig, PgConfig, StorageError};
use thiserror::Error;
use todo::TodoConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Accepted token lifetimes
const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;
const MIN_TOKEN_TTL_SECS: u64 = 60;
const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Backend(#[from] StorageError),
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub signing_key: SigningKey,
    pub backend: BackendConfig,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub token_ttl: Duration,
    pub renew_before: Duration,
    pub cookie_secure: bool,
    /// Empty means no CORS layer
    pub frontend_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get("SECRET_KEY").ok_or(ConfigError::Missing("SECRET_KEY"))?;
        let signing_key = SigningKey::new(secret).map_err(|_| ConfigError::Missing("SECRET_KEY"))?;

        let kind = match get("DB_TYPE") {
            Some(value) => value.parse::<BackendKind>()?,
            None => BackendKind::default(),
        };

        let backend = match kind {
            BackendKind::Document => {
                let uri = get("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?;
                let config = MongoConfig::new(uri);
                BackendConfig::Document(match get("MONGODB_DB") {
                    Some(database) => config.with_database(database),
                    None => config,
                })
            }
            BackendKind::Relational => {
                let uri = get("POSTGRES_URI").ok_or(ConfigError::Missing("POSTGRES_URI"))?;
                let config = PgConfig::new(uri);
                BackendConfig::Relational(match get("POSTGRES_MAX_CONNECTIONS") {
                    Some(value) => {
                        let max = parse_number::<u32>("POSTGRES_MAX_CONNECTIONS", &value)?;
                        if max == 0 {
                            return Err(ConfigError::invalid(
                                "POSTGRES_MAX_CONNECTIONS",
                                &value,
                                "must be at least 1",
                            ));
                        }
                        config.with_max_connections(max)
                    }
                    None => config,
                })
            }
        };

        let bind_addr = {
            let value = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
            value
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::invalid("BIND_ADDR", &value, e))?
        };

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs = parse_number::<u64>("REQUEST_TIMEOUT_SECS", &value)?;
                if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&secs) {
                    return Err(ConfigError::invalid(
                        "REQUEST_TIMEOUT_SECS",
                        &value,
                        format!("must be between 1 and {MAX_REQUEST_TIMEOUT_SECS}"),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let token_ttl = match get("TOKEN_TTL_SECS") {
            Some(value) => {
                let secs = parse_number::<u64>("TOKEN_TTL_SECS", &value)?;
                if !(MIN_TOKEN_TTL_SECS..=MAX_TOKEN_TTL_SECS).contains(&secs) {
                    return Err(ConfigError::invalid(
                        "TOKEN_TTL_SECS",
                        &value,
                        format!("must be between {MIN_TOKEN_TTL_SECS} and {MAX_TOKEN_TTL_SECS}"),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TOKEN_TTL,
        };

        let renew_before = match get("TOKEN_RENEW_BEFORE_SECS") {
            Some(value) => {
                let renew = Duration::from_secs(parse_number("TOKEN_RENEW_BEFORE_SECS", &value)?);
                if renew >= token_ttl {
                    return Err(ConfigError::invalid(
                        "TOKEN_RENEW_BEFORE_SECS",
                        &value,
                        "must be shorter than the token lifetime",
                    ));
                }
                renew
            }
            // Keep the default renewal window inside a shortened lifetime
            None => DEFAULT_RENEW_BEFORE.min(token_ttl / 4),
        };

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(value) => parse_bool("COOKIE_SECURE", &value)?,
            None => false,
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            signing_key,
            backend,
            bind_addr,
            request_timeout,
            token_ttl,
            renew_before,
            cookie_secure,
            frontend_origins,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            signing_key: self.signing_key.clone(),
            token_ttl: self.token_ttl,
            renew_before: self.renew_before,
            request_timeout: self.request_timeout,
            cookie: CookieConfig {
                secure: self.cookie_secure,
                ..CookieConfig::default()
            },
        }
    }

    pub fn todo_config(&self) -> TodoConfig {
        TodoConfig {
            request_timeout: self.request_timeout,
        }
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, value, e))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected true or false")),
    }
}
