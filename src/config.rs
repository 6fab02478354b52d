use std::env;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::middleware::csrf::CsrfConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration. Defaults suit local development; every field can
/// be overridden from the environment.
///
/// | Env Var              | Default             |
/// |----------------------|---------------------|
/// | `DATABASE_URL`       | `sqlite://todos.db` |
/// | `HOST`               | `127.0.0.1`         |
/// | `PORT`               | `3000`              |
/// | `DB_MAX_CONNECTIONS` | `5`                 |
/// | `CORS_ORIGINS`       | `*`                 |
/// | `CSRF_ENABLED`       | `true`              |
/// | `CSRF_SECRET`        | random per process  |
/// | `CSRF_EXEMPT_PATHS`  | `/todos`            |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
    pub csrf: CsrfConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://todos.db".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_connections: 5,
            cors_origins: vec!["*".to_string()],
            csrf: CsrfConfig {
                enabled: true,
                secret: Uuid::new_v4().simple().to_string(),
                exempt_paths: vec!["/todos".to_string()],
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parse_var("PORT", "a port number", defaults.port)?;
        let max_connections =
            parse_var("DB_MAX_CONNECTIONS", "a positive integer", defaults.max_connections)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }
        let cors_origins = list_var("CORS_ORIGINS").unwrap_or(defaults.cors_origins);

        let csrf = CsrfConfig {
            enabled: parse_var("CSRF_ENABLED", "true or false", defaults.csrf.enabled)?,
            secret: env::var("CSRF_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.csrf.secret),
            exempt_paths: list_var("CSRF_EXEMPT_PATHS").unwrap_or(defaults.csrf.exempt_paths),
        };

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            cors_origins,
            csrf,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, expected, value }),
        Err(_) => Ok(default),
    }
}

fn list_var(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|value| {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
