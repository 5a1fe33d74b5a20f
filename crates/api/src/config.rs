use axum::http::HeaderValue;
use listings_core::listing_search::SearchMode;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. Without one the server keeps listings in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections (default: `10`).
    pub db_max_connections: u32,
    /// Whether a `search` term discards the other filters.
    pub search_mode: SearchMode,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:3001` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `DATABASE_URL`             | unset (in-memory store) |
    /// | `DB_MAX_CONNECTIONS`       | `10`                    |
    /// | `SEARCH_OVERRIDES_FILTERS` | `false`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");

        let port = var("PORT", "3000");
        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            var: "PORT",
            expected: "a valid u16",
            value: port,
        })?;

        let cors_origins = var("CORS_ORIGINS", "http://localhost:3001")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                // Credentialed CORS cannot use the wildcard origin.
                if origin == "*" {
                    return Err(ConfigError::Invalid {
                        var: "CORS_ORIGINS",
                        expected: "explicit origins (no '*')",
                        value: origin.to_string(),
                    });
                }
                origin.parse::<HeaderValue>().map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    expected: "a comma-separated list of origins",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let timeout = var("REQUEST_TIMEOUT_SECS", "30");
        let request_timeout_secs: u64 = timeout.parse().map_err(|_| ConfigError::Invalid {
            var: "REQUEST_TIMEOUT_SECS",
            expected: "a valid u64",
            value: timeout,
        })?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let max_conns = var("DB_MAX_CONNECTIONS", "10");
        let db_max_connections: u32 = max_conns
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                expected: "a positive integer",
                value: max_conns,
            })?;

        let overrides = var("SEARCH_OVERRIDES_FILTERS", "false");
        let search_mode = match overrides.to_ascii_lowercase().as_str() {
            "true" | "1" => SearchMode::SearchOverrides,
            "false" | "0" => SearchMode::Combined,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "SEARCH_OVERRIDES_FILTERS",
                    expected: "true or false",
                    value: overrides,
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            db_max_connections,
            search_mode,
        })
    }
}
