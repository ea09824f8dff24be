//! Process configuration read from environment variables.

use thiserror::Error;

use cms_persistence::pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

const DEV_CSRF_SECRET: &str = "dev-csrf-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub csrf_secret: String,
    pub default_page_size: u32,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// `false` keeps everything in process memory.
    pub use_persistent: bool,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            csrf_secret: DEV_CSRF_SECRET.to_string(),
            default_page_size: DEFAULT_PER_PAGE,
            storage: StorageConfig {
                use_persistent: false,
                database_url: None,
                max_connections: 10,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (environment, maps in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let csrf_secret = match lookup("CSRF_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ => {
                tracing::warn!("CSRF_SECRET not set; using insecure dev default");
                defaults.csrf_secret
            }
        };

        let default_page_size: u32 = parse_or(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        if default_page_size == 0 || default_page_size > MAX_PER_PAGE {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_SIZE",
                value: default_page_size.to_string(),
            });
        }

        let use_persistent = parse_or(&lookup, "USE_PERSISTENT_STORES", false)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if use_persistent && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.server.host),
                port: parse_or(&lookup, "PORT", defaults.server.port)?,
            },
            csrf_secret,
            default_page_size,
            storage: StorageConfig {
                use_persistent,
                database_url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.storage.max_connections)?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn values_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("CSRF_SECRET", "s3cret"),
            ("DEFAULT_PAGE_SIZE", "50"),
        ]))
        .unwrap();
        assert_eq!(config.server_address(), "127.0.0.1:9000");
        assert_eq!(config.csrf_secret, "s3cret");
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn page_size_must_be_in_range() {
        assert!(AppConfig::from_lookup(lookup(&[("DEFAULT_PAGE_SIZE", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("DEFAULT_PAGE_SIZE", "101")])).is_err());
    }

    #[test]
    fn persistent_storage_requires_database_url() {
        let err = AppConfig::from_lookup(lookup(&[("USE_PERSISTENT_STORES", "true")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let config = AppConfig::from_lookup(lookup(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/cms"),
        ]))
        .unwrap();
        assert!(config.storage.use_persistent);
    }
}
