//! Store selection and Postgres pool configuration

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Which [`crate::DocumentStore`] implementation backs a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = StoreConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(StoreConfigError::Invalid {
                key: "STORE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

/// Database connection pool configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name used in log fields
    pub service_name: String,
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// New connection to PostgreSQL
    pub connect_timeout_secs: u64,
    /// Get a connection from the pool
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Apply bundled migrations at startup
    pub run_migrations: bool,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: String::from("unknown"),
            database_url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            run_migrations: true,
        }
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, StoreConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| StoreConfigError::Invalid { key, value: raw }),
        _ => Ok(default),
    }
}

impl DbConfig {
    pub fn from_env(service_name: &str) -> Result<Self, StoreConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| StoreConfigError::Missing("DATABASE_URL"))?;
        let defaults = Self::default();

        Ok(Self {
            service_name: service_name.to_string(),
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs)?,
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs)?,
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs)?,
            run_migrations: env_or("DB_RUN_MIGRATIONS", defaults.run_migrations)?,
        })
    }
}

/// Store selection for a service.
///
/// `STORE_BACKEND` defaults to `postgres`; `memory` keeps everything in
/// process and needs no database.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Memory,
    Postgres(DbConfig),
}

impl StoreConfig {
    pub fn from_env(service_name: &str) -> Result<Self, StoreConfigError> {
        match env_or("STORE_BACKEND", StoreBackend::Postgres)? {
            StoreBackend::Memory => Ok(Self::Memory),
            StoreBackend::Postgres => Ok(Self::Postgres(DbConfig::from_env(service_name)?)),
        }
    }

    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Memory => StoreBackend::Memory,
            Self::Postgres(_) => StoreBackend::Postgres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "STORE_BACKEND",
            "DATABASE_URL",
            "DB_MAX_CONNECTIONS",
            "DB_MIN_CONNECTIONS",
            "DB_RUN_MIGRATIONS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn backend_parsing() {
        assert_eq!("Postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!(" memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    #[serial]
    fn memory_backend_needs_no_database_url() {
        clear_env();
        std::env::set_var("STORE_BACKEND", "memory");

        let config = StoreConfig::from_env("test").unwrap();
        assert_eq!(config.backend(), StoreBackend::Memory);
        clear_env();
    }

    #[test]
    #[serial]
    fn postgres_backend_requires_database_url() {
        clear_env();
        assert!(matches!(
            StoreConfig::from_env("test"),
            Err(StoreConfigError::Missing("DATABASE_URL"))
        ));

        std::env::set_var("DATABASE_URL", "postgres://localhost/flowgrid");
        std::env::set_var("DB_MAX_CONNECTIONS", "4");
        match StoreConfig::from_env("test").unwrap() {
            StoreConfig::Postgres(db) => {
                assert_eq!(db.max_connections, 4);
                assert_eq!(db.min_connections, 2);
                assert!(db.run_migrations);
            }
            StoreConfig::Memory => panic!("expected postgres"),
        }
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_number_is_an_error() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/flowgrid");
        std::env::set_var("DB_MAX_CONNECTIONS", "lots");
        assert!(matches!(
            DbConfig::from_env("test"),
            Err(StoreConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. })
        ));
        clear_env();
    }

    #[test]
    fn debug_redacts_url() {
        let config = DbConfig {
            database_url: "postgres://user:hunter2@db/flowgrid".into(),
            ..DbConfig::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
