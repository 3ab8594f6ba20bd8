//! Configuration management for Integration Service

use std::env;
use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use doc_store::StoreConfig;
use tracing::info;

pub const SERVICE_NAME: &str = "integration-service";

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub store: StoreConfig,
    pub events: EventBusSettings,
    pub internal_api_key: Option<String>,
}

/// Where `integration_created` events go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventBusSettings {
    Redis { url: String },
    /// Keep events in process (development only)
    Memory,
}

impl EventBusSettings {
    fn from_env() -> Result<Self> {
        let backend = env::var("EVENT_BUS_BACKEND").unwrap_or_else(|_| "redis".to_string());
        match backend.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis {
                url: env::var("REDIS_URL").context("REDIS_URL must be set")?,
            }),
            "memory" => Ok(Self::Memory),
            other => bail!("Invalid EVENT_BUS_BACKEND: {other}"),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "50052".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            addr: format!("{host}:{port}")
                .parse()
                .context("Invalid server address")?,
            store: StoreConfig::from_env(SERVICE_NAME).context("Invalid store configuration")?,
            events: EventBusSettings::from_env()?,
            internal_api_key: env::var("INTERNAL_GRPC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["SERVER_PORT", "STORE_BACKEND", "EVENT_BUS_BACKEND", "REDIS_URL"] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_redis_bus_requires_url() {
        clear_env();
        env::set_var("STORE_BACKEND", "memory");

        let err = Settings::load().unwrap_err();
        assert!(err.to_string().contains("REDIS_URL"));

        env::set_var("REDIS_URL", "redis://localhost:6379");
        let settings = Settings::load().unwrap();
        assert_eq!(
            settings.events,
            EventBusSettings::Redis {
                url: "redis://localhost:6379".into()
            }
        );
        assert_eq!(settings.addr.port(), 50052);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_memory_bus() {
        clear_env();
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("EVENT_BUS_BACKEND", "memory");

        assert_eq!(Settings::load().unwrap().events, EventBusSettings::Memory);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_bus_rejected() {
        clear_env();
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("EVENT_BUS_BACKEND", "kafka");

        assert!(Settings::load().is_err());
        clear_env();
    }
}
