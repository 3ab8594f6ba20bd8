//! Configuration management for Identity Service
//!
//! Loads settings from environment variables, with a `.env` file honoured
//! in debug builds.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use crypto_core::SigningSecret;
use doc_store::StoreConfig;
use tracing::info;

pub const SERVICE_NAME: &str = "identity-service";

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreConfig,
    pub jwt: JwtSettings,
    /// Shared key gateway calls must present; `None` disables the check
    pub internal_api_key: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        Ok(Settings {
            server: ServerSettings::from_env()?,
            store: StoreConfig::from_env(SERVICE_NAME).context("Invalid store configuration")?,
            jwt: JwtSettings::from_env()?,
            internal_api_key: env::var("INTERNAL_GRPC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "50051".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("Invalid server address")
    }
}

/// Token signing settings. The secret is shared with the gateway.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: SigningSecret,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        let raw = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        Ok(Self {
            secret: SigningSecret::new(raw).context("JWT_SECRET is unusable")?,
        })
    }
}
