//! Configuration management for Workflow Service

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use doc_store::StoreConfig;
use tracing::info;

pub const SERVICE_NAME: &str = "workflow-service";

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub store: StoreConfig,
    pub internal_api_key: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "50053".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            addr: format!("{host}:{port}")
                .parse()
                .context("Invalid server address")?,
            store: StoreConfig::from_env(SERVICE_NAME).context("Invalid store configuration")?,
            internal_api_key: env::var("INTERNAL_GRPC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        })
    }
}
