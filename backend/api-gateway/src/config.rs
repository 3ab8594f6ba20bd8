//! Configuration for API Gateway
//!
//! Loads settings from environment variables, with a `.env` file honoured
//! in debug builds. `JWT_SECRET` is the only required value.

use std::env;

use anyhow::{bail, Context, Result};
use crypto_core::SigningSecret;
use grpc_clients::GrpcConfig;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Secret shared with the identity service; verifies bearer tokens
    pub jwt_secret: SigningSecret,

    /// Backend endpoints
    pub grpc: GrpcConfig,

    /// Where `/docs` objects live
    pub storage: StorageConfig,

    /// Public base URL used to build upload links
    pub gateway_address: String,

    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; `None` lets actix pick one per core
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    S3 {
        region: Option<String>,
        /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
        endpoint: Option<String>,
    },
    /// Objects kept in process memory (development only)
    Memory,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl StorageConfig {
    fn from_env() -> Result<Self> {
        let backend = env::var("OBJECT_STORE_BACKEND").unwrap_or_else(|_| "s3".to_string());
        match backend.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3 {
                region: non_empty("AWS_REGION"),
                endpoint: non_empty("S3_ENDPOINT"),
            }),
            "memory" => Ok(Self::Memory),
            other => bail!("Invalid OBJECT_STORE_BACKEND: {other}"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let port = env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());
        let workers = match non_empty("SERVER_WORKERS") {
            Some(w) => Some(w.parse().context("Invalid SERVER_WORKERS")?),
            None => None,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: port.parse().context("Invalid SERVER_PORT")?,
                workers,
            },
            jwt_secret: SigningSecret::new(secret).context("JWT_SECRET is unusable")?,
            grpc: GrpcConfig::from_env().context("Invalid gRPC client configuration")?,
            storage: StorageConfig::from_env()?,
            gateway_address: env::var("GATEWAY_ADDRESS")
                .unwrap_or_else(|_| format!("http://localhost:{port}"))
                .trim_end_matches('/')
                .to_string(),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
