/// gRPC Configuration
///
/// Backend endpoints and transport settings for the gateway's outgoing
/// calls, loaded from environment variables with development defaults.
use std::env;
use std::time::Duration;

use thiserror::Error;
use tonic::transport::Endpoint;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct GrpcConfig {
    /// Identity service endpoint
    pub identity_service_url: String,

    /// Integration service endpoint
    pub integration_service_url: String,

    /// Workflow service endpoint
    pub workflow_service_url: String,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Per-call timeout. Unset means calls wait as long as the backend takes.
    pub request_timeout_secs: Option<u64>,

    /// HTTP/2 keep-alive interval in seconds
    pub keepalive_interval_secs: u64,

    /// Shared key presented to backends that require one
    pub internal_api_key: Option<String>,
}

impl std::fmt::Debug for GrpcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcConfig")
            .field("identity_service_url", &self.identity_service_url)
            .field("integration_service_url", &self.integration_service_url)
            .field("workflow_service_url", &self.workflow_service_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("keepalive_interval_secs", &self.keepalive_interval_secs)
            .field(
                "internal_api_key",
                &self.internal_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        _ => Ok(None),
    }
}

impl GrpcConfig {
    /// Load configuration from environment variables
    /// Falls back to defaults for development
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            identity_service_url: env::var("IDENTITY_SERVICE_URL")
                .unwrap_or_else(|_| "http://identity-service:50051".to_string()),
            integration_service_url: env::var("INTEGRATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://integration-service:50052".to_string()),
            workflow_service_url: env::var("WORKFLOW_SERVICE_URL")
                .unwrap_or_else(|_| "http://workflow-service:50053".to_string()),
            connect_timeout_secs: parse_var("GRPC_CONNECT_TIMEOUT_SECS")?.unwrap_or(5),
            request_timeout_secs: parse_var("GRPC_REQUEST_TIMEOUT_SECS")?,
            keepalive_interval_secs: parse_var("GRPC_KEEPALIVE_INTERVAL_SECS")?.unwrap_or(30),
            internal_api_key: env::var("INTERNAL_GRPC_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        })
    }

    /// Configuration for development/testing
    pub fn development() -> Self {
        Self {
            identity_service_url: "http://127.0.0.1:50051".to_string(),
            integration_service_url: "http://127.0.0.1:50052".to_string(),
            workflow_service_url: "http://127.0.0.1:50053".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: None,
            keepalive_interval_secs: 30,
            internal_api_key: None,
        }
    }

    /// Build a tonic Endpoint from URL with timeouts and keep-alive
    pub fn make_endpoint(&self, url: &str) -> Result<Endpoint, ConfigError> {
        let mut endpoint = Endpoint::from_shared(url.to_string())
            .map_err(|source| ConfigError::InvalidEndpoint {
                url: url.to_string(),
                source,
            })?
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .http2_keep_alive_interval(Duration::from_secs(self.keepalive_interval_secs))
            .tcp_nodelay(true);

        if let Some(secs) = self.request_timeout_secs {
            endpoint = endpoint.timeout(Duration::from_secs(secs));
        }

        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "IDENTITY_SERVICE_URL",
            "INTEGRATION_SERVICE_URL",
            "WORKFLOW_SERVICE_URL",
            "GRPC_CONNECT_TIMEOUT_SECS",
            "GRPC_REQUEST_TIMEOUT_SECS",
            "GRPC_KEEPALIVE_INTERVAL_SECS",
            "INTERNAL_GRPC_API_KEY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_have_no_request_timeout() {
        clear_env();
        let config = GrpcConfig::from_env().unwrap();

        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.connect_timeout_secs, 5);
        assert!(config.internal_api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_overrides_from_env() {
        clear_env();
        env::set_var("WORKFLOW_SERVICE_URL", "http://localhost:7000");
        env::set_var("GRPC_REQUEST_TIMEOUT_SECS", "12");
        env::set_var("INTERNAL_GRPC_API_KEY", "mesh");

        let config = GrpcConfig::from_env().unwrap();
        assert_eq!(config.workflow_service_url, "http://localhost:7000");
        assert_eq!(config.request_timeout_secs, Some(12));
        assert_eq!(config.internal_api_key.as_deref(), Some("mesh"));
        assert!(!format!("{config:?}").contains("mesh"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_an_error() {
        clear_env();
        env::set_var("GRPC_CONNECT_TIMEOUT_SECS", "soon");

        assert!(matches!(
            GrpcConfig::from_env(),
            Err(ConfigError::InvalidValue { key: "GRPC_CONNECT_TIMEOUT_SECS", .. })
        ));

        clear_env();
    }

    #[test]
    fn test_make_endpoint_rejects_garbage() {
        let config = GrpcConfig::development();
        assert!(config.make_endpoint("not a uri").is_err());
        assert!(config.make_endpoint("http://127.0.0.1:1").is_ok());
    }
}
