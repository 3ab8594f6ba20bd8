//! Error types for event publication

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    /// Redis connection or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The bus refused the message
    #[error("Publish rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PublishError::Configuration("EVENT_BUS_URL is empty".into());
        assert_eq!(err.to_string(), "Configuration error: EVENT_BUS_URL is empty");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PublishError = json_err.into();
        assert!(matches!(err, PublishError::Serialization(_)));
    }
}
