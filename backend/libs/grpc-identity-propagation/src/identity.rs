//! Caller identifier carried across the service boundary

use std::fmt;
use tonic::Status;

/// A caller identifier recovered from a verified bearer token.
///
/// Construction trims surrounding whitespace and rejects blank or
/// non-ASCII values; gRPC ASCII metadata cannot carry anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(String);

impl CallerId {
    pub fn parse(raw: &str) -> Result<Self, Status> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Status::unauthenticated("caller identity is empty"));
        }
        if !trimmed.is_ascii() || trimmed.chars().any(|c| c.is_ascii_control()) {
            return Err(Status::unauthenticated("caller identity is not valid ASCII"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let caller = CallerId::parse("  alice \n").unwrap();
        assert_eq!(caller.as_str(), "alice");
    }

    #[test]
    fn test_parse_rejects_blank() {
        let status = CallerId::parse("   ").unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_parse_rejects_non_ascii() {
        assert!(CallerId::parse("ålice").is_err());
        assert!(CallerId::parse("ali\u{7}ce").is_err());
    }
}
