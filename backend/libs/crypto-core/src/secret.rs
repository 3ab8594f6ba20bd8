/// Shared HMAC signing secret
///
/// Loaded once from configuration and shared read-only by every issuer and
/// verifier in the process. The secret bytes never appear in `Debug` output.
use crate::jwt::AuthError;

/// 256 bits, the HS256 block-size floor
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap a raw secret, rejecting anything shorter than [`MIN_SECRET_LENGTH`].
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.trim().len() < MIN_SECRET_LENGTH {
            return Err(AuthError::WeakSecret {
                min: MIN_SECRET_LENGTH,
            });
        }
        Ok(Self(secret.into_bytes()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningSecret").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let err = SigningSecret::new("abcd").unwrap_err();
        assert!(matches!(err, AuthError::WeakSecret { min: 32 }));
    }

    #[test]
    fn whitespace_does_not_count_towards_length() {
        let padded = format!("{}short", " ".repeat(40));
        assert!(SigningSecret::new(padded).is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = SigningSecret::new("k".repeat(48)).unwrap();
        let rendered = format!("{secret:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("kkkk"));
    }
}
