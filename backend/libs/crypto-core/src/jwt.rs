/// Bearer token issuing and verification
///
/// Tokens are HS256-signed JWTs carrying the caller's identifier in `sub`
/// and a fixed 24 hour lifetime. There is no refresh or revocation: a token
/// is valid if and only if its signature verifies under the shared secret
/// and the current time is before `exp`.
///
/// ## Security Design
///
/// - **HS256 ONLY**: the verifier's algorithm allow-list contains exactly
///   one entry, so tokens signed with any other algorithm (including
///   asymmetric ones presented with the shared secret as a "public key")
///   are rejected before the signature is checked
/// - **Zero leeway**: expiry is enforced to the second
/// - **Required claims**: `exp` and `sub` must both be present; `iat` is
///   not checked
///
/// ## Usage
///
/// ```rust
/// use crypto_core::{SigningSecret, TokenIssuer, TokenVerifier};
///
/// let secret = SigningSecret::new("an-example-secret-that-is-long-enough!!").unwrap();
/// let issuer = TokenIssuer::new(&secret);
/// let verifier = TokenVerifier::new(&secret);
///
/// let token = issuer.issue("alice").unwrap();
/// assert_eq!(verifier.verify(&token).unwrap(), "alice");
/// ```
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::secret::SigningSecret;

// ============================================================================
// Constants
// ============================================================================

pub const TOKEN_TTL_HOURS: i64 = 24;

/// The only algorithm this system signs or accepts
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    // Required claims are defaulted so their absence reaches the verifier's
    // required-claim check rather than failing deserialization.
    /// Subject (caller identifier)
    #[serde(default)]
    pub sub: String,
    /// Issued at (Unix timestamp), informational only; 0 when absent
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    #[serde(default)]
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("token has expired")]
    Expired,

    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("token subject is missing")]
    MissingSubject,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("signing secret must be at least {min} bytes")]
    WeakSecret { min: usize },
}

impl AuthError {
    /// Whether the failure is the caller's fault (bad credential) rather
    /// than a server-side problem.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::Signing(_) | AuthError::WeakSecret { .. })
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                AuthError::UnexpectedAlgorithm
            }
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => AuthError::MissingSubject,
            ErrorKind::MissingRequiredClaim(claim) => {
                AuthError::InvalidClaims(format!("missing {claim}"))
            }
            ErrorKind::Json(e) => AuthError::InvalidClaims(e.to_string()),
            _ => AuthError::Malformed,
        }
    }
}

// ============================================================================
// Issuer
// ============================================================================

#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Mint a token for an already-authenticated identifier.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    /// Mint a token as if it had been issued at `issued_at`.
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        if subject.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Verifier
// ============================================================================

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its full claim set.
    pub fn verify_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "token rejected");
            AuthError::from(e)
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }

        Ok(data.claims)
    }

    /// Verify a token and return the identifier it was issued for.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_claims(token).map(|claims| claims.sub)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SECRET: &str = "test-secret-used-only-by-unit-tests-0123";

    fn pair() -> (TokenIssuer, TokenVerifier) {
        let secret = SigningSecret::new(TEST_SECRET).unwrap();
        (TokenIssuer::new(&secret), TokenVerifier::new(&secret))
    }

    fn sign_raw(header: Header, claims: &serde_json::Value, secret: &str) -> String {
        encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_issue_then_verify_recovers_subject() {
        let (issuer, verifier) = pair();

        let token = issuer.issue("alice").unwrap();
        assert_eq!(token.matches('.').count(), 2);
        assert_eq!(verifier.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_expiry_is_issued_at_plus_24h() {
        let (issuer, verifier) = pair();
        let now = Utc::now();

        let claims = verifier
            .verify_claims(&issuer.issue_at("alice", now).unwrap())
            .unwrap();
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_token_valid_just_inside_window() {
        let (issuer, verifier) = pair();
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS) + Duration::seconds(30);

        let token = issuer.issue_at("alice", issued).unwrap();
        assert_eq!(verifier.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_token_rejected_after_24h() {
        let (issuer, verifier) = pair();
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(5);

        let token = issuer.issue_at("alice", issued).unwrap();
        assert_eq!(verifier.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_different_secret_rejected() {
        let (_, verifier) = pair();
        let other = SigningSecret::new("a-completely-different-secret-value-xyz").unwrap();

        let token = TokenIssuer::new(&other).issue("alice").unwrap();
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_unexpected_algorithm_rejected() {
        let (_, verifier) = pair();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let claims = json!({ "sub": "alice", "iat": 0, "exp": exp });

        // Same secret, different HMAC family member
        let token = sign_raw(Header::new(Algorithm::HS512), &claims, TEST_SECRET);
        assert_eq!(verifier.verify(&token), Err(AuthError::UnexpectedAlgorithm));
    }

    #[test]
    fn test_missing_subject_rejected() {
        let (_, verifier) = pair();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let claims = json!({ "iat": 0, "exp": exp });

        let token = sign_raw(Header::new(Algorithm::HS256), &claims, TEST_SECRET);
        assert_eq!(verifier.verify(&token), Err(AuthError::MissingSubject));
    }

    #[test]
    fn test_missing_issued_at_accepted() {
        let (_, verifier) = pair();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let claims = json!({ "sub": "alice", "exp": exp });

        let token = sign_raw(Header::new(Algorithm::HS256), &claims, TEST_SECRET);
        let verified = verifier.verify_claims(&token).unwrap();
        assert_eq!(verified.sub, "alice");
        assert_eq!(verified.iat, 0);
    }

    #[test]
    fn test_missing_expiry_rejected() {
        let (_, verifier) = pair();
        let claims = json!({ "sub": "alice", "iat": 0 });

        let token = sign_raw(Header::new(Algorithm::HS256), &claims, TEST_SECRET);
        assert_eq!(
            verifier.verify(&token),
            Err(AuthError::InvalidClaims("missing exp".into()))
        );
    }

    #[test]
    fn test_non_string_subject_rejected() {
        let (_, verifier) = pair();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let claims = json!({ "sub": 42, "iat": 0, "exp": exp });

        let token = sign_raw(Header::new(Algorithm::HS256), &claims, TEST_SECRET);
        let err = verifier.verify(&token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::MissingSubject | AuthError::InvalidClaims(_)
        ));
    }

    #[test]
    fn test_blank_subject_rejected() {
        let (_, verifier) = pair();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let claims = json!({ "sub": "  ", "iat": 0, "exp": exp });

        let token = sign_raw(Header::new(Algorithm::HS256), &claims, TEST_SECRET);
        assert_eq!(verifier.verify(&token), Err(AuthError::MissingSubject));
    }

    #[test]
    fn test_garbage_rejected() {
        let (_, verifier) = pair();

        for token in ["", "invalid.token.here", "onlyonepart", "a.b.c.d"] {
            let err = verifier.verify(token).unwrap_err();
            assert!(err.is_unauthenticated(), "{token:?} gave {err:?}");
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (issuer, verifier) = pair();
        let token = issuer.issue("alice").unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = {
            let other = issuer.issue("mallory").unwrap();
            other.split('.').nth(1).unwrap().to_string()
        };
        parts[1] = &forged_payload;
        let forged = parts.join(".");

        assert_eq!(verifier.verify(&forged), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_blank_subject_cannot_be_issued() {
        let (issuer, _) = pair();
        assert_eq!(issuer.issue(" "), Err(AuthError::MissingSubject));
    }

    #[test]
    fn test_signing_errors_are_not_unauthenticated() {
        assert!(!AuthError::Signing("boom".into()).is_unauthenticated());
        assert!(AuthError::Expired.is_unauthenticated());
    }
}
