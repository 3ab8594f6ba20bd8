//! Token primitives shared by the identity service (issuing) and the API
//! gateway (verifying).
//!
//! Both sides are built from the same [`SigningSecret`]; nothing here keeps
//! process-global state, so callers construct a [`TokenIssuer`] or
//! [`TokenVerifier`] once at startup and hand it to whatever needs it.

pub mod jwt;
pub mod secret;

pub use jwt::{AuthError, Claims, TokenIssuer, TokenVerifier, TOKEN_TTL_HOURS};
pub use secret::SigningSecret;
