use once_cell::sync::Lazy;
use regex::Regex;

/// Input validation utilities for identity service

// Hardcoded pattern; a failure here is a source bug
#[allow(clippy::expect_used)]
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_NAME_LENGTH: usize = 100;

/// Canonical email form: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Length in characters, not bytes
pub fn validate_password(password: &str) -> bool {
    let len = password.chars().count();
    (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len)
}

pub fn validate_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.chars().count() <= MAX_NAME_LENGTH
}
