//! Request field checks that fail with [`ServiceError::InvalidInput`]

use crate::{ServiceError, ServiceResult};

/// A required text field, trimmed. Blank is an error.
pub fn required(value: &str, field: &str) -> ServiceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::invalid_input(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// An optional text field, trimmed. Absent and blank both mean "leave as is".
pub fn supplied(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
