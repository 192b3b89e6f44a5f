//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::AuthError;

/// Return the value of a mandatory field, or a field-tagged failure.
///
/// Absent, empty and whitespace-only values all count as missing.
pub fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
    message: &'static str,
) -> Result<&'a str, AuthError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AuthError::MissingField { field, message }),
    }
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 {
        return Err("Email must be at most 254 characters long");
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format");
    }

    Ok(())
}
