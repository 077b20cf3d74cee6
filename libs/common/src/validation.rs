//! Input validation utilities shared by the marketplace services

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A rejected form field, reported back to the caller as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trim a required text field and enforce a maximum length
pub fn required_text(
    field: &'static str,
    label: &str,
    value: Option<&str>,
    max_len: usize,
) -> ValidationResult<String> {
    let value = value.map(str::trim).unwrap_or_default();

    if value.is_empty() {
        return Err(ValidationError::new(field, format!("{} is required", label)));
    }

    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("{} must be at most {} characters long", label, max_len),
        ));
    }

    Ok(value.to_string())
}

/// Trim an optional text field; blank input becomes `None`
pub fn optional_text(
    field: &'static str,
    label: &str,
    value: Option<&str>,
    max_len: usize,
) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, label, Some(v), max_len).map(Some),
    }
}

/// Validate an email address and return its normalized (trimmed, lowercase) form
pub fn validate_email(field: &'static str, email: Option<&str>) -> ValidationResult<String> {
    let email = email.map(str::trim).unwrap_or_default();

    if email.is_empty() {
        return Err(ValidationError::new(field, "Email is required"));
    }

    if email.len() > 254 {
        return Err(ValidationError::new(
            field,
            "Email must be at most 254 characters long",
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ValidationError::new(field, "Invalid email format"));
    }

    Ok(email.to_lowercase())
}

/// Validate a password before hashing
///
/// Length is counted in characters; no composition rules are imposed.
pub fn validate_password(password: Option<&str>) -> ValidationResult<&str> {
    let password = password.unwrap_or_default();

    if password.is_empty() {
        return Err(ValidationError::new("password", "Password is required"));
    }

    let len = password.chars().count();

    if len < 8 {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 8 characters long",
        ));
    }

    if len > 128 {
        return Err(ValidationError::new(
            "password",
            "Password must be at most 128 characters long",
        ));
    }

    Ok(password)
}

/// Validate an optional phone number
pub fn validate_phone(value: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(phone) = optional_text("phone_number", "Phone number", value, 32)? else {
        return Ok(None);
    };

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX
        .get_or_init(|| Regex::new(r"^\+?[0-9 ()\-]{3,}$").expect("Failed to compile phone regex"));

    if !regex.is_match(&phone) {
        return Err(ValidationError::new(
            "phone_number",
            "Phone number can only contain digits, spaces, and + - ( )",
        ));
    }

    Ok(Some(phone))
}
