//! Input validation for values written by the bot or the dashboard.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Status string outside the allowed set.
    InvalidStatus { kind: &'static str, value: String },
    /// Unknown enum value (role, platform).
    InvalidValue { field: &'static str, value: String },
    /// Price is negative or not a finite number.
    InvalidPrice(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::InvalidStatus { kind, value } => {
                write!(f, "Invalid {} status: {}", kind, value)
            }
            ValidationError::InvalidValue { field, value } => {
                write!(f, "Invalid {}: {}", field, value)
            }
            ValidationError::InvalidPrice(msg) => write!(f, "Invalid price: {}", msg),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for short free-text lead fields (name, phone, ...).
pub const MAX_FIELD_LENGTH: usize = 500;

/// Validate an email address (basic format check).
///
/// Checks for exactly one `@`, a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail(
            "must contain an @ symbol".to_string(),
        ));
    };

    if domain.contains('@') {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must look like example.com".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a free-text field: non-empty and bounded.
pub fn validate_text(field: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    if value.len() > MAX_FIELD_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LENGTH,
            actual: value.len(),
        });
    }

    Ok(())
}

/// Validate a catalog price.
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidPrice("must be a number".to_string()));
    }
    if price < 0.0 {
        return Err(ValidationError::InvalidPrice("cannot be negative".to_string()));
    }
    Ok(())
}

/// Parse a price typed into a form (`"150"`, `" 99.5 "`).
pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidPrice(raw.to_string()))?;
    validate_price(price)?;
    Ok(price)
}
