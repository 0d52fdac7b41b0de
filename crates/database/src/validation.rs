//! Input validation for portal-facing fields.

use thiserror::Error;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// Non-positive or non-finite monetary amount.
    #[error("invalid loan amount: {0}")]
    InvalidAmount(String),

    /// Value too long.
    #[error("{field} is too long ({actual} chars, max {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Empty value where one is required.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for names, phone numbers and other short fields.
pub const MAX_FIELD_LENGTH: usize = 128;

/// Maximum allowed length for free-text messages.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Validate an email address (basic RFC 5322 format check).
///
/// Checks for a single `@`, non-empty local and domain parts, and a dotted
/// domain without leading/trailing/consecutive dots.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a required short field: non-empty after trimming, within the
/// field length cap.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    if value.len() > MAX_FIELD_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LENGTH,
            actual: value.len(),
        });
    }

    Ok(())
}

/// Validate a free-text message field against the message length cap.
pub fn validate_message(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_MESSAGE_LENGTH,
            actual: value.len(),
        });
    }

    Ok(())
}

/// Validate a loan amount: finite and strictly positive.
pub fn validate_loan_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount(
            "must be a finite number".to_string(),
        ));
    }

    if amount <= 0.0 {
        return Err(ValidationError::InvalidAmount(
            "must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert!(validate_email(" test@example.com ").is_ok()); // trimmed
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));
        assert!(matches!(
            validate_email("test.example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@example@com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("@example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@localhost"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@example..com"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            validate_email(&email),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "Jane Fraser").is_ok());
        assert!(matches!(
            validate_required("name", "   "),
            Err(ValidationError::Empty("name"))
        ));
        let long = "x".repeat(200);
        assert!(matches!(
            validate_required("name", &long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_loan_amount() {
        assert!(validate_loan_amount(250_000.0).is_ok());
        assert!(validate_loan_amount(0.0).is_err());
        assert!(validate_loan_amount(-5.0).is_err());
        assert!(validate_loan_amount(f64::NAN).is_err());
        assert!(validate_loan_amount(f64::INFINITY).is_err());
    }
}
