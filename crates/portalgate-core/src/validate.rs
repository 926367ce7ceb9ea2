//! Client-side credential checks.
//!
//! These run before any network access. A failed check halts the sign-in
//! attempt and produces a [`ValidationError`] whose message is shown to the
//! user as-is.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// `local@domain.tld` with no whitespace and no extra `@` in any part.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
});

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the "symbol" requirement.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()-_=+{};:,<.>";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error(
        "Password must be at least 8 characters and include an uppercase letter, \
         a lowercase letter, a number and a symbol"
    )]
    WeakPassword,
}

/// Returns true if `s` has the shape `local@domain.tld`.
pub fn validate_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s)
}

/// Returns true if `s` is long enough and mixes all four character classes.
pub fn validate_password(s: &str) -> bool {
    // Counted in chars, not bytes, so multi-byte input is not over-credited.
    if s.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = s.chars().any(|c| c.is_ascii_digit());
    let has_symbol = s.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    has_lower && has_upper && has_digit && has_symbol
}

/// Run both checks, email first, and report the first failure.
pub fn check_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if !validate_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !validate_password(password) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_simple_address() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last@mail.example.co.uk"));
        assert!(validate_email("a@b.c"));
    }

    #[test]
    fn test_validate_email_rejects_missing_parts() {
        assert!(!validate_email(""));
        assert!(!validate_email("userexample.com"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@.com"));
        assert!(!validate_email("user@example."));
    }

    #[test]
    fn test_validate_email_rejects_double_at() {
        assert!(!validate_email("user@@example.com"));
        assert!(!validate_email("user@exa@mple.com"));
    }

    #[test]
    fn test_validate_email_rejects_whitespace() {
        assert!(!validate_email("user @example.com"));
        assert!(!validate_email(" user@example.com"));
        assert!(!validate_email("user@example.com "));
        assert!(!validate_email("user@exa\tmple.com"));
        assert!(!validate_email("user@example.com\n"));
    }

    #[test]
    fn test_validate_password_accepts_complex() {
        assert!(validate_password("Abcdef1!"));
        assert!(validate_password("Tr0ub4dor&3"));
        assert!(validate_password("xY9{zzzzzzzz"));
    }

    #[test]
    fn test_validate_password_rejects_short() {
        // All classes present but only seven characters
        assert!(!validate_password("Abcde1!"));
        assert!(!validate_password(""));
        assert!(!validate_password("aA1!"));
    }

    #[test]
    fn test_validate_password_requires_each_class() {
        assert!(!validate_password("abcdefg1")); // no upper, no symbol
        assert!(!validate_password("abcdef1!")); // no upper
        assert!(!validate_password("ABCDEF1!")); // no lower
        assert!(!validate_password("Abcdefg!")); // no digit
        assert!(!validate_password("Abcdefg1")); // no symbol
    }

    #[test]
    fn test_validate_password_symbol_set() {
        for symbol in PASSWORD_SYMBOLS.chars() {
            let candidate = format!("Abcdef1{}", symbol);
            assert!(validate_password(&candidate), "symbol {:?} should count", symbol);
        }
        // Characters outside the set do not count as symbols
        assert!(!validate_password("Abcdef1?"));
        assert!(!validate_password("Abcdef1~"));
        assert!(!validate_password("Abcdef1 "));
    }

    #[test]
    fn test_check_credentials_reports_email_first() {
        assert_eq!(
            check_credentials("not-an-email", "weak"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            check_credentials("user@example.com", "weak"),
            Err(ValidationError::WeakPassword)
        );
        assert_eq!(check_credentials("user@example.com", "Abcdef1!"), Ok(()));
    }

    #[test]
    fn test_validation_messages_are_distinct() {
        assert_ne!(
            ValidationError::InvalidEmail.to_string(),
            ValidationError::WeakPassword.to_string()
        );
    }
}
