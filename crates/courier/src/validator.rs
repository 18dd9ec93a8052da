//! Email address validation.

/// Predicate deciding whether a string is an acceptable email address.
///
/// Implemented for any `Fn(&str) -> bool`, so a closure can be plugged in
/// directly.
pub trait EmailValidator {
    /// Returns true if `email` is acceptable.
    fn is_valid(&self, email: &str) -> bool;
}

impl<F> EmailValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, email: &str) -> bool {
        self(email)
    }
}

/// Basic structural check: one `@`, non-empty local part, dotted domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicValidator;

impl EmailValidator for BasicValidator {
    fn is_valid(&self, email: &str) -> bool {
        is_valid_email(email)
    }
}

/// Basic email validation.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    // Must contain exactly one @
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    if local.is_empty() {
        return false;
    }

    // Domain must contain at least one dot and no empty labels
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    !domain.split('.').any(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@example.com"));
        assert!(is_valid_email("user@sub.example.com"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("user@example.com\r\nBcc: x@y.z"));
    }

    #[test]
    fn test_closure_validator() {
        let only_example = |email: &str| email.ends_with("@example.com");
        assert!(only_example.is_valid("a@example.com"));
        assert!(!only_example.is_valid("a@example.org"));
        assert!(BasicValidator.is_valid("a@example.org"));
    }
}
