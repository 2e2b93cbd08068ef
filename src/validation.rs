//! Field-level input validation shared by registration and the directory
//! services.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validation failures keyed by field name. Only the first message per field
/// is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("spring@a.com"));
        assert!(is_valid_email("first.last+tag@example.co.kr"));
        assert!(!is_valid_email("spring"));
        assert!(!is_valid_email("spring@a"));
        assert!(!is_valid_email("sp ring@a.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::default();
        errors.add("email", "Email is required");
        errors.add("email", "Email is not a valid address");
        errors.require("name", "  ", "Name");

        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(
            errors.to_string(),
            "email: Email is required; name: Name is required"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_empty_field_errors_is_ok() {
        assert!(FieldErrors::default().into_result().is_ok());
    }
}
