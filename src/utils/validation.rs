use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

// +62 / 62 / 0 prefix followed by an 8xx mobile or an area code
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+62|62|0)[1-9]\d{7,11}$").expect("valid phone regex"));

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("valid postal code regex"));

pub fn validate_email(email: &str) -> AppResult<()> {
    if email.len() > 255 || !EMAIL_RE.is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

/// Indonesian phone number (`08xx`, `628xx` or `+628xx`), separators allowed.
pub fn validate_phone(phone: &str) -> AppResult<()> {
    if !PHONE_RE.is_match(&normalize_phone(phone)) {
        return Err(AppError::ValidationError(
            "Invalid phone number, expected format 08xxxxxxxxx or +628xxxxxxxxx".to_string(),
        ));
    }
    Ok(())
}

/// Strips spaces, dashes and parentheses.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

pub fn validate_postal_code(code: &str) -> AppResult<()> {
    if !POSTAL_CODE_RE.is_match(code) {
        return Err(AppError::ValidationError(
            "Postal code must be 5 digits".to_string(),
        ));
    }
    Ok(())
}

/// Trims `value` and checks it is non-empty and at most `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Like [`require_text`] for optional fields; blank becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> AppResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => require_text(field, v, max).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("seller@gomealsaver.id").is_ok());
        assert!(validate_email("a.b+c@example.co.id").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("x@y").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("081234567890").is_ok());
        assert!(validate_phone("+6281234567890").is_ok());
        assert!(validate_phone("0812-3456-7890").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+1 555 0100").is_err());
    }

    #[test]
    fn test_validate_postal_code() {
        assert!(validate_postal_code("12190").is_ok());
        assert!(validate_postal_code("1219").is_err());
        assert!(validate_postal_code("12a90").is_err());
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(require_text("Name", "  Nasi Goreng ", 120).unwrap(), "Nasi Goreng");
        assert!(require_text("Name", "   ", 120).is_err());
        assert!(require_text("Name", "abcdef", 5).is_err());
        assert_eq!(optional_text("Note", Some("  "), 10).unwrap(), None);
        assert_eq!(optional_text("Note", None, 10).unwrap(), None);
        assert_eq!(
            optional_text("Note", Some(" extra sambal "), 20).unwrap(),
            Some("extra sambal".to_string())
        );
    }
}
