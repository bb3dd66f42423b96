//! Format checks applied to supplier fields before anything is sent.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;
const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Returns true when `email` looks like a deliverable address.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.contains(' ') {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty()
        || local.len() > MAX_LOCAL_LEN
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
    {
        return false;
    }

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN || domain.ends_with('.') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2
        || labels
            .iter()
            .any(|label| label.is_empty() || label.len() > MAX_LABEL_LEN)
    {
        return false;
    }

    EMAIL_PATTERN.is_match(email)
}

/// Accepts 10 to 15 digits with any punctuation, but no letters.
pub fn validate_phone(phone: &str) -> bool {
    if phone.is_empty() || phone.chars().any(char::is_alphabetic) {
        return false;
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Formats a 10-digit number as `NNN-NNN-NNNN`; anything else is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("{}-{}-{}", &digits[0..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}

/// `validator` hook for email fields.
pub fn email_rule(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some("Please enter a valid email address.".into());
    Err(err)
}

/// `validator` hook for phone fields.
pub fn phone_rule(phone: &str) -> Result<(), ValidationError> {
    if validate_phone(phone) {
        return Ok(());
    }
    let mut err = ValidationError::new("phone");
    err.message = Some("Please enter a valid phone number.".into());
    Err(err)
}
