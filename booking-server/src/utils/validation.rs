//! Input validation helpers
//!
//! Contact-field validators for the reservation form. Phone numbers follow
//! Taiwan numbering: mobile `09` + 8 digits, landline = recognized area
//! code + 6-8 digits with an optional hyphen.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

/// Entity names (donor name)
pub const MAX_NAME_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^09\d{8}$").unwrap());

static LANDLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0(?:2|3|4|5|6|7|8|82|836|89)-?\d{6,8}$").unwrap());

/// Validate an email address
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && email.validate_email()
}

/// Validate a Taiwan mobile number (09 + 8 digits)
pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_RE.is_match(phone)
}

/// Validate a Taiwan landline number (area code + 6-8 digits, optional hyphen)
pub fn is_valid_landline(phone: &str) -> bool {
    LANDLINE_RE.is_match(phone)
}

/// Validate a phone number: mobile or landline
pub fn is_valid_phone(phone: &str) -> bool {
    is_valid_mobile(phone) || is_valid_landline(phone)
}
