//! Phone number to chat address normalization.

use std::fmt;

/// A chat address such as `6281234567890@c.us`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAddress {
    digits: String,
    domain: String,
}

impl ChatAddress {
    /// Digits with the country code applied.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for ChatAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.digits, self.domain)
    }
}

/// Rules for turning user-entered numbers into chat addresses.
#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    country_code: String,
    domain: String,
}

impl PhoneNormalizer {
    pub fn new(country_code: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            domain: domain.into(),
        }
    }

    /// Normalize a raw phone number.
    ///
    /// Non-digits are stripped. A leading `0` is replaced by the country
    /// code; otherwise the country code is prepended unless already present.
    pub fn normalize(&self, raw: &str) -> Result<ChatAddress, String> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err("phoneNumber must contain digits".into());
        }

        let digits = if let Some(local) = digits.strip_prefix('0') {
            format!("{}{}", self.country_code, local)
        } else if digits.starts_with(&self.country_code) {
            digits
        } else {
            format!("{}{}", self.country_code, digits)
        };

        Ok(ChatAddress {
            digits,
            domain: self.domain.clone(),
        })
    }
}
