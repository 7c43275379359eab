//! Contact identifiers used to log in: an email address or a phone number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Channel a verification code is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
}

/// Normalized login identifier.
///
/// Emails are trimmed and lowercased. Phone numbers keep only digits, with an
/// optional leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContactIdentifier {
    Email(String),
    Phone(String),
}

/// Error returned when a string is neither an email nor a phone number.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid contact identifier: {0:?}")]
pub struct InvalidIdentifier(pub String);

impl ContactIdentifier {
    pub fn email(raw: &str) -> Result<Self, InvalidIdentifier> {
        let email = raw.trim().to_lowercase();
        let valid = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        };
        if !valid || email.contains(char::is_whitespace) {
            return Err(InvalidIdentifier(raw.to_owned()));
        }
        Ok(Self::Email(email))
    }

    pub fn phone(raw: &str) -> Result<Self, InvalidIdentifier> {
        let trimmed = raw.trim();
        let plus = trimmed.starts_with('+');
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        let only_formatting = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        if !only_formatting || !(8..=15).contains(&digits.len()) {
            return Err(InvalidIdentifier(raw.to_owned()));
        }
        Ok(Self::Phone(if plus { format!("+{digits}") } else { digits }))
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::Email(_) => Channel::Email,
            Self::Phone(_) => Channel::Sms,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(s) | Self::Phone(s) => s,
        }
    }
}

impl fmt::Display for ContactIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything containing `@` is treated as an email, everything else as a phone.
impl FromStr for ContactIdentifier {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('@') {
            Self::email(s)
        } else {
            Self::phone(s)
        }
    }
}
