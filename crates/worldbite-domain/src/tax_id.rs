//! Restaurant tax identifier (CNPJ).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 14-digit CNPJ, stored without punctuation.
///
/// Accepts the formatted `12.345.678/0001-90` form as well as bare digits.
/// Only the digit count is enforced; check digits are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid CNPJ: {0:?}")]
pub struct InvalidTaxId(pub String);

impl TaxId {
    pub fn parse(raw: &str) -> Result<Self, InvalidTaxId> {
        let trimmed = raw.trim();
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | ' '))
        {
            return Err(InvalidTaxId(raw.to_owned()));
        }
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 14 {
            return Err(InvalidTaxId(raw.to_owned()));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaxId {
    type Err = InvalidTaxId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TaxId {
    type Error = InvalidTaxId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaxId> for String {
    fn from(value: TaxId) -> Self {
        value.0
    }
}
