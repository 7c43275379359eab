pub mod address;
pub mod client;
pub mod code;
pub mod login;
pub mod me;
pub mod signup;
pub mod views;

use worldbite_domain::contact::{ContactIdentifier, InvalidIdentifier};

use crate::error::AccountsError;

fn invalid(e: InvalidIdentifier) -> AccountsError {
    AccountsError::Validation(e.to_string())
}

pub(crate) fn parse_email(raw: &str) -> Result<ContactIdentifier, AccountsError> {
    ContactIdentifier::email(raw).map_err(invalid)
}

pub(crate) fn parse_phone(raw: &str) -> Result<ContactIdentifier, AccountsError> {
    ContactIdentifier::phone(raw).map_err(invalid)
}

pub(crate) fn parse_identifier(raw: &str) -> Result<ContactIdentifier, AccountsError> {
    raw.parse().map_err(invalid)
}
