use chrono::Utc;
use worldbite_domain::contact::ContactIdentifier;

use crate::domain::repository::UserRepository;
use crate::domain::types::{PASSWORD_MIN_LEN, User};
use crate::error::AccountsError;
use crate::infra::password::hash_password;

pub struct SignupInput {
    pub name: String,
    pub email: Option<ContactIdentifier>,
    pub phone: Option<ContactIdentifier>,
    pub password: Option<String>,
}

pub struct SignupUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SignupUseCase<U> {
    pub async fn execute(&self, input: SignupInput) -> Result<User, AccountsError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AccountsError::Validation("name is required".to_owned()));
        }
        let primary = input
            .email
            .as_ref()
            .or(input.phone.as_ref())
            .ok_or_else(|| AccountsError::Validation("email or phone is required".to_owned()))?;
        if let Some(password) = &input.password {
            validate_password(password)?;
        }

        for identifier in input.email.iter().chain(input.phone.iter()) {
            if self.users.find_by_identifier(identifier).await?.is_some() {
                let what = match identifier {
                    ContactIdentifier::Email(_) => "email",
                    ContactIdentifier::Phone(_) => "phone",
                };
                return Err(AccountsError::Conflict(format!("{what} already registered")));
            }
        }

        let mut user = User::new(name.to_owned(), primary, Utc::now());
        if let Some(ContactIdentifier::Phone(phone)) = &input.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(password) = &input.password {
            user.password_hash = Some(hash_password(password)?);
        }
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }
}

pub fn validate_password(password: &str) -> Result<(), AccountsError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AccountsError::Validation(format!(
            "password must have at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}
