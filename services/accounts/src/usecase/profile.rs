use uuid::Uuid;
use worldbite_domain::contact::ContactIdentifier;
use worldbite_domain::pagination::PageRequest;

use crate::domain::repository::{
    CodeCache, LoginHistoryRepository, SessionRepository, UserRepository,
};
use crate::domain::types::{CodePolicy, LoginAttempt, User};
use crate::error::AccountsError;
use crate::infra::password::{hash_password, verify_password};
use crate::usecase::signup::validate_password;
use crate::usecase::verification::{
    RequestCodeInput, RequestCodeOutput, RequestCodeUseCase, verify_code,
};

async fn load_active<U: UserRepository>(users: &U, user_id: Uuid) -> Result<User, AccountsError> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or(AccountsError::UserNotFound)?;
    if !user.active {
        return Err(AccountsError::AccountInactive);
    }
    Ok(user)
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, AccountsError> {
        load_active(&self.users, user_id).await
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, name: &str) -> Result<User, AccountsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountsError::Validation("name is required".to_owned()));
        }
        let mut user = load_active(&self.users, user_id).await?;
        self.users.update_name(user_id, name).await?;
        user.name = name.to_owned();
        Ok(user)
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordInput {
    /// Required when the account already has a password.
    pub current_password: Option<String>,
    pub new_password: String,
}

pub struct SetPasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetPasswordUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: SetPasswordInput,
    ) -> Result<(), AccountsError> {
        validate_password(&input.new_password)?;
        let user = load_active(&self.users, user_id).await?;
        if let Some(existing) = user.password_hash.as_deref() {
            let current = input.current_password.as_deref().unwrap_or_default();
            if !verify_password(current, existing) {
                return Err(AccountsError::InvalidCredentials);
            }
        }
        let hash = hash_password(&input.new_password)?;
        self.users.set_password_hash(user_id, &hash).await?;
        tracing::info!(%user_id, "password changed");
        Ok(())
    }
}

// ── Deactivate ───────────────────────────────────────────────────────────────

pub struct DeactivateAccountUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub sessions: S,
}

impl<U: UserRepository, S: SessionRepository> DeactivateAccountUseCase<U, S> {
    /// Soft delete: the row stays, sessions are revoked.
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AccountsError> {
        load_active(&self.users, user_id).await?;
        self.users.deactivate(user_id).await?;
        let revoked = self.sessions.revoke_all_for_user(user_id).await?;
        tracing::info!(%user_id, revoked, "account deactivated");
        Ok(())
    }
}

// ── Email verification ───────────────────────────────────────────────────────

fn email_of(user: &User) -> Result<ContactIdentifier, AccountsError> {
    let email = user
        .email
        .as_deref()
        .ok_or_else(|| AccountsError::Validation("account has no email".to_owned()))?;
    ContactIdentifier::email(email).map_err(|e| AccountsError::Internal(e.into()))
}

pub struct RequestEmailVerificationUseCase<U: UserRepository, C: CodeCache> {
    pub inner: RequestCodeUseCase<U, C>,
}

impl<U: UserRepository, C: CodeCache> RequestEmailVerificationUseCase<U, C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<RequestCodeOutput, AccountsError> {
        let user = load_active(&self.inner.users, user_id).await?;
        if user.email_verified {
            return Err(AccountsError::Conflict("email already verified".to_owned()));
        }
        self.inner
            .execute(RequestCodeInput {
                identifier: email_of(&user)?,
                policy: CodePolicy::EmailVerification,
            })
            .await
    }
}

pub struct ConfirmEmailVerificationUseCase<U: UserRepository, C: CodeCache> {
    pub users: U,
    pub cache: C,
}

impl<U: UserRepository, C: CodeCache> ConfirmEmailVerificationUseCase<U, C> {
    pub async fn execute(&self, user_id: Uuid, code: &str) -> Result<User, AccountsError> {
        let user = load_active(&self.users, user_id).await?;
        let email = email_of(&user)?;
        verify_code(&self.users, &self.cache, user, &email, code).await
    }
}

// ── Login history ────────────────────────────────────────────────────────────

pub struct ListLoginHistoryUseCase<H: LoginHistoryRepository> {
    pub history: H,
}

impl<H: LoginHistoryRepository> ListLoginHistoryUseCase<H> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<LoginAttempt>, AccountsError> {
        self.history.list_by_user(user_id, page.clamped()).await
    }
}
