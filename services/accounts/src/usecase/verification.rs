use chrono::Utc;
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;
use worldbite_domain::contact::{Channel, ContactIdentifier};

use crate::domain::repository::{CodeCache, UserRepository};
use crate::domain::types::{
    CodePolicy, EVENT_VERIFICATION_CODE_EMAIL, EVENT_VERIFICATION_CODE_SMS,
    MAX_VERIFICATION_ATTEMPTS, OutboxEvent, User,
};
use crate::error::AccountsError;

pub fn generate_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub fn cache_key(identifier: &ContactIdentifier) -> String {
    format!("verification:{identifier}")
}

// ── RequestCode ──────────────────────────────────────────────────────────────

pub struct RequestCodeInput {
    pub identifier: ContactIdentifier,
    pub policy: CodePolicy,
}

#[derive(Debug)]
pub struct RequestCodeOutput {
    pub user_id: Uuid,
    /// Only populated when test codes are exposed.
    pub test_code: Option<String>,
}

pub struct RequestCodeUseCase<U: UserRepository, C: CodeCache> {
    pub users: U,
    pub cache: C,
    pub expose_test_codes: bool,
}

impl<U: UserRepository, C: CodeCache> RequestCodeUseCase<U, C> {
    pub async fn execute(
        &self,
        input: RequestCodeInput,
    ) -> Result<RequestCodeOutput, AccountsError> {
        let identifier = input.identifier;
        let user = match self.users.find_by_identifier(&identifier).await? {
            Some(user) => user,
            None => self.provision(&identifier).await?,
        };
        if !user.active {
            return Err(AccountsError::AccountInactive);
        }

        let code = generate_code(input.policy.code_len());
        let ttl = input.policy.ttl();
        let expires_at = Utc::now() + ttl;
        let kind = match identifier.channel() {
            Channel::Email => EVENT_VERIFICATION_CODE_EMAIL,
            Channel::Sms => EVENT_VERIFICATION_CODE_SMS,
        };
        let event = OutboxEvent::new(
            kind,
            user.id,
            json!({
                "to": identifier.as_str(),
                "name": user.name,
                "code": code,
                "expiresAt": expires_at,
            }),
        );
        self.users
            .store_code_with_outbox(user.id, &code, expires_at, &event)
            .await?;

        // Secondary copy only; the user row is authoritative.
        if let Ok(std_ttl) = ttl.to_std() {
            if let Err(e) = self.cache.set(&cache_key(&identifier), &code, std_ttl).await {
                tracing::warn!(error = %e, user_id = %user.id, "failed to cache verification code");
            }
        }

        tracing::info!(
            user_id = %user.id,
            channel = ?identifier.channel(),
            "verification code issued"
        );
        Ok(RequestCodeOutput {
            user_id: user.id,
            test_code: self.expose_test_codes.then_some(code),
        })
    }

    /// First code request for an unknown identifier doubles as signup.
    async fn provision(&self, identifier: &ContactIdentifier) -> Result<User, AccountsError> {
        let user = User::new(User::provisional_name(identifier), identifier, Utc::now());
        match self.users.create(&user).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "user provisioned by code request");
                Ok(user)
            }
            // Lost a race with a concurrent request for the same identifier.
            Err(AccountsError::Conflict(_)) => self
                .users
                .find_by_identifier(identifier)
                .await?
                .ok_or(AccountsError::UserNotFound),
            Err(e) => Err(e),
        }
    }
}

// ── CheckCode ────────────────────────────────────────────────────────────────

/// Check `code` against `user`'s pending verification code.
///
/// Failure order: too many attempts, no code, expired, cache mismatch, wrong
/// code. Expired and wrong codes increment the attempt counter. A match is
/// only final once the store consumes the code, which fails if a concurrent
/// check got there first or the attempts ran out meanwhile. On success the
/// code is cleared and the identifier's channel marked verified; the returned
/// user reflects that.
pub async fn verify_code<U: UserRepository, C: CodeCache>(
    users: &U,
    cache: &C,
    mut user: User,
    identifier: &ContactIdentifier,
    code: &str,
) -> Result<User, AccountsError> {
    if user.verification_attempts >= MAX_VERIFICATION_ATTEMPTS {
        return Err(AccountsError::TooManyAttempts);
    }
    let (Some(stored), Some(expires_at)) = (
        user.verification_code.as_deref(),
        user.verification_code_expires_at,
    ) else {
        return Err(AccountsError::NoActiveCode);
    };

    let key = cache_key(identifier);
    let failure = if expires_at <= Utc::now() {
        Some(AccountsError::CodeExpired)
    } else {
        // A missing cache entry (restart, eviction) defers to the database.
        let cached = match cache.get(&key).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "verification cache unavailable");
                None
            }
        };
        let cache_mismatch = cached.as_deref().is_some_and(|c| c != code);
        (cache_mismatch || stored != code).then_some(AccountsError::InvalidCode)
    };
    if let Some(err) = failure {
        users.record_failed_check(user.id).await?;
        return Err(err);
    }

    let channel = identifier.channel();
    if !users.consume_code(user.id, code, channel, Utc::now()).await? {
        return Err(AccountsError::InvalidCode);
    }
    if let Err(e) = cache.delete(&key).await {
        tracing::warn!(error = %e, "failed to delete cached verification code");
    }

    user.verification_code = None;
    user.verification_code_expires_at = None;
    user.verification_attempts = 0;
    user.mark_verified(channel);
    Ok(user)
}

pub struct CheckCodeUseCase<U: UserRepository, C: CodeCache> {
    pub users: U,
    pub cache: C,
}

impl<U: UserRepository, C: CodeCache> CheckCodeUseCase<U, C> {
    pub async fn execute(
        &self,
        identifier: &ContactIdentifier,
        code: &str,
    ) -> Result<User, AccountsError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(AccountsError::UserNotFound)?;
        verify_code(&self.users, &self.cache, user, identifier, code).await
    }
}
