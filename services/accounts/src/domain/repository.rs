#![allow(async_fn_in_trait)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use worldbite_domain::contact::{Channel, ContactIdentifier};
use worldbite_domain::pagination::PageRequest;

use crate::domain::types::{Address, LoginAttempt, OutboxEvent, Session, User};
use crate::error::AccountsError;

pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsError>;

    async fn find_by_identifier(
        &self,
        identifier: &ContactIdentifier,
    ) -> Result<Option<User>, AccountsError>;

    /// Insert a new user. A duplicate email or phone yields
    /// [`AccountsError::Conflict`].
    async fn create(&self, user: &User) -> Result<(), AccountsError>;

    /// Store a fresh verification code (resetting the attempt counter) and the
    /// outbox event that delivers it, atomically.
    async fn store_code_with_outbox(
        &self,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), AccountsError>;

    /// Count one failed code check.
    async fn record_failed_check(&self, user_id: Uuid) -> Result<(), AccountsError>;

    /// Clear code, expiry and attempts and mark `channel` verified, but only
    /// while `code` is still the stored, unexpired code with attempts left.
    /// `false` when a concurrent request consumed the code or used up the
    /// attempts first.
    async fn consume_code(
        &self,
        user_id: Uuid,
        code: &str,
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountsError>;

    /// Count one failed password login in a single update and return the new
    /// count. An elapsed lockout restarts the count at one. `None` when the
    /// account is locked at `now`.
    async fn record_failed_login(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>, AccountsError>;

    /// Lock the account until `until` unless a lockout is already set.
    async fn lock_account(&self, user_id: Uuid, until: DateTime<Utc>) -> Result<(), AccountsError>;

    /// Reset failed-login counter and lockout; set `last_login`.
    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AccountsError>;

    async fn update_name(&self, user_id: Uuid, name: &str) -> Result<(), AccountsError>;

    async fn set_password_hash(&self, user_id: Uuid, hash: &str) -> Result<(), AccountsError>;

    async fn deactivate(&self, user_id: Uuid) -> Result<(), AccountsError>;
}

pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AccountsError>;

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, AccountsError>;

    /// Mark every active session holding `token` inactive. Returns the number
    /// of sessions changed; zero is not an error.
    async fn deactivate_by_refresh_token(&self, token: &str) -> Result<u64, AccountsError>;

    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, AccountsError>;

    /// Revoke one of `user_id`'s active sessions. `false` when no such
    /// session is owned by that user.
    async fn revoke(&self, id: Uuid, user_id: Uuid) -> Result<bool, AccountsError>;

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AccountsError>;
}

pub trait LoginHistoryRepository: Send + Sync {
    async fn record(&self, attempt: &LoginAttempt) -> Result<(), AccountsError>;

    /// Most recent successful logins of `user_id` since `since`, newest first,
    /// excluding the attempt `exclude`.
    async fn recent_successes(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<LoginAttempt>, AccountsError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<LoginAttempt>, AccountsError>;
}

pub trait OutboxRepository: Send + Sync {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), AccountsError>;
}

pub trait AddressRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, AccountsError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AccountsError>;

    async fn create(&self, address: &Address) -> Result<(), AccountsError>;

    async fn update(&self, address: &Address) -> Result<(), AccountsError>;

    /// Delete an address owned by `user_id`. `false` when nothing matched.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AccountsError>;
}

/// Short-lived key/value store holding the second copy of verification codes.
pub trait CodeCache: Send + Sync {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AccountsError>;

    /// Expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<String>, AccountsError>;

    async fn delete(&self, key: &str) -> Result<(), AccountsError>;
}
