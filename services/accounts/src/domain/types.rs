use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use worldbite_domain::contact::{Channel, ContactIdentifier};

/// Failed code checks tolerated before a new code must be requested.
pub const MAX_VERIFICATION_ATTEMPTS: i32 = 3;

/// Failed password logins that trigger a lockout.
pub const MAX_FAILED_LOGINS: i32 = 5;

pub const LOCKOUT_MINUTES: i64 = 30;

pub const PASSWORD_MIN_LEN: usize = 8;

/// Suspicious-login lookback: this many recent successful logins...
pub const SUSPICIOUS_SAMPLE: u64 = 10;
/// ...no older than this many days.
pub const SUSPICIOUS_LOOKBACK_DAYS: i64 = 30;

/// Verification-code policy: code length and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePolicy {
    /// Passwordless login and channel verification: 6 digits, 10 minutes.
    Login,
    /// Verifying an email on an existing account: 8 digits, 15 minutes.
    EmailVerification,
}

impl CodePolicy {
    pub fn code_len(self) -> usize {
        match self {
            Self::Login => 6,
            Self::EmailVerification => 8,
        }
    }

    pub fn ttl(self) -> Duration {
        match self {
            Self::Login => Duration::minutes(10),
            Self::EmailVerification => Duration::minutes(15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub verification_code: Option<String>,
    pub verification_code_expires_at: Option<DateTime<Utc>>,
    pub verification_attempts: i32,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Fresh, unverified user reachable through `identifier`.
    pub fn new(name: String, identifier: &ContactIdentifier, now: DateTime<Utc>) -> Self {
        let (email, phone) = match identifier {
            ContactIdentifier::Email(e) => (Some(e.clone()), None),
            ContactIdentifier::Phone(p) => (None, Some(p.clone())),
        };
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            phone,
            password_hash: None,
            email_verified: false,
            phone_verified: false,
            verification_code: None,
            verification_code_expires_at: None,
            verification_attempts: 0,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Placeholder name for users provisioned by their first code request:
    /// the email's local part, or the phone number.
    pub fn provisional_name(identifier: &ContactIdentifier) -> String {
        match identifier {
            ContactIdentifier::Email(e) => e.split('@').next().unwrap_or(e).to_owned(),
            ContactIdentifier::Phone(p) => p.clone(),
        }
    }

    pub fn has_verified_channel(&self) -> bool {
        self.email_verified || self.phone_verified
    }

    pub fn mark_verified(&mut self, channel: Channel) {
        match channel {
            Channel::Email => self.email_verified = true,
            Channel::Sms => self.phone_verified = true,
        }
    }

    /// Whole minutes until the lockout ends, rounded up; `None` when not locked.
    pub fn lock_remaining_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        let until = self.locked_until.filter(|until| *until > now)?;
        let secs = (until - now).num_seconds();
        Some((secs + 59) / 60)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at > now
    }
}

/// Outcome recorded for every login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginReason {
    Success,
    UserNotFound,
    AccountInactive,
    AccountLocked,
    InvalidPassword,
    NoPassword,
    InvalidCode,
    CodeExpired,
    NoActiveCode,
    TooManyAttempts,
}

impl LoginReason {
    pub const ALL: [LoginReason; 10] = [
        Self::Success,
        Self::UserNotFound,
        Self::AccountInactive,
        Self::AccountLocked,
        Self::InvalidPassword,
        Self::NoPassword,
        Self::InvalidCode,
        Self::CodeExpired,
        Self::NoActiveCode,
        Self::TooManyAttempts,
    ];
}

impl fmt::Display for LoginReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::UserNotFound => "user_not_found",
            Self::AccountInactive => "account_inactive",
            Self::AccountLocked => "account_locked",
            Self::InvalidPassword => "invalid_password",
            Self::NoPassword => "no_password",
            Self::InvalidCode => "invalid_code",
            Self::CodeExpired => "code_expired",
            Self::NoActiveCode => "no_active_code",
            Self::TooManyAttempts => "too_many_attempts",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown login reason: {0:?}")]
pub struct UnknownLoginReason(pub String);

impl FromStr for LoginReason {
    type Err = UnknownLoginReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.to_string() == s)
            .ok_or_else(|| UnknownLoginReason(s.to_owned()))
    }
}

/// One row of the append-only login history.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub identifier: String,
    pub reason: LoginReason,
    pub success: bool,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request metadata recorded with logins and sessions.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Browser/client family used by the new-device heuristic: the user agent
    /// up to its first `/` (`"Mozilla/5.0 (X11…)"` -> `"Mozilla"`).
    pub fn user_agent_prefix(&self) -> Option<&str> {
        user_agent_prefix(self.user_agent.as_deref()?)
    }
}

pub fn user_agent_prefix(user_agent: &str) -> Option<&str> {
    let prefix = user_agent.split('/').next().unwrap_or_default().trim();
    (!prefix.is_empty()).then_some(prefix)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nickname: Option<String>,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
}

/// Outbox event for async delivery (verification codes, login alerts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub aggregate_id: Uuid,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

impl OutboxEvent {
    pub fn new(kind: &str, aggregate_id: Uuid, payload: serde_json::Value) -> Self {
        let id = Uuid::now_v7();
        Self {
            id,
            kind: kind.to_owned(),
            aggregate_id,
            payload,
            idempotency_key: format!("{kind}:{id}"),
        }
    }
}

pub const EVENT_VERIFICATION_CODE_EMAIL: &str = "verification_code_email";
pub const EVENT_VERIFICATION_CODE_SMS: &str = "verification_code_sms";
pub const EVENT_SUSPICIOUS_LOGIN: &str = "suspicious_login";
