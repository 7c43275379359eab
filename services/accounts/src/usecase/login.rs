use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use worldbite_auth_types::token::{
    ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP, issue_access_token, issue_refresh_token,
};
use worldbite_domain::contact::ContactIdentifier;

use crate::domain::repository::{
    CodeCache, LoginHistoryRepository, SessionRepository, UserRepository,
};
use crate::domain::types::{
    ClientInfo, LOCKOUT_MINUTES, LoginAttempt, LoginReason, MAX_FAILED_LOGINS, Session, User,
};
use crate::error::AccountsError;
use crate::infra::password::verify_password;
use crate::usecase::verification::verify_code;

pub enum Credential {
    Password(String),
    Code(String),
}

pub struct LoginInput {
    pub identifier: ContactIdentifier,
    pub credential: Credential,
    pub client: ClientInfo,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub session: IssuedSession,
    /// LoginHistory row of this login; excluded from the suspicious check.
    pub login_id: Uuid,
}

#[derive(Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
    pub session_id: Uuid,
}

/// Mint an access token and a session-bound refresh token, and persist the
/// session.
pub async fn open_session<S: SessionRepository>(
    sessions: &S,
    user_id: Uuid,
    client: &ClientInfo,
    jwt_secret: &str,
    now: DateTime<Utc>,
) -> Result<IssuedSession, AccountsError> {
    let now_secs = u64::try_from(now.timestamp()).unwrap_or_default();
    let session_id = Uuid::now_v7();
    let access_token = issue_access_token(user_id, jwt_secret, now_secs)
        .map_err(|e| AccountsError::Internal(e.into()))?;
    let refresh_token = issue_refresh_token(user_id, session_id, jwt_secret, now_secs)
        .map_err(|e| AccountsError::Internal(e.into()))?;

    sessions
        .create(&Session {
            id: session_id,
            user_id,
            refresh_token: refresh_token.clone(),
            expires_at: now + Duration::seconds(REFRESH_TOKEN_EXP as i64),
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            active: true,
            created_at: now,
            revoked_at: None,
        })
        .await?;

    Ok(IssuedSession {
        access_token,
        access_token_exp: now_secs + ACCESS_TOKEN_EXP,
        refresh_token,
        session_id,
    })
}

pub struct LoginUseCase<U, S, H, C>
where
    U: UserRepository,
    S: SessionRepository,
    H: LoginHistoryRepository,
    C: CodeCache,
{
    pub users: U,
    pub sessions: S,
    pub history: H,
    pub cache: C,
    pub jwt_secret: String,
}

impl<U, S, H, C> LoginUseCase<U, S, H, C>
where
    U: UserRepository,
    S: SessionRepository,
    H: LoginHistoryRepository,
    C: CodeCache,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AccountsError> {
        let LoginInput {
            identifier,
            credential,
            client,
        } = input;
        let now = Utc::now();

        let Some(user) = self.users.find_by_identifier(&identifier).await? else {
            self.record(None, &identifier, LoginReason::UserNotFound, &client, now)
                .await?;
            return Err(AccountsError::UserNotFound);
        };
        if !user.active {
            self.record(Some(user.id), &identifier, LoginReason::AccountInactive, &client, now)
                .await?;
            return Err(AccountsError::AccountInactive);
        }

        let user = match credential {
            Credential::Password(password) => {
                self.check_password(user, &identifier, &password, &client, now)
                    .await?
            }
            Credential::Code(code) => {
                let user_id = user.id;
                match verify_code(&self.users, &self.cache, user, &identifier, &code).await {
                    Ok(user) => user,
                    Err(err) => {
                        if let Some(reason) = code_failure_reason(&err) {
                            self.record(Some(user_id), &identifier, reason, &client, now)
                                .await?;
                        }
                        return Err(err);
                    }
                }
            }
        };

        self.users.record_login(user.id, now).await?;
        let issued = open_session(&self.sessions, user.id, &client, &self.jwt_secret, now).await?;
        let login_id = self
            .record(Some(user.id), &identifier, LoginReason::Success, &client, now)
            .await?;

        tracing::info!(user_id = %user.id, session_id = %issued.session_id, "login succeeded");
        let mut user = user;
        user.failed_login_attempts = 0;
        user.locked_until = None;
        user.last_login = Some(now);
        Ok(LoginOutput {
            user,
            session: issued,
            login_id,
        })
    }

    async fn check_password(
        &self,
        user: User,
        identifier: &ContactIdentifier,
        password: &str,
        client: &ClientInfo,
        now: DateTime<Utc>,
    ) -> Result<User, AccountsError> {
        if let Some(minutes) = user.lock_remaining_minutes(now) {
            self.record(Some(user.id), identifier, LoginReason::AccountLocked, client, now)
                .await?;
            return Err(AccountsError::AccountLocked { minutes });
        }
        let Some(hash) = user.password_hash.as_deref() else {
            self.record(Some(user.id), identifier, LoginReason::NoPassword, client, now)
                .await?;
            return Err(AccountsError::PasswordNotSet);
        };
        if verify_password(password, hash) {
            return Ok(user);
        }

        self.record(Some(user.id), identifier, LoginReason::InvalidPassword, client, now)
            .await?;
        // The store increments; the lock is decided on the count it returns.
        let Some(attempts) = self.users.record_failed_login(user.id, now).await? else {
            return Err(AccountsError::AccountLocked {
                minutes: LOCKOUT_MINUTES,
            });
        };
        if attempts < MAX_FAILED_LOGINS {
            return Err(AccountsError::InvalidCredentials);
        }

        self.users
            .lock_account(user.id, now + Duration::minutes(LOCKOUT_MINUTES))
            .await?;
        tracing::info!(user_id = %user.id, attempts, "account locked after failed logins");
        Err(AccountsError::AccountLocked {
            minutes: LOCKOUT_MINUTES,
        })
    }

    async fn record(
        &self,
        user_id: Option<Uuid>,
        identifier: &ContactIdentifier,
        reason: LoginReason,
        client: &ClientInfo,
        now: DateTime<Utc>,
    ) -> Result<Uuid, AccountsError> {
        let attempt = LoginAttempt {
            id: Uuid::now_v7(),
            user_id,
            identifier: identifier.to_string(),
            reason,
            success: reason == LoginReason::Success,
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            created_at: now,
        };
        self.history.record(&attempt).await?;
        Ok(attempt.id)
    }
}

fn code_failure_reason(err: &AccountsError) -> Option<LoginReason> {
    match err {
        AccountsError::InvalidCode => Some(LoginReason::InvalidCode),
        AccountsError::CodeExpired => Some(LoginReason::CodeExpired),
        AccountsError::NoActiveCode => Some(LoginReason::NoActiveCode),
        AccountsError::TooManyAttempts => Some(LoginReason::TooManyAttempts),
        _ => None,
    }
}
