use chrono::Utc;
use uuid::Uuid;
use worldbite_auth_types::token::{ACCESS_TOKEN_EXP, issue_access_token, validate_refresh_token};

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::types::Session;
use crate::error::AccountsError;

// ── Refresh ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshOutput {
    pub user_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
}

/// Mint a new access token from a refresh token. The refresh token is not
/// rotated.
pub struct RefreshTokenUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub sessions: S,
    pub jwt_secret: String,
}

impl<U: UserRepository, S: SessionRepository> RefreshTokenUseCase<U, S> {
    pub async fn execute(&self, refresh_token: &str) -> Result<RefreshOutput, AccountsError> {
        let claims = validate_refresh_token(refresh_token, &self.jwt_secret)
            .map_err(|_| AccountsError::InvalidRefreshToken)?;

        let now = Utc::now();
        let session = self
            .sessions
            .find_by_refresh_token(refresh_token)
            .await?
            .filter(|s| s.id == claims.session_id && s.is_usable(now))
            .ok_or(AccountsError::InvalidSession)?;

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AccountsError::InvalidSession)?;
        if !user.active {
            return Err(AccountsError::AccountInactive);
        }
        if !user.has_verified_channel() {
            return Err(AccountsError::AccountUnverified);
        }

        let now_secs = u64::try_from(now.timestamp()).unwrap_or_default();
        let access_token = issue_access_token(user.id, &self.jwt_secret, now_secs)
            .map_err(|e| AccountsError::Internal(e.into()))?;
        Ok(RefreshOutput {
            user_id: user.id,
            access_token,
            access_token_exp: now_secs + ACCESS_TOKEN_EXP,
        })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Idempotent: an unknown, already-inactive or absent token is not an error.
    pub async fn execute(&self, refresh_token: Option<&str>) -> Result<(), AccountsError> {
        if let Some(token) = refresh_token {
            let closed = self.sessions.deactivate_by_refresh_token(token).await?;
            tracing::debug!(closed, "logout");
        }
        Ok(())
    }
}

// ── Sessions of the caller ───────────────────────────────────────────────────

pub struct ListSessionsUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> ListSessionsUseCase<S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Session>, AccountsError> {
        self.sessions.list_active_by_user(user_id, Utc::now()).await
    }
}

pub struct RevokeSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> RevokeSessionUseCase<S> {
    /// Someone else's session and a missing one are indistinguishable: both
    /// are [`AccountsError::Forbidden`].
    pub async fn execute(&self, user_id: Uuid, session_id: Uuid) -> Result<(), AccountsError> {
        if self.sessions.revoke(session_id, user_id).await? {
            Ok(())
        } else {
            Err(AccountsError::Forbidden)
        }
    }
}
