use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use worldbite_core::error::error_response;

/// Accounts service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    #[error("{0}")]
    Validation(String),
    #[error("user not found")]
    UserNotFound,
    #[error("account is inactive")]
    AccountInactive,
    #[error("account has no verified email or phone")]
    AccountUnverified,
    #[error("account locked, try again in {minutes} minute(s)")]
    AccountLocked { minutes: i64 },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password login is not enabled for this account")]
    PasswordNotSet,
    #[error("no active verification code, request a new one")]
    NoActiveCode,
    #[error("invalid verification code")]
    InvalidCode,
    #[error("verification code expired")]
    CodeExpired,
    #[error("too many attempts, request a new code")]
    TooManyAttempts,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("session expired or revoked")]
    InvalidSession,
    #[error("{0}")]
    Conflict(String),
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountsError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "INVALID_INPUT",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::AccountUnverified => "ACCOUNT_UNVERIFIED",
            Self::AccountLocked { .. } => "ACCOUNT_LOCKED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PasswordNotSet => "PASSWORD_NOT_SET",
            Self::NoActiveCode => "NO_ACTIVE_CODE",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::InvalidSession => "INVALID_SESSION",
            Self::Conflict(_) => "CONFLICT",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::PasswordNotSet
            | Self::NoActiveCode
            | Self::InvalidCode
            | Self::CodeExpired => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidRefreshToken | Self::InvalidSession => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountInactive
            | Self::AccountUnverified
            | Self::AccountLocked { .. }
            | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
