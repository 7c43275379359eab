//! Bearer access-token extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::{StatusCode, header};
use uuid::Uuid;
use worldbite_core::error::error_response;

use crate::token::{AuthError, validate_access_token};

/// HS256 secret shared by the issuer and every validating service.
/// Service state exposes it through `FromRef`.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Customer authenticated by `Authorization: Bearer <access token>`.
#[derive(Debug, Clone)]
pub struct CustomerIdentity {
    pub user_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityRejection {
    #[error("missing bearer token")]
    Missing,
    #[error("invalid access token: {0}")]
    Invalid(#[from] AuthError),
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let kind = match self {
            Self::Missing => "UNAUTHORIZED",
            Self::Invalid(AuthError::Expired) => "TOKEN_EXPIRED",
            Self::Invalid(_) => "INVALID_TOKEN",
        };
        error_response(StatusCode::UNAUTHORIZED, kind, &self.to_string())
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for CustomerIdentity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    // Same E0195 workaround as every extractor here: resolve synchronously,
    // return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let JwtSecret(secret) = JwtSecret::from_ref(state);
        let result = match bearer_token(parts) {
            None => Err(IdentityRejection::Missing),
            Some(token) => validate_access_token(token, &secret)
                .map(|info| Self {
                    user_id: info.user_id,
                })
                .map_err(IdentityRejection::from),
        };

        async move { result }
    }
}
