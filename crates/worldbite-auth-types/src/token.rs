//! JWT access and refresh tokens.

#[cfg(any(feature = "USE_ONLY_IN_ACCOUNTS_SERVICE", test))]
use jsonwebtoken::{EncodingKey, Header, encode};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-token lifetime in seconds (15 minutes).
pub const ACCESS_TOKEN_EXP: u64 = 900;

/// Refresh-token and session lifetime in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 604_800;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// Customer identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub access_token_exp: u64,
}

/// Session reference carried by a validated refresh token.
#[derive(Debug, Clone)]
pub struct RefreshInfo {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub refresh_token_exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `sid` | custom | session ID, refresh tokens only |
/// | `typ` | custom | `"access"` or `"refresh"` |
/// | `exp` | `exp` | seconds since UNIX epoch |
///
/// `typ` keeps a refresh token from being accepted as a Bearer token and the
/// other way round. `sid` also makes every refresh token unique, so two logins
/// in the same second never collide on `sessions.refresh_token`.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub typ: String,
    pub exp: u64,
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

fn parse_uuid(raw: &str) -> Result<Uuid, AuthError> {
    raw.parse::<Uuid>().map_err(|_| AuthError::Malformed)
}

/// Validate a Bearer access token, returning the customer identity.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.typ != ACCESS {
        return Err(AuthError::Malformed);
    }
    Ok(TokenInfo {
        user_id: parse_uuid(&claims.sub)?,
        access_token_exp: claims.exp,
    })
}

/// Validate a refresh-token cookie value. A valid signature is not enough to
/// renew: the accounts service still checks the session row it points at.
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<RefreshInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.typ != REFRESH {
        return Err(AuthError::Malformed);
    }
    let session_id = claims.sid.as_deref().ok_or(AuthError::Malformed)?;
    Ok(RefreshInfo {
        user_id: parse_uuid(&claims.sub)?,
        session_id: parse_uuid(session_id)?,
        refresh_token_exp: claims.exp,
    })
}

// ── Feature-gated: accounts service only ─────────────────────────────────

#[cfg(any(feature = "USE_ONLY_IN_ACCOUNTS_SERVICE", test))]
fn encode_jwt(claims: &JwtClaims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Sign an access token valid for [`ACCESS_TOKEN_EXP`] seconds from `now`.
///
/// Requires the `USE_ONLY_IN_ACCOUNTS_SERVICE` feature; the accounts service
/// is the sole token issuer.
#[cfg(any(feature = "USE_ONLY_IN_ACCOUNTS_SERVICE", test))]
pub fn issue_access_token(user_id: Uuid, secret: &str, now: u64) -> Result<String, AuthError> {
    encode_jwt(
        &JwtClaims {
            sub: user_id.to_string(),
            sid: None,
            typ: ACCESS.to_owned(),
            exp: now + ACCESS_TOKEN_EXP,
        },
        secret,
    )
}

/// Sign a refresh token bound to `session_id`, valid for
/// [`REFRESH_TOKEN_EXP`] seconds from `now`.
#[cfg(any(feature = "USE_ONLY_IN_ACCOUNTS_SERVICE", test))]
pub fn issue_refresh_token(
    user_id: Uuid,
    session_id: Uuid,
    secret: &str,
    now: u64,
) -> Result<String, AuthError> {
    encode_jwt(
        &JwtClaims {
            sub: user_id.to_string(),
            sid: Some(session_id.to_string()),
            typ: REFRESH.to_owned(),
            exp: now + REFRESH_TOKEN_EXP,
        },
        secret,
    )
}
