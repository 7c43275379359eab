//! Refresh-token cookie builders.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::token::REFRESH_TOKEN_EXP;

/// Cookie name for the refresh token.
pub const WORLDBITE_REFRESH_TOKEN: &str = "worldbite_refresh_token";

/// Scoped so only the renew and logout endpoints receive the cookie.
const REFRESH_COOKIE_PATH: &str = "/api/usuarios";

/// Set the refresh-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use worldbite_auth_types::cookie::{set_refresh_token_cookie, WORLDBITE_REFRESH_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_refresh_token_cookie(jar, "refresh_value".to_string(), "example.com".to_string());
/// let cookie = jar.get(WORLDBITE_REFRESH_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/api/usuarios"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_refresh_token_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((WORLDBITE_REFRESH_TOKEN, value))
        .path(REFRESH_COOKIE_PATH)
        .domain(domain)
        .max_age(Duration::seconds(REFRESH_TOKEN_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read the refresh token from the request cookies, if present and non-empty.
pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(WORLDBITE_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

/// Clear the refresh cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use worldbite_auth_types::cookie::{
///     clear_refresh_cookie, set_refresh_token_cookie, WORLDBITE_REFRESH_TOKEN,
/// };
///
/// let domain = "example.com".to_string();
/// let jar = set_refresh_token_cookie(CookieJar::new(), "r".to_string(), domain.clone());
/// let jar = clear_refresh_cookie(jar, domain);
/// let refresh = jar.get(WORLDBITE_REFRESH_TOKEN).unwrap();
/// assert_eq!(refresh.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(refresh.value(), "");
/// ```
pub fn clear_refresh_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let refresh = Cookie::build((WORLDBITE_REFRESH_TOKEN, ""))
        .path(REFRESH_COOKIE_PATH)
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(refresh)
}
