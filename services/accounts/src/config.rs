use serde::Deserialize;
use worldbite_core::config::Config;

/// Accounts service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing access and refresh tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Domain attribute of the refresh cookie. Env var: `COOKIE_DOMAIN`.
    #[serde(default = "default_cookie_domain")]
    pub cookie_domain: String,
    /// TCP port to listen on. Env var: `ACCOUNTS_PORT`.
    #[serde(default = "default_port")]
    pub accounts_port: u16,
    /// When set, verification codes are cached in Redis instead of process
    /// memory. Env var: `REDIS_URL`.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Echo verification codes in responses (development only).
    /// Env var: `EXPOSE_TEST_CODES`.
    #[serde(default)]
    pub expose_test_codes: bool,
}

fn default_cookie_domain() -> String {
    "localhost".to_owned()
}

fn default_port() -> u16 {
    3001
}

impl Config for AccountsConfig {}
