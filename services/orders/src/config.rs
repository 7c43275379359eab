use serde::Deserialize;
use worldbite_core::config::Config;

/// Orders service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct OrdersConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Secret shared with the accounts service for verifying access tokens.
    /// Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Env var: `ORDERS_PORT`.
    #[serde(default = "default_port")]
    pub orders_port: u16,
}

fn default_port() -> u16 {
    3002
}

impl Config for OrdersConfig {}
