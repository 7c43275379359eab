use std::net::SocketAddr;

use anyhow::Context;
use sea_orm::Database;
use tracing::info;

use worldbite_accounts::config::AccountsConfig;
use worldbite_accounts::infra::cache::{CodeCacheBackend, MemoryCodeCache, RedisCodeCache};
use worldbite_accounts::router::build_router;
use worldbite_accounts::state::AppState;
use worldbite_core::config::Config;
use worldbite_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AccountsConfig::try_from_env().context("invalid accounts configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let cache = match &config.redis_url {
        Some(url) => {
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .context("failed to create Redis pool")?;
            info!("verification codes cached in Redis");
            CodeCacheBackend::Redis(RedisCodeCache { pool })
        }
        None => CodeCacheBackend::Memory(MemoryCodeCache::new()),
    };

    let state = AppState {
        db,
        cache,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        expose_test_codes: config.expose_test_codes,
    };

    let router = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.accounts_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "accounts service listening");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")
}
