use std::net::SocketAddr;

use anyhow::Context;
use sea_orm::Database;
use tracing::info;

use worldbite_core::config::Config;
use worldbite_core::tracing::init_tracing;
use worldbite_orders::config::OrdersConfig;
use worldbite_orders::router::build_router;
use worldbite_orders::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = OrdersConfig::try_from_env().context("invalid orders configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
    };

    let router = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.orders_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "orders service listening");
    axum::serve(listener, router).await.context("server error")
}
