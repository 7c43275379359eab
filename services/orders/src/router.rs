use axum::{
    Router,
    routing::{get, patch, post},
};

use worldbite_core::health::{healthz, readyz};
use worldbite_core::middleware::with_http_layers;

use crate::handlers::{
    dish::{create_dish, update_dish},
    order::{
        advance_status, cancel_my_order, confirm_pickup, get_my_order, list_my_orders,
        list_restaurant_orders, place_order,
    },
    restaurant::{get_menu, get_restaurant, list_restaurants, register_restaurant},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Restaurants and menus
        .route(
            "/api/restaurantes",
            get(list_restaurants).post(register_restaurant),
        )
        .route("/api/restaurantes/{id}", get(get_restaurant))
        .route("/api/restaurantes/{id}/pratos", get(get_menu))
        .route("/api/restaurantes/pratos", post(create_dish))
        .route("/api/restaurantes/pratos/{id}", patch(update_dish))
        // Customer orders
        .route("/api/pedidos/finalizar", post(place_order))
        .route("/api/pedidos", get(list_my_orders))
        .route("/api/pedidos/{id}", get(get_my_order))
        .route("/api/pedidos/{id}/cancelar", post(cancel_my_order))
        // Restaurant counter
        .route("/api/pedidos/restaurante", get(list_restaurant_orders))
        .route("/api/pedidos/{id}/status", post(advance_status))
        .route("/api/pedidos/confirmar-retirada", post(confirm_pickup))
        .with_state(state);
    with_http_layers(router)
}
