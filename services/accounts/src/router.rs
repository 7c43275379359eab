use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use worldbite_core::health::{healthz, readyz};
use worldbite_core::middleware::with_http_layers;

use crate::handlers::{
    address::{create_address, delete_address, list_addresses, update_address},
    code::{request_email_code, request_sms_code},
    login::{login_with_code, login_with_password, logout, refresh},
    me::{
        confirm_email_verification, delete_me, get_me, list_sessions, login_history,
        request_email_verification, revoke_session, set_password, update_me,
    },
    signup::signup,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Signup and verification codes
        .route("/api/usuarios/cadastro", post(signup))
        .route("/api/usuarios/codigo-email", post(request_email_code))
        .route("/api/usuarios/codigo-sms", post(request_sms_code))
        // Sessions
        .route("/api/usuarios/login", post(login_with_code))
        .route("/api/usuarios/login-senha", post(login_with_password))
        .route("/api/usuarios/token/renovar", post(refresh))
        .route("/api/usuarios/logout", post(logout))
        // Profile
        .route(
            "/api/usuarios/me",
            get(get_me).patch(update_me).delete(delete_me),
        )
        .route("/api/usuarios/me/senha", put(set_password))
        .route(
            "/api/usuarios/me/verificar-email",
            post(request_email_verification),
        )
        .route(
            "/api/usuarios/me/confirmar-email",
            post(confirm_email_verification),
        )
        .route("/api/usuarios/me/sessoes", get(list_sessions))
        .route("/api/usuarios/me/sessoes/{id}", delete(revoke_session))
        .route("/api/usuarios/me/historico-login", get(login_history))
        // Addresses
        .route("/api/enderecos", get(list_addresses).post(create_address))
        .route(
            "/api/enderecos/{id}",
            patch(update_address).delete(delete_address),
        )
        .with_state(state);
    with_http_layers(router)
}
