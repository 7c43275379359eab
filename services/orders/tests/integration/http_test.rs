//! Requests rejected before any repository is touched, so the router runs
//! against a disconnected database.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use worldbite_testing::auth::{MockAuth, MockRestaurant, TEST_JWT_SECRET};
use worldbite_testing::response::assert_failure;

use worldbite_orders::router::build_router;
use worldbite_orders::state::AppState;

fn app() -> Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    })
}

fn post(uri: &str, headers: HeaderMap, body: serde_json::Value) -> Request<Body> {
    let mut req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    req.headers_mut().extend(headers);
    req
}

#[tokio::test]
async fn should_answer_liveness_check() {
    let resp = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_require_bearer_token_to_place_order() {
    let body = json!({
        "restauranteId": Uuid::now_v7(),
        "tipoEntrega": "pickup",
        "itens": [{ "nome": "Pastel", "precoUnitario": "9.50", "quantidade": 1 }]
    });
    let resp = app()
        .oneshot(post("/api/pedidos/finalizar", HeaderMap::new(), body))
        .await
        .unwrap();
    assert_failure(resp, 401, "UNAUTHORIZED").await;
}

#[tokio::test]
async fn should_reject_empty_cart_with_400() {
    let body = json!({
        "restauranteId": Uuid::now_v7(),
        "tipoEntrega": "pickup",
        "itens": []
    });
    let auth = MockAuth::new(Uuid::now_v7()).headers();

    let resp = app()
        .oneshot(post("/api/pedidos/finalizar", auth, body))
        .await
        .unwrap();
    let json = assert_failure(resp, 400, "INVALID_INPUT").await;
    assert!(json["erro"].as_str().unwrap().contains("itens"), "{json}");
}

#[tokio::test]
async fn should_reject_unknown_delivery_type_as_malformed() {
    let body = json!({
        "restauranteId": Uuid::now_v7(),
        "tipoEntrega": "drone",
        "itens": [{ "nome": "Pastel", "precoUnitario": "9.50", "quantidade": 1 }]
    });
    let auth = MockAuth::new(Uuid::now_v7()).headers();

    let resp = app()
        .oneshot(post("/api/pedidos/finalizar", auth, body))
        .await
        .unwrap();
    assert_failure(resp, 400, "MALFORMED_BODY").await;
}

#[tokio::test]
async fn should_require_cnpj_for_restaurant_endpoints() {
    let body = json!({ "codigo": "1234" });
    let resp = app()
        .oneshot(post("/api/pedidos/confirmar-retirada", HeaderMap::new(), body))
        .await
        .unwrap();
    assert_failure(resp, 401, "UNAUTHORIZED").await;

    let req = Request::get("/api/pedidos/restaurante")
        .header(header::AUTHORIZATION, "CNPJ 123")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_failure(resp, 401, "UNAUTHORIZED").await;
}

#[tokio::test]
async fn should_validate_pickup_code_length() {
    let body = json!({ "codigo": "12345" });
    let cnpj = MockRestaurant::new("12345678000190").headers();

    let resp = app()
        .oneshot(post("/api/pedidos/confirmar-retirada", cnpj, body))
        .await
        .unwrap();
    assert_failure(resp, 400, "INVALID_INPUT").await;
}
