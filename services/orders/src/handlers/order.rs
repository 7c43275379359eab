use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use worldbite_auth_types::identity::CustomerIdentity;
use worldbite_auth_types::restaurant::RestaurantTaxId;
use worldbite_core::envelope::ok;
use worldbite_core::validate::ValidatedJson;
use worldbite_domain::order::{DeliveryType, OrderAction};
use worldbite_domain::pagination::PageRequest;

use crate::error::OrdersError;
use crate::handlers::deserialize_money;
use crate::handlers::views::OrderView;
use crate::state::AppState;
use crate::usecase::lifecycle::{AdvanceStatusUseCase, CancelOrderUseCase, ConfirmPickupUseCase};
use crate::usecase::place_order::{CartLine, PlaceOrderInput, PlaceOrderUseCase};
use crate::usecase::query::{
    GetCustomerOrderUseCase, ListCustomerOrdersUseCase, ListRestaurantOrdersUseCase,
};

fn zero() -> BigDecimal {
    BigDecimal::from(0).with_scale(2)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub prato_id: Option<Uuid>,
    #[serde(default)]
    pub nome: String,
    #[serde(default = "zero", deserialize_with = "deserialize_money")]
    pub preco_unitario: BigDecimal,
    pub quantidade: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub restaurante_id: Uuid,
    pub tipo_entrega: DeliveryType,
    #[validate(length(min = 1, max = 100))]
    pub itens: Vec<CartItemRequest>,
    pub endereco_id: Option<Uuid>,
    #[validate(length(max = 500))]
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdvanceStatusRequest {
    pub acao: OrderAction,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmPickupRequest {
    #[validate(length(equal = 4))]
    pub codigo: String,
}

/// `?ativos=true` keeps only orders that can still change status.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantOrdersFilter {
    #[serde(default)]
    pub ativos: bool,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub pedido: OrderView,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub pedidos: Vec<OrderView>,
}

// ── Customer ─────────────────────────────────────────────────────────────────

pub async fn place_order(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    ValidatedJson(body): ValidatedJson<PlaceOrderRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = PlaceOrderUseCase {
        restaurants: state.restaurant_repo(),
        dishes: state.dish_repo(),
        orders: state.order_repo(),
        addresses: state.address_lookup(),
        invoices: state.invoice_repo(),
    };
    let input = PlaceOrderInput {
        customer_id: identity.user_id,
        restaurant_id: body.restaurante_id,
        delivery_type: body.tipo_entrega,
        items: body
            .itens
            .into_iter()
            .map(|i| CartLine {
                dish_id: i.prato_id,
                name: i.nome,
                unit_price: i.preco_unitario,
                quantity: i.quantidade,
            })
            .collect(),
        address_id: body.endereco_id,
        notes: body.observacoes,
    };
    let order = use_case.execute(input).await?;
    Ok((StatusCode::CREATED, ok(OrderResponse { pedido: order.into() })))
}

pub async fn list_my_orders(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = ListCustomerOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = use_case.execute(identity.user_id, page).await?;
    Ok(ok(OrderListResponse {
        pedidos: orders.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_my_order(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = GetCustomerOrderUseCase {
        orders: state.order_repo(),
    };
    let order = use_case.execute(identity.user_id, order_id).await?;
    Ok(ok(OrderResponse { pedido: order.into() }))
}

pub async fn cancel_my_order(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = CancelOrderUseCase {
        orders: state.order_repo(),
    };
    let order = use_case.execute(identity.user_id, order_id).await?;
    Ok(ok(OrderResponse { pedido: order.into() }))
}

// ── Restaurant ───────────────────────────────────────────────────────────────

pub async fn list_restaurant_orders(
    State(state): State<AppState>,
    RestaurantTaxId(tax_id): RestaurantTaxId,
    Query(page): Query<PageRequest>,
    Query(filter): Query<RestaurantOrdersFilter>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = ListRestaurantOrdersUseCase {
        restaurants: state.restaurant_repo(),
        orders: state.order_repo(),
    };
    let orders = use_case.execute(&tax_id, filter.ativos, page).await?;
    Ok(ok(OrderListResponse {
        pedidos: orders.into_iter().map(Into::into).collect(),
    }))
}

pub async fn advance_status(
    State(state): State<AppState>,
    RestaurantTaxId(tax_id): RestaurantTaxId,
    Path(order_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<AdvanceStatusRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = AdvanceStatusUseCase {
        restaurants: state.restaurant_repo(),
        orders: state.order_repo(),
        outbox: state.outbox_repo(),
    };
    let order = use_case.execute(&tax_id, order_id, body.acao).await?;
    Ok(ok(OrderResponse { pedido: order.into() }))
}

pub async fn confirm_pickup(
    State(state): State<AppState>,
    RestaurantTaxId(tax_id): RestaurantTaxId,
    ValidatedJson(body): ValidatedJson<ConfirmPickupRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = ConfirmPickupUseCase {
        restaurants: state.restaurant_repo(),
        orders: state.order_repo(),
    };
    let order = use_case.execute(&tax_id, &body.codigo).await?;
    Ok(ok(OrderResponse { pedido: order.into() }))
}
