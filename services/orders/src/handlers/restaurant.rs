use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use worldbite_core::envelope::ok;
use worldbite_core::validate::ValidatedJson;
use worldbite_domain::pagination::PageRequest;
use worldbite_domain::tax_id::TaxId;

use crate::error::OrdersError;
use crate::handlers::deserialize_money;
use crate::handlers::views::{DishView, RestaurantView};
use crate::state::AppState;
use crate::usecase::dish::ListMenuUseCase;
use crate::usecase::restaurant::{
    GetRestaurantUseCase, ListRestaurantsUseCase, RegisterRestaurantUseCase, RestaurantInput,
};

fn zero() -> BigDecimal {
    BigDecimal::from(0).with_scale(2)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRestaurantRequest {
    #[validate(length(min = 2, max = 120))]
    pub nome: String,
    pub cnpj: String,
    #[validate(length(min = 5, max = 300))]
    pub endereco: String,
    #[validate(length(max = 20))]
    pub telefone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub horario_funcionamento: Option<String>,
    #[serde(default = "zero", deserialize_with = "deserialize_money")]
    pub taxa_entrega: BigDecimal,
}

#[derive(Serialize)]
pub struct RestaurantResponse {
    pub restaurante: RestaurantView,
}

#[derive(Serialize)]
pub struct RestaurantListResponse {
    pub restaurantes: Vec<RestaurantView>,
}

#[derive(Serialize)]
pub struct MenuResponse {
    pub pratos: Vec<DishView>,
}

pub async fn register_restaurant(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRestaurantRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let tax_id = TaxId::parse(&body.cnpj).map_err(|e| OrdersError::Validation(e.to_string()))?;
    let use_case = RegisterRestaurantUseCase {
        restaurants: state.restaurant_repo(),
    };
    let restaurant = use_case
        .execute(RestaurantInput {
            name: body.nome,
            tax_id,
            address: body.endereco,
            phone: body.telefone,
            email: body.email,
            opening_hours: body.horario_funcionamento,
            delivery_fee: body.taxa_entrega,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        ok(RestaurantResponse {
            restaurante: restaurant.into(),
        }),
    ))
}

pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = ListRestaurantsUseCase {
        restaurants: state.restaurant_repo(),
    };
    let restaurants = use_case.execute(page).await?;
    Ok(ok(RestaurantListResponse {
        restaurantes: restaurants.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = GetRestaurantUseCase {
        restaurants: state.restaurant_repo(),
    };
    let restaurant = use_case.execute(restaurant_id).await?;
    Ok(ok(RestaurantResponse {
        restaurante: restaurant.into(),
    }))
}

pub async fn get_menu(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = ListMenuUseCase {
        restaurants: state.restaurant_repo(),
        dishes: state.dish_repo(),
    };
    let dishes = use_case.execute(restaurant_id).await?;
    Ok(ok(MenuResponse {
        pratos: dishes.into_iter().map(Into::into).collect(),
    }))
}
