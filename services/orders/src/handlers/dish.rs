use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use worldbite_auth_types::restaurant::RestaurantTaxId;
use worldbite_core::envelope::ok;
use worldbite_core::validate::ValidatedJson;
use worldbite_domain::dish::DishCategory;

use crate::error::OrdersError;
use crate::handlers::views::DishView;
use crate::handlers::{deserialize_money, deserialize_money_opt};
use crate::state::AppState;
use crate::usecase::dish::{CreateDishUseCase, DishInput, DishPatch, UpdateDishUseCase};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome: String,
    #[validate(length(max = 500))]
    pub descricao: Option<String>,
    #[serde(deserialize_with = "deserialize_money")]
    pub preco: BigDecimal,
    pub categoria: DishCategory,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDishRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome: Option<String>,
    #[validate(length(max = 500))]
    pub descricao: Option<String>,
    #[serde(default, deserialize_with = "deserialize_money_opt")]
    pub preco: Option<BigDecimal>,
    pub categoria: Option<DishCategory>,
    pub disponivel: Option<bool>,
}

#[derive(Serialize)]
pub struct DishResponse {
    pub prato: DishView,
}

pub async fn create_dish(
    State(state): State<AppState>,
    RestaurantTaxId(tax_id): RestaurantTaxId,
    ValidatedJson(body): ValidatedJson<CreateDishRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = CreateDishUseCase {
        restaurants: state.restaurant_repo(),
        dishes: state.dish_repo(),
    };
    let dish = use_case
        .execute(
            &tax_id,
            DishInput {
                name: body.nome,
                description: body.descricao,
                price: body.preco,
                category: body.categoria,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, ok(DishResponse { prato: dish.into() })))
}

pub async fn update_dish(
    State(state): State<AppState>,
    RestaurantTaxId(tax_id): RestaurantTaxId,
    Path(dish_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateDishRequest>,
) -> Result<impl IntoResponse, OrdersError> {
    let use_case = UpdateDishUseCase {
        restaurants: state.restaurant_repo(),
        dishes: state.dish_repo(),
    };
    let patch = DishPatch {
        name: body.nome,
        description: body.descricao,
        price: body.preco,
        category: body.categoria,
        available: body.disponivel,
    };
    let dish = use_case.execute(&tax_id, dish_id, patch).await?;
    Ok(ok(DishResponse { prato: dish.into() }))
}
