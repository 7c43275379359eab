use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;
use worldbite_domain::pagination::PageRequest;
use worldbite_domain::tax_id::TaxId;

use crate::domain::repository::RestaurantRepository;
use crate::domain::types::Restaurant;
use crate::error::OrdersError;

/// Resolve the restaurant behind an `Authorization: CNPJ` header.
pub async fn restaurant_for<R: RestaurantRepository>(
    restaurants: &R,
    tax_id: &TaxId,
) -> Result<Restaurant, OrdersError> {
    restaurants
        .find_by_tax_id(tax_id.as_str())
        .await?
        .ok_or(OrdersError::Forbidden)
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RestaurantInput {
    pub name: String,
    pub tax_id: TaxId,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub opening_hours: Option<String>,
    pub delivery_fee: BigDecimal,
}

pub struct RegisterRestaurantUseCase<R: RestaurantRepository> {
    pub restaurants: R,
}

impl<R: RestaurantRepository> RegisterRestaurantUseCase<R> {
    pub async fn execute(&self, input: RestaurantInput) -> Result<Restaurant, OrdersError> {
        let name = input.name.trim();
        let address = input.address.trim();
        if name.is_empty() || address.is_empty() {
            return Err(OrdersError::Validation(
                "name and address are required".to_owned(),
            ));
        }
        if input.delivery_fee < BigDecimal::from(0) {
            return Err(OrdersError::Validation(
                "delivery fee must not be negative".to_owned(),
            ));
        }
        if self
            .restaurants
            .find_by_tax_id(input.tax_id.as_str())
            .await?
            .is_some()
        {
            return Err(OrdersError::Conflict("tax id already registered".to_owned()));
        }

        let restaurant = Restaurant {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            tax_id: input.tax_id.as_str().to_owned(),
            address: address.to_owned(),
            phone: input.phone,
            email: input.email,
            opening_hours: input.opening_hours,
            delivery_fee: input.delivery_fee.with_scale(2),
            active: true,
            created_at: Utc::now(),
        };
        self.restaurants.create(&restaurant).await?;
        tracing::info!(restaurant_id = %restaurant.id, "restaurant registered");
        Ok(restaurant)
    }
}

// ── Browse ───────────────────────────────────────────────────────────────────

pub struct ListRestaurantsUseCase<R: RestaurantRepository> {
    pub restaurants: R,
}

impl<R: RestaurantRepository> ListRestaurantsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Restaurant>, OrdersError> {
        self.restaurants.list_active(page.clamped()).await
    }
}

pub struct GetRestaurantUseCase<R: RestaurantRepository> {
    pub restaurants: R,
}

impl<R: RestaurantRepository> GetRestaurantUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Restaurant, OrdersError> {
        self.restaurants
            .find_by_id(id)
            .await?
            .ok_or(OrdersError::RestaurantNotFound)
    }
}
