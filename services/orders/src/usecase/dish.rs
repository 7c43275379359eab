use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;
use worldbite_domain::dish::DishCategory;
use worldbite_domain::tax_id::TaxId;

use crate::domain::repository::{DishRepository, RestaurantRepository};
use crate::domain::types::Dish;
use crate::error::OrdersError;
use crate::usecase::restaurant::restaurant_for;

fn check_price(price: &BigDecimal) -> Result<(), OrdersError> {
    if *price < BigDecimal::from(0) {
        return Err(OrdersError::Validation("price must not be negative".to_owned()));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<String, OrdersError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OrdersError::Validation("dish name is required".to_owned()));
    }
    Ok(name.to_owned())
}

pub struct DishInput {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: DishCategory,
}

#[derive(Default)]
pub struct DishPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub category: Option<DishCategory>,
    pub available: Option<bool>,
}

pub struct CreateDishUseCase<R: RestaurantRepository, D: DishRepository> {
    pub restaurants: R,
    pub dishes: D,
}

impl<R: RestaurantRepository, D: DishRepository> CreateDishUseCase<R, D> {
    pub async fn execute(&self, tax_id: &TaxId, input: DishInput) -> Result<Dish, OrdersError> {
        let restaurant = restaurant_for(&self.restaurants, tax_id).await?;
        check_price(&input.price)?;
        let dish = Dish {
            id: Uuid::now_v7(),
            restaurant_id: restaurant.id,
            name: check_name(&input.name)?,
            description: input.description,
            price: input.price.with_scale(2),
            category: input.category,
            available: true,
            created_at: Utc::now(),
        };
        self.dishes.create(&dish).await?;
        Ok(dish)
    }
}

pub struct UpdateDishUseCase<R: RestaurantRepository, D: DishRepository> {
    pub restaurants: R,
    pub dishes: D,
}

impl<R: RestaurantRepository, D: DishRepository> UpdateDishUseCase<R, D> {
    /// Price changes never touch placed orders; those keep their snapshot.
    pub async fn execute(
        &self,
        tax_id: &TaxId,
        dish_id: Uuid,
        patch: DishPatch,
    ) -> Result<Dish, OrdersError> {
        let restaurant = restaurant_for(&self.restaurants, tax_id).await?;
        let mut dish = self
            .dishes
            .find_by_id(dish_id)
            .await?
            .ok_or(OrdersError::DishNotFound)?;
        if dish.restaurant_id != restaurant.id {
            return Err(OrdersError::Forbidden);
        }

        if let Some(name) = patch.name {
            dish.name = check_name(&name)?;
        }
        if let Some(description) = patch.description {
            dish.description = Some(description);
        }
        if let Some(price) = patch.price {
            check_price(&price)?;
            dish.price = price.with_scale(2);
        }
        if let Some(category) = patch.category {
            dish.category = category;
        }
        if let Some(available) = patch.available {
            dish.available = available;
        }

        self.dishes.update(&dish).await?;
        Ok(dish)
    }
}

pub struct ListMenuUseCase<R: RestaurantRepository, D: DishRepository> {
    pub restaurants: R,
    pub dishes: D,
}

impl<R: RestaurantRepository, D: DishRepository> ListMenuUseCase<R, D> {
    /// Available dishes of a restaurant.
    pub async fn execute(&self, restaurant_id: Uuid) -> Result<Vec<Dish>, OrdersError> {
        self.restaurants
            .find_by_id(restaurant_id)
            .await?
            .ok_or(OrdersError::RestaurantNotFound)?;
        self.dishes.list_available(restaurant_id).await
    }
}
