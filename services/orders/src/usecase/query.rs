use uuid::Uuid;
use worldbite_domain::pagination::PageRequest;
use worldbite_domain::tax_id::TaxId;

use crate::domain::repository::{OrderRepository, RestaurantRepository};
use crate::domain::types::Order;
use crate::error::OrdersError;
use crate::usecase::restaurant::restaurant_for;

pub struct ListCustomerOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListCustomerOrdersUseCase<O> {
    pub async fn execute(
        &self,
        customer_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        self.orders.list_by_customer(customer_id, page.clamped()).await
    }
}

pub struct GetCustomerOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetCustomerOrderUseCase<O> {
    pub async fn execute(&self, customer_id: Uuid, order_id: Uuid) -> Result<Order, OrdersError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrdersError::OrderNotFound)?;
        if order.customer_id != customer_id {
            return Err(OrdersError::Forbidden);
        }
        Ok(order)
    }
}

pub struct ListRestaurantOrdersUseCase<R: RestaurantRepository, O: OrderRepository> {
    pub restaurants: R,
    pub orders: O,
}

impl<R: RestaurantRepository, O: OrderRepository> ListRestaurantOrdersUseCase<R, O> {
    pub async fn execute(
        &self,
        tax_id: &TaxId,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        let restaurant = restaurant_for(&self.restaurants, tax_id).await?;
        self.orders
            .list_by_restaurant(restaurant.id, active_only, page.clamped())
            .await
    }
}
