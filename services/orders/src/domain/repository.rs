#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;
use worldbite_domain::order::OrderStatus;
use worldbite_domain::pagination::PageRequest;

use crate::domain::types::{CustomerAddress, Dish, Invoice, Order, OutboxEvent, Restaurant};
use crate::error::OrdersError;

pub trait RestaurantRepository: Send + Sync {
    /// Insert a restaurant. A duplicate tax id yields [`OrdersError::Conflict`].
    async fn create(&self, restaurant: &Restaurant) -> Result<(), OrdersError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, OrdersError>;

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Restaurant>, OrdersError>;

    /// Active restaurants ordered by name.
    async fn list_active(&self, page: PageRequest) -> Result<Vec<Restaurant>, OrdersError>;
}

pub trait DishRepository: Send + Sync {
    async fn create(&self, dish: &Dish) -> Result<(), OrdersError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dish>, OrdersError>;

    async fn update(&self, dish: &Dish) -> Result<(), OrdersError>;

    /// Available dishes of `restaurant_id`, by category then name.
    async fn list_available(&self, restaurant_id: Uuid) -> Result<Vec<Dish>, OrdersError>;
}

pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<(), OrdersError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrdersError>;

    /// Newest first.
    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError>;

    /// Newest first; `active_only` keeps non-terminal orders.
    async fn list_by_restaurant(
        &self,
        restaurant_id: Uuid,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError>;

    /// Non-terminal pickup order of `restaurant_id` holding `code`.
    async fn find_active_by_pickup_code(
        &self,
        restaurant_id: Uuid,
        code: &str,
    ) -> Result<Option<Order>, OrdersError>;

    /// Move `order_id` from `from` to `to`, only if it is still in `from`.
    /// `completed_at` is stamped when given. Returns whether the row changed.
    async fn transition(
        &self,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, OrdersError>;
}

/// Read access to addresses owned by the accounts service.
pub trait AddressLookup: Send + Sync {
    async fn find_address(&self, id: Uuid) -> Result<Option<CustomerAddress>, OrdersError>;
}

pub trait InvoiceRepository: Send + Sync {
    /// Store the invoice and its `invoice_issued` event atomically.
    async fn create_with_outbox(
        &self,
        invoice: &Invoice,
        event: &OutboxEvent,
    ) -> Result<(), OrdersError>;
}

pub trait OutboxRepository: Send + Sync {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), OrdersError>;
}
