//! Status transitions after placement.
//!
//! Every transition is a conditional update on the status the caller
//! observed, so two concurrent requests cannot both move the same order.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;
use worldbite_domain::order::{DeliveryType, OrderAction, OrderStatus};
use worldbite_domain::tax_id::TaxId;

use crate::domain::repository::{OrderRepository, OutboxRepository, RestaurantRepository};
use crate::domain::types::{EVENT_ORDER_STATUS_CHANGED, Order, OutboxEvent};
use crate::error::OrdersError;
use crate::usecase::restaurant::restaurant_for;

fn completion_time(status: OrderStatus, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    matches!(status, OrderStatus::PickedUp | OrderStatus::Delivered).then_some(now)
}

/// Apply the outcome of a successful transition to the in-memory copy.
fn moved(mut order: Order, to: OrderStatus, now: DateTime<Utc>) -> Order {
    order.status = to;
    order.updated_at = now;
    if let Some(at) = completion_time(to, now) {
        order.completed_at = Some(at);
    }
    order
}

/// Queue an `order_status_changed` event for the customer.
pub async fn notify_status_change<X: OutboxRepository>(
    outbox: &X,
    order: &Order,
) -> Result<(), OrdersError> {
    let event = OutboxEvent::new(
        EVENT_ORDER_STATUS_CHANGED,
        order.id,
        json!({
            "orderId": order.id,
            "customerId": order.customer_id,
            "restaurantName": order.restaurant_name,
            "status": order.status,
        }),
    );
    outbox.enqueue(&event).await
}

// ── Restaurant-driven transitions ────────────────────────────────────────────

pub struct AdvanceStatusUseCase<R, O, X>
where
    R: RestaurantRepository,
    O: OrderRepository,
    X: OutboxRepository,
{
    pub restaurants: R,
    pub orders: O,
    pub outbox: X,
}

impl<R, O, X> AdvanceStatusUseCase<R, O, X>
where
    R: RestaurantRepository,
    O: OrderRepository,
    X: OutboxRepository,
{
    pub async fn execute(
        &self,
        tax_id: &TaxId,
        order_id: Uuid,
        action: OrderAction,
    ) -> Result<Order, OrdersError> {
        let restaurant = restaurant_for(&self.restaurants, tax_id).await?;
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .filter(|o| o.restaurant_id == restaurant.id)
            .ok_or(OrdersError::OrderNotFound)?;

        let from = order.status;
        let to = from
            .apply(action, order.delivery_type)
            .ok_or(OrdersError::InvalidTransition {
                status: from,
                action,
            })?;

        let now = Utc::now();
        if !self
            .orders
            .transition(order.id, from, to, now, completion_time(to, now))
            .await?
        {
            return Err(OrdersError::StatusConflict);
        }
        let order = moved(order, to, now);
        tracing::info!(order_id = %order.id, from = %from, to = %to, "order status changed");

        if to.notifies_customer() {
            if let Err(e) = notify_status_change(&self.outbox, &order).await {
                tracing::warn!(
                    error = ?e,
                    order_id = %order.id,
                    "failed to queue status notification"
                );
            }
        }
        Ok(order)
    }
}

// ── Pickup counter ───────────────────────────────────────────────────────────

pub struct ConfirmPickupUseCase<R, O>
where
    R: RestaurantRepository,
    O: OrderRepository,
{
    pub restaurants: R,
    pub orders: O,
}

impl<R, O> ConfirmPickupUseCase<R, O>
where
    R: RestaurantRepository,
    O: OrderRepository,
{
    /// Hand over the pending or ready pickup order holding `code`. A code is
    /// good for one handover: afterwards the order is terminal and no longer
    /// matches.
    pub async fn execute(&self, tax_id: &TaxId, code: &str) -> Result<Order, OrdersError> {
        let restaurant = restaurant_for(&self.restaurants, tax_id).await?;
        let code = code.trim();
        // Codes are unique among active orders, so the active match is the
        // only candidate; one still in the kitchen is not handed over.
        let order = self
            .orders
            .find_active_by_pickup_code(restaurant.id, code)
            .await?
            .filter(|o| o.delivery_type == DeliveryType::Pickup)
            .filter(|o| o.status.accepts_pickup_code())
            .ok_or(OrdersError::InvalidPickupCode)?;

        let now = Utc::now();
        if !self
            .orders
            .transition(order.id, order.status, OrderStatus::PickedUp, now, Some(now))
            .await?
        {
            return Err(OrdersError::InvalidPickupCode);
        }
        let order = moved(order, OrderStatus::PickedUp, now);
        tracing::info!(order_id = %order.id, restaurant_id = %restaurant.id, "pickup confirmed");
        Ok(order)
    }
}

// ── Customer cancel ──────────────────────────────────────────────────────────

pub struct CancelOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CancelOrderUseCase<O> {
    /// Customers may cancel their own orders until the restaurant confirms.
    pub async fn execute(&self, customer_id: Uuid, order_id: Uuid) -> Result<Order, OrdersError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrdersError::OrderNotFound)?;
        if order.customer_id != customer_id {
            return Err(OrdersError::Forbidden);
        }
        if order.status != OrderStatus::Pending {
            return Err(OrdersError::InvalidTransition {
                status: order.status,
                action: OrderAction::Cancel,
            });
        }

        let now = Utc::now();
        if !self
            .orders
            .transition(order.id, OrderStatus::Pending, OrderStatus::Cancelled, now, None)
            .await?
        {
            return Err(OrdersError::StatusConflict);
        }
        tracing::info!(order_id = %order.id, "order cancelled by customer");
        Ok(moved(order, OrderStatus::Cancelled, now))
    }
}
