use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use worldbite_domain::dish::DishCategory;
use worldbite_domain::order::{DeliveryType, OrderStatus};

/// Pickup codes are this many decimal digits.
pub const PICKUP_CODE_LEN: usize = 4;
/// Draws before giving up on finding a code no active order holds.
pub const PICKUP_CODE_MAX_ATTEMPTS: usize = 20;

pub const EVENT_INVOICE_ISSUED: &str = "invoice_issued";
pub const EVENT_ORDER_STATUS_CHANGED: &str = "order_status_changed";

#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    /// 14 CNPJ digits.
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub opening_hours: Option<String>,
    pub delivery_fee: BigDecimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Dish {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: DishCategory,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Line of an order, frozen at placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dish_id: Option<Uuid>,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// Delivery address frozen at placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Address as stored by the accounts service, with its owner.
#[derive(Debug, Clone)]
pub struct CustomerAddress {
    pub user_id: Uuid,
    pub snapshot: AddressSnapshot,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub items: Vec<OrderItem>,
    pub delivery_type: DeliveryType,
    pub status: OrderStatus,
    pub pickup_code: Option<String>,
    pub subtotal: BigDecimal,
    pub delivery_fee: Option<BigDecimal>,
    pub total: BigDecimal,
    pub notes: Option<String>,
    pub delivery_address: Option<AddressSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// `(subtotal, total)` for `items`. The fee is added to the total as given;
/// callers pass `None` for pickup orders.
pub fn order_totals(
    items: &[OrderItem],
    delivery_fee: Option<&BigDecimal>,
) -> (BigDecimal, BigDecimal) {
    let subtotal = items
        .iter()
        .map(OrderItem::line_total)
        .fold(BigDecimal::from(0), |acc, line| acc + line)
        .with_scale(2);
    let total = match delivery_fee {
        Some(fee) => (&subtotal + fee).with_scale(2),
        None => subtotal.clone(),
    };
    (subtotal, total)
}

/// Random zero-padded pickup code.
pub fn generate_pickup_code() -> String {
    let mut rng = rand::rng();
    (0..PICKUP_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: Uuid,
    pub order_id: Uuid,
    pub number: String,
    pub items: Vec<OrderItem>,
    pub total: BigDecimal,
    pub issued_at: DateTime<Utc>,
}

impl Invoice {
    /// Invoice for `order`, numbered `WB-YYYYMMDD-<8 hex>`.
    pub fn for_order(order: &Order, now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        Self {
            id: Uuid::now_v7(),
            order_id: order.id,
            number: format!("WB-{}-{suffix}", now.format("%Y%m%d")),
            items: order.items.clone(),
            total: order.total.clone(),
            issued_at: now,
        }
    }
}

/// Outbox event for async delivery (invoices, order notifications).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub aggregate_id: Uuid,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

impl OutboxEvent {
    pub fn new(kind: &str, aggregate_id: Uuid, payload: serde_json::Value) -> Self {
        let id = Uuid::now_v7();
        Self {
            id,
            kind: kind.to_owned(),
            aggregate_id,
            payload,
            idempotency_key: format!("{kind}:{id}"),
        }
    }
}
