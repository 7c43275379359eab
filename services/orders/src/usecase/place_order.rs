use bigdecimal::BigDecimal;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use worldbite_domain::order::{DeliveryType, OrderStatus};

use crate::domain::repository::{
    AddressLookup, DishRepository, InvoiceRepository, OrderRepository, RestaurantRepository,
};
use crate::domain::types::{
    AddressSnapshot, EVENT_INVOICE_ISSUED, Invoice, Order, OrderItem, OutboxEvent,
    PICKUP_CODE_MAX_ATTEMPTS, generate_pickup_code, order_totals,
};
use crate::error::OrdersError;

/// One cart line as submitted at checkout.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// When set, the dish's current name and price replace the submitted ones.
    pub dish_id: Option<Uuid>,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderInput {
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_type: DeliveryType,
    pub items: Vec<CartLine>,
    /// One of the customer's saved addresses; delivery orders only.
    pub address_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub struct PlaceOrderUseCase<R, D, O, A, I>
where
    R: RestaurantRepository,
    D: DishRepository,
    O: OrderRepository,
    A: AddressLookup,
    I: InvoiceRepository,
{
    pub restaurants: R,
    pub dishes: D,
    pub orders: O,
    pub addresses: A,
    pub invoices: I,
}

impl<R, D, O, A, I> PlaceOrderUseCase<R, D, O, A, I>
where
    R: RestaurantRepository,
    D: DishRepository,
    O: OrderRepository,
    A: AddressLookup,
    I: InvoiceRepository,
{
    pub async fn execute(&self, input: PlaceOrderInput) -> Result<Order, OrdersError> {
        validate_cart(&input.items)?;

        let restaurant = self
            .restaurants
            .find_by_id(input.restaurant_id)
            .await?
            .ok_or(OrdersError::RestaurantNotFound)?;
        if !restaurant.active {
            return Err(OrdersError::RestaurantInactive);
        }

        let mut items = Vec::with_capacity(input.items.len());
        for line in input.items {
            items.push(self.snapshot_line(restaurant.id, line).await?);
        }

        let (delivery_fee, pickup_code, delivery_address) = match input.delivery_type {
            DeliveryType::Pickup => {
                let code = self.allocate_pickup_code(restaurant.id).await?;
                (None, Some(code), None)
            }
            DeliveryType::Delivery => {
                let address = match input.address_id {
                    Some(id) => Some(self.snapshot_address(input.customer_id, id).await?),
                    None => None,
                };
                (Some(restaurant.delivery_fee.clone()), None, address)
            }
        };
        let (subtotal, total) = order_totals(&items, delivery_fee.as_ref());

        let now = Utc::now();
        let order = Order {
            id: Uuid::now_v7(),
            customer_id: input.customer_id,
            restaurant_id: restaurant.id,
            restaurant_name: restaurant.name,
            items,
            delivery_type: input.delivery_type,
            status: OrderStatus::Pending,
            pickup_code,
            subtotal,
            delivery_fee,
            total,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            delivery_address,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.orders.create(&order).await?;
        tracing::info!(
            order_id = %order.id,
            restaurant_id = %order.restaurant_id,
            delivery_type = %order.delivery_type,
            total = %order.total,
            "order placed"
        );

        if let Err(e) = self.issue_invoice(&order).await {
            tracing::warn!(error = ?e, order_id = %order.id, "failed to issue invoice");
        }
        Ok(order)
    }

    async fn snapshot_line(
        &self,
        restaurant_id: Uuid,
        line: CartLine,
    ) -> Result<OrderItem, OrdersError> {
        // Quantity was range-checked by validate_cart.
        let quantity = u32::try_from(line.quantity)
            .map_err(|_| OrdersError::Validation("quantity out of range".to_owned()))?;
        let Some(dish_id) = line.dish_id else {
            return Ok(OrderItem {
                dish_id: None,
                name: line.name.trim().to_owned(),
                unit_price: line.unit_price.with_scale(2),
                quantity,
            });
        };

        let dish = self
            .dishes
            .find_by_id(dish_id)
            .await?
            .filter(|d| d.restaurant_id == restaurant_id)
            .ok_or(OrdersError::DishNotFound)?;
        if !dish.available {
            return Err(OrdersError::DishUnavailable(dish.name));
        }
        Ok(OrderItem {
            dish_id: Some(dish.id),
            name: dish.name,
            unit_price: dish.price,
            quantity,
        })
    }

    /// Draw codes until one is not held by another active pickup order of the
    /// same restaurant.
    async fn allocate_pickup_code(&self, restaurant_id: Uuid) -> Result<String, OrdersError> {
        for _ in 0..PICKUP_CODE_MAX_ATTEMPTS {
            let code = generate_pickup_code();
            if self
                .orders
                .find_active_by_pickup_code(restaurant_id, &code)
                .await?
                .is_none()
            {
                return Ok(code);
            }
        }
        Err(OrdersError::Internal(anyhow::anyhow!(
            "no free pickup code after {PICKUP_CODE_MAX_ATTEMPTS} attempts"
        )))
    }

    /// Missing and foreign addresses are both [`OrdersError::Forbidden`].
    async fn snapshot_address(
        &self,
        customer_id: Uuid,
        address_id: Uuid,
    ) -> Result<AddressSnapshot, OrdersError> {
        self.addresses
            .find_address(address_id)
            .await?
            .filter(|a| a.user_id == customer_id)
            .map(|a| a.snapshot)
            .ok_or(OrdersError::Forbidden)
    }

    async fn issue_invoice(&self, order: &Order) -> Result<(), OrdersError> {
        let invoice = Invoice::for_order(order, Utc::now());
        let event = OutboxEvent::new(
            EVENT_INVOICE_ISSUED,
            order.id,
            json!({
                "orderId": order.id,
                "customerId": order.customer_id,
                "invoiceNumber": invoice.number,
                "restaurantName": order.restaurant_name,
                "items": invoice.items,
                "total": invoice.total,
                "issuedAt": invoice.issued_at,
            }),
        );
        self.invoices.create_with_outbox(&invoice, &event).await?;
        tracing::info!(order_id = %order.id, number = %invoice.number, "invoice issued");
        Ok(())
    }
}

/// Non-empty cart, positive quantities, non-negative prices.
pub fn validate_cart(items: &[CartLine]) -> Result<(), OrdersError> {
    if items.is_empty() {
        return Err(OrdersError::Validation("cart is empty".to_owned()));
    }
    for (i, line) in items.iter().enumerate() {
        if line.quantity <= 0 || line.quantity > i64::from(u32::MAX) {
            return Err(OrdersError::Validation(format!(
                "item {i}: quantity must be positive"
            )));
        }
        if line.unit_price < BigDecimal::from(0) {
            return Err(OrdersError::Validation(format!(
                "item {i}: price must not be negative"
            )));
        }
        if line.dish_id.is_none() && line.name.trim().is_empty() {
            return Err(OrdersError::Validation(format!("item {i}: name is required")));
        }
    }
    Ok(())
}
