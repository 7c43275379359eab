use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;
use worldbite_domain::dish::DishCategory;
use worldbite_domain::order::{DeliveryType, OrderStatus};
use worldbite_domain::pagination::PageRequest;
use worldbite_orders_schema::{addresses, dishes, invoices, orders, outbox_events, restaurants};

use crate::domain::repository::{
    AddressLookup, DishRepository, InvoiceRepository, OrderRepository, OutboxRepository,
    RestaurantRepository,
};
use crate::domain::types::{
    AddressSnapshot, CustomerAddress, Dish, Invoice, Order, OrderItem, OutboxEvent, Restaurant,
};
use crate::error::OrdersError;

// ── Restaurant repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRestaurantRepository {
    pub db: DatabaseConnection,
}

impl RestaurantRepository for DbRestaurantRepository {
    async fn create(&self, restaurant: &Restaurant) -> Result<(), OrdersError> {
        let result = restaurants::ActiveModel {
            id: Set(restaurant.id),
            name: Set(restaurant.name.clone()),
            tax_id: Set(restaurant.tax_id.clone()),
            address: Set(restaurant.address.clone()),
            phone: Set(restaurant.phone.clone()),
            email: Set(restaurant.email.clone()),
            opening_hours: Set(restaurant.opening_hours.clone()),
            delivery_fee: Set(restaurant.delivery_fee.clone()),
            active: Set(restaurant.active),
            created_at: Set(restaurant.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                OrdersError::Conflict("tax id already registered".to_owned()),
            ),
            Err(e) => Err(anyhow::Error::new(e).context("create restaurant").into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, OrdersError> {
        let model = restaurants::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find restaurant by id")?;
        Ok(model.map(restaurant_from_model))
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Restaurant>, OrdersError> {
        let model = restaurants::Entity::find()
            .filter(restaurants::Column::TaxId.eq(tax_id))
            .one(&self.db)
            .await
            .context("find restaurant by tax id")?;
        Ok(model.map(restaurant_from_model))
    }

    async fn list_active(&self, page: PageRequest) -> Result<Vec<Restaurant>, OrdersError> {
        let models = restaurants::Entity::find()
            .filter(restaurants::Column::Active.eq(true))
            .order_by_asc(restaurants::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list active restaurants")?;
        Ok(models.into_iter().map(restaurant_from_model).collect())
    }
}

fn restaurant_from_model(model: restaurants::Model) -> Restaurant {
    Restaurant {
        id: model.id,
        name: model.name,
        tax_id: model.tax_id,
        address: model.address,
        phone: model.phone,
        email: model.email,
        opening_hours: model.opening_hours,
        delivery_fee: model.delivery_fee,
        active: model.active,
        created_at: model.created_at,
    }
}

// ── Dish repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDishRepository {
    pub db: DatabaseConnection,
}

impl DishRepository for DbDishRepository {
    async fn create(&self, dish: &Dish) -> Result<(), OrdersError> {
        dish_to_active_model(dish)
            .insert(&self.db)
            .await
            .context("create dish")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dish>, OrdersError> {
        let model = dishes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find dish by id")?;
        model.map(dish_from_model).transpose()
    }

    async fn update(&self, dish: &Dish) -> Result<(), OrdersError> {
        dish_to_active_model(dish)
            .update(&self.db)
            .await
            .context("update dish")?;
        Ok(())
    }

    async fn list_available(&self, restaurant_id: Uuid) -> Result<Vec<Dish>, OrdersError> {
        let models = dishes::Entity::find()
            .filter(dishes::Column::RestaurantId.eq(restaurant_id))
            .filter(dishes::Column::Available.eq(true))
            .order_by_asc(dishes::Column::Category)
            .order_by_asc(dishes::Column::Name)
            .all(&self.db)
            .await
            .context("list menu")?;
        models.into_iter().map(dish_from_model).collect()
    }
}

fn dish_to_active_model(dish: &Dish) -> dishes::ActiveModel {
    dishes::ActiveModel {
        id: Set(dish.id),
        restaurant_id: Set(dish.restaurant_id),
        name: Set(dish.name.clone()),
        description: Set(dish.description.clone()),
        price: Set(dish.price.clone()),
        category: Set(dish.category.to_string()),
        available: Set(dish.available),
        created_at: Set(dish.created_at),
    }
}

fn dish_from_model(model: dishes::Model) -> Result<Dish, OrdersError> {
    let category: DishCategory = model
        .category
        .parse()
        .with_context(|| format!("dish {} has unknown category", model.id))?;
    Ok(Dish {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        description: model.description,
        price: model.price,
        category,
        available: model.available,
        created_at: model.created_at,
    })
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

fn active_statuses() -> Vec<String> {
    OrderStatus::active().map(|s| s.to_string()).collect()
}

impl OrderRepository for DbOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), OrdersError> {
        let items = serde_json::to_value(&order.items).context("serialize order items")?;
        let delivery_address = order
            .delivery_address
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("serialize delivery address")?;
        orders::ActiveModel {
            id: Set(order.id),
            customer_id: Set(order.customer_id),
            restaurant_id: Set(order.restaurant_id),
            restaurant_name: Set(order.restaurant_name.clone()),
            items: Set(items),
            delivery_type: Set(order.delivery_type.to_string()),
            status: Set(order.status.to_string()),
            pickup_code: Set(order.pickup_code.clone()),
            subtotal: Set(order.subtotal.clone()),
            delivery_fee: Set(order.delivery_fee.clone()),
            total: Set(order.total.clone()),
            notes: Set(order.notes.clone()),
            delivery_address: Set(delivery_address),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
            completed_at: Set(order.completed_at),
        }
        .insert(&self.db)
        .await
        .context("create order")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrdersError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        model.map(order_from_model).transpose()
    }

    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        let models = orders::Entity::find()
            .filter(orders::Column::CustomerId.eq(customer_id))
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list customer orders")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: Uuid,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        let mut query =
            orders::Entity::find().filter(orders::Column::RestaurantId.eq(restaurant_id));
        if active_only {
            query = query.filter(orders::Column::Status.is_in(active_statuses()));
        }
        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list restaurant orders")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn find_active_by_pickup_code(
        &self,
        restaurant_id: Uuid,
        code: &str,
    ) -> Result<Option<Order>, OrdersError> {
        let model = orders::Entity::find()
            .filter(orders::Column::RestaurantId.eq(restaurant_id))
            .filter(orders::Column::PickupCode.eq(code))
            .filter(orders::Column::DeliveryType.eq(DeliveryType::Pickup.to_string()))
            .filter(orders::Column::Status.is_in(active_statuses()))
            .one(&self.db)
            .await
            .context("find order by pickup code")?;
        model.map(order_from_model).transpose()
    }

    async fn transition(
        &self,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, OrdersError> {
        let mut update = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(to.to_string()))
            .col_expr(orders::Column::UpdatedAt, Expr::value(at));
        if let Some(completed_at) = completed_at {
            update = update.col_expr(orders::Column::CompletedAt, Expr::value(completed_at));
        }
        let result = update
            .filter(orders::Column::Id.eq(order_id))
            .filter(orders::Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .context("transition order status")?;
        Ok(result.rows_affected == 1)
    }
}

fn order_from_model(model: orders::Model) -> Result<Order, OrdersError> {
    let items: Vec<OrderItem> = serde_json::from_value(model.items)
        .with_context(|| format!("order {} has malformed items", model.id))?;
    let delivery_address: Option<AddressSnapshot> = model
        .delivery_address
        .map(serde_json::from_value::<AddressSnapshot>)
        .transpose()
        .with_context(|| format!("order {} has malformed delivery address", model.id))?;
    let delivery_type: DeliveryType = model
        .delivery_type
        .parse()
        .with_context(|| format!("order {} has unknown delivery type", model.id))?;
    let status: OrderStatus = model
        .status
        .parse()
        .with_context(|| format!("order {} has unknown status", model.id))?;
    Ok(Order {
        id: model.id,
        customer_id: model.customer_id,
        restaurant_id: model.restaurant_id,
        restaurant_name: model.restaurant_name,
        items,
        delivery_type,
        status,
        pickup_code: model.pickup_code,
        subtotal: model.subtotal,
        delivery_fee: model.delivery_fee,
        total: model.total,
        notes: model.notes,
        delivery_address,
        created_at: model.created_at,
        updated_at: model.updated_at,
        completed_at: model.completed_at,
    })
}

// ── Address lookup ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAddressLookup {
    pub db: DatabaseConnection,
}

impl AddressLookup for DbAddressLookup {
    async fn find_address(&self, id: Uuid) -> Result<Option<CustomerAddress>, OrdersError> {
        let model = addresses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find address by id")?;
        Ok(model.map(|m| CustomerAddress {
            user_id: m.user_id,
            snapshot: AddressSnapshot {
                nickname: m.nickname,
                street: m.street,
                number: m.number,
                complement: m.complement,
                district: m.district,
                city: m.city,
                state: m.state,
                postal_code: m.postal_code,
            },
        }))
    }
}

// ── Invoice repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInvoiceRepository {
    pub db: DatabaseConnection,
}

impl InvoiceRepository for DbInvoiceRepository {
    async fn create_with_outbox(
        &self,
        invoice: &Invoice,
        event: &OutboxEvent,
    ) -> Result<(), OrdersError> {
        let items = serde_json::to_value(&invoice.items).context("serialize invoice items")?;
        let model = invoices::ActiveModel {
            id: Set(invoice.id),
            order_id: Set(invoice.order_id),
            number: Set(invoice.number.clone()),
            items: Set(items),
            total: Set(invoice.total.clone()),
            issued_at: Set(invoice.issued_at),
        };
        let event = event.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await?;
                    insert_outbox_event(txn, &event).await
                })
            })
            .await
            .context("create invoice with outbox")?;
        Ok(())
    }
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), OrdersError> {
        let event = event.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move { insert_outbox_event(txn, &event).await })
            })
            .await
            .context("enqueue outbox event")?;
        Ok(())
    }
}

async fn insert_outbox_event(txn: &DatabaseTransaction, event: &OutboxEvent) -> Result<(), DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        aggregate_id: Set(event.aggregate_id),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}
