use std::str::FromStr;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use worldbite_domain::dish::DishCategory;
use worldbite_domain::order::{DeliveryType, OrderStatus};
use worldbite_domain::pagination::PageRequest;
use worldbite_domain::tax_id::TaxId;

use worldbite_orders::domain::repository::{
    AddressLookup, DishRepository, InvoiceRepository, OrderRepository, OutboxRepository,
    RestaurantRepository,
};
use worldbite_orders::domain::types::{
    AddressSnapshot, CustomerAddress, Dish, Invoice, Order, OutboxEvent, Restaurant,
};
use worldbite_orders::error::OrdersError;
use worldbite_orders::usecase::place_order::{CartLine, PlaceOrderInput, PlaceOrderUseCase};

pub const TAX_ID: &str = "12345678000190";
pub const OTHER_TAX_ID: &str = "98765432000110";

pub fn money(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

pub fn tax_id(raw: &str) -> TaxId {
    TaxId::parse(raw).unwrap()
}

// ── MockRestaurantRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRestaurantRepo {
    pub restaurants: Arc<Mutex<Vec<Restaurant>>>,
}

impl MockRestaurantRepo {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        Self {
            restaurants: Arc::new(Mutex::new(restaurants)),
        }
    }
}

impl RestaurantRepository for MockRestaurantRepo {
    async fn create(&self, restaurant: &Restaurant) -> Result<(), OrdersError> {
        let mut restaurants = self.restaurants.lock().unwrap();
        if restaurants.iter().any(|r| r.tax_id == restaurant.tax_id) {
            return Err(OrdersError::Conflict("tax id already registered".to_owned()));
        }
        restaurants.push(restaurant.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, OrdersError> {
        Ok(self
            .restaurants
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Restaurant>, OrdersError> {
        Ok(self
            .restaurants
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.tax_id == tax_id)
            .cloned())
    }

    async fn list_active(&self, page: PageRequest) -> Result<Vec<Restaurant>, OrdersError> {
        let mut active: Vec<_> = self
            .restaurants
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

// ── MockDishRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockDishRepo {
    pub dishes: Arc<Mutex<Vec<Dish>>>,
}

impl MockDishRepo {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self {
            dishes: Arc::new(Mutex::new(dishes)),
        }
    }
}

impl DishRepository for MockDishRepo {
    async fn create(&self, dish: &Dish) -> Result<(), OrdersError> {
        self.dishes.lock().unwrap().push(dish.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dish>, OrdersError> {
        Ok(self.dishes.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn update(&self, dish: &Dish) -> Result<(), OrdersError> {
        if let Some(stored) = self.dishes.lock().unwrap().iter_mut().find(|d| d.id == dish.id) {
            *stored = dish.clone();
        }
        Ok(())
    }

    async fn list_available(&self, restaurant_id: Uuid) -> Result<Vec<Dish>, OrdersError> {
        let mut menu: Vec<_> = self
            .dishes
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.restaurant_id == restaurant_id && d.available)
            .cloned()
            .collect();
        menu.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(menu)
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
}

impl MockOrderRepo {
    pub fn get(&self, id: Uuid) -> Order {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .expect("order exists")
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

fn newest_first(mut orders: Vec<Order>, page: PageRequest) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

impl OrderRepository for MockOrderRepo {
    async fn create(&self, order: &Order) -> Result<(), OrdersError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrdersError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        let orders = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        Ok(newest_first(orders, page))
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: Uuid,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        let orders = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.restaurant_id == restaurant_id)
            .filter(|o| !active_only || !o.status.is_terminal())
            .cloned()
            .collect();
        Ok(newest_first(orders, page))
    }

    async fn find_active_by_pickup_code(
        &self,
        restaurant_id: Uuid,
        code: &str,
    ) -> Result<Option<Order>, OrdersError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| {
                o.restaurant_id == restaurant_id
                    && o.delivery_type == DeliveryType::Pickup
                    && o.pickup_code.as_deref() == Some(code)
                    && !o.status.is_terminal()
            })
            .cloned())
    }

    async fn transition(
        &self,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, OrdersError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders
            .iter_mut()
            .find(|o| o.id == order_id && o.status == from)
        else {
            return Ok(false);
        };
        order.status = to;
        order.updated_at = at;
        if completed_at.is_some() {
            order.completed_at = completed_at;
        }
        Ok(true)
    }
}

/// Reports the order as already moved: the conditional update never matches.
#[derive(Clone, Default)]
pub struct RacingOrderRepo {
    pub inner: MockOrderRepo,
}

impl OrderRepository for RacingOrderRepo {
    async fn create(&self, order: &Order) -> Result<(), OrdersError> {
        self.inner.create(order).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrdersError> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        self.inner.list_by_customer(customer_id, page).await
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: Uuid,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Order>, OrdersError> {
        self.inner
            .list_by_restaurant(restaurant_id, active_only, page)
            .await
    }

    async fn find_active_by_pickup_code(
        &self,
        restaurant_id: Uuid,
        code: &str,
    ) -> Result<Option<Order>, OrdersError> {
        self.inner.find_active_by_pickup_code(restaurant_id, code).await
    }

    async fn transition(
        &self,
        _order_id: Uuid,
        _from: OrderStatus,
        _to: OrderStatus,
        _at: DateTime<Utc>,
        _completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, OrdersError> {
        Ok(false)
    }
}

// ── MockAddressLookup ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAddressLookup {
    pub addresses: Arc<Mutex<Vec<(Uuid, CustomerAddress)>>>,
}

impl MockAddressLookup {
    /// Store an address for `user_id` and return its id.
    pub fn add(&self, user_id: Uuid) -> Uuid {
        let id = Uuid::now_v7();
        self.addresses.lock().unwrap().push((
            id,
            CustomerAddress {
                user_id,
                snapshot: AddressSnapshot {
                    nickname: Some("Casa".into()),
                    street: "Rua Augusta".into(),
                    number: "1500".into(),
                    complement: None,
                    district: "Consolação".into(),
                    city: "São Paulo".into(),
                    state: "SP".into(),
                    postal_code: "01304-001".into(),
                },
            },
        ));
        id
    }
}

impl AddressLookup for MockAddressLookup {
    async fn find_address(&self, id: Uuid) -> Result<Option<CustomerAddress>, OrdersError> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .find(|(address_id, _)| *address_id == id)
            .map(|(_, a)| a.clone()))
    }
}

// ── MockInvoiceRepo / MockOutboxRepo ─────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockInvoiceRepo {
    pub invoices: Arc<Mutex<Vec<Invoice>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
    pub fail: bool,
}

impl MockInvoiceRepo {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl InvoiceRepository for MockInvoiceRepo {
    async fn create_with_outbox(
        &self,
        invoice: &Invoice,
        event: &OutboxEvent,
    ) -> Result<(), OrdersError> {
        if self.fail {
            return Err(OrdersError::Internal(anyhow::anyhow!("invoice table unavailable")));
        }
        self.invoices.lock().unwrap().push(invoice.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockOutboxRepo {
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
    pub fail: bool,
}

impl MockOutboxRepo {
    pub fn kinds(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind.clone())
            .collect()
    }
}

impl OutboxRepository for MockOutboxRepo {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), OrdersError> {
        if self.fail {
            return Err(OrdersError::Internal(anyhow::anyhow!("outbox unavailable")));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn restaurant(tax_id: &str, fee: &str) -> Restaurant {
    Restaurant {
        id: Uuid::now_v7(),
        name: format!("Cantina {tax_id}"),
        tax_id: tax_id.to_owned(),
        address: "Rua dos Pinheiros, 100".into(),
        phone: None,
        email: None,
        opening_hours: Some("11h-23h".into()),
        delivery_fee: money(fee),
        active: true,
        created_at: Utc::now(),
    }
}

pub fn dish(restaurant_id: Uuid, name: &str, price: &str) -> Dish {
    Dish {
        id: Uuid::now_v7(),
        restaurant_id,
        name: name.to_owned(),
        description: None,
        price: money(price),
        category: DishCategory::Main,
        available: true,
        created_at: Utc::now(),
    }
}

pub fn line(name: &str, price: &str, quantity: i64) -> CartLine {
    CartLine {
        dish_id: None,
        name: name.to_owned(),
        unit_price: money(price),
        quantity,
    }
}

/// Repositories around one restaurant, shared by every use case a test builds.
pub struct Kitchen {
    pub restaurant: Restaurant,
    pub restaurants: MockRestaurantRepo,
    pub dishes: MockDishRepo,
    pub orders: MockOrderRepo,
    pub addresses: MockAddressLookup,
    pub invoices: MockInvoiceRepo,
    pub outbox: MockOutboxRepo,
}

impl Kitchen {
    pub fn new(fee: &str) -> Self {
        let restaurant = restaurant(TAX_ID, fee);
        Self {
            restaurants: MockRestaurantRepo::new(vec![
                restaurant.clone(),
                self::restaurant(OTHER_TAX_ID, "0.00"),
            ]),
            restaurant,
            dishes: MockDishRepo::default(),
            orders: MockOrderRepo::default(),
            addresses: MockAddressLookup::default(),
            invoices: MockInvoiceRepo::default(),
            outbox: MockOutboxRepo::default(),
        }
    }

    pub fn place(
        &self,
    ) -> PlaceOrderUseCase<
        MockRestaurantRepo,
        MockDishRepo,
        MockOrderRepo,
        MockAddressLookup,
        MockInvoiceRepo,
    > {
        PlaceOrderUseCase {
            restaurants: self.restaurants.clone(),
            dishes: self.dishes.clone(),
            orders: self.orders.clone(),
            addresses: self.addresses.clone(),
            invoices: self.invoices.clone(),
        }
    }

    pub fn input(
        &self,
        customer_id: Uuid,
        delivery_type: DeliveryType,
        items: Vec<CartLine>,
    ) -> PlaceOrderInput {
        PlaceOrderInput {
            customer_id,
            restaurant_id: self.restaurant.id,
            delivery_type,
            items,
            address_id: None,
            notes: None,
        }
    }

    /// Place a one-line order and return it.
    pub async fn order(&self, customer_id: Uuid, delivery_type: DeliveryType) -> Order {
        self.place()
            .execute(self.input(customer_id, delivery_type, vec![line("Pastel", "9.50", 2)]))
            .await
            .unwrap()
    }
}
