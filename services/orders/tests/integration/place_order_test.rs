use uuid::Uuid;
use worldbite_domain::order::{DeliveryType, OrderStatus};
use worldbite_orders::domain::types::EVENT_INVOICE_ISSUED;
use worldbite_orders::error::OrdersError;

use crate::helpers::{Kitchen, MockInvoiceRepo, dish, line, money};

#[tokio::test]
async fn should_place_pickup_order_with_code_and_exact_total() {
    let kitchen = Kitchen::new("7.00");
    let customer = Uuid::now_v7();

    let order = kitchen
        .place()
        .execute(kitchen.input(
            customer,
            DeliveryType::Pickup,
            vec![line("Lasanha", "25.90", 1), line("Refrigerante", "12.50", 1)],
        ))
        .await
        .unwrap();

    assert_eq!(order.total, money("38.40"));
    assert_eq!(order.total.to_string(), "38.40");
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.delivery_fee.is_none());
    let code = order.pickup_code.as_deref().unwrap();
    assert_eq!(code.len(), 4);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(kitchen.orders.get(order.id).customer_id, customer);
}

#[tokio::test]
async fn should_add_fee_and_omit_code_for_delivery() {
    let kitchen = Kitchen::new("7.00");

    let order = kitchen
        .place()
        .execute(kitchen.input(
            Uuid::now_v7(),
            DeliveryType::Delivery,
            vec![line("Pizza", "10.25", 3)],
        ))
        .await
        .unwrap();

    assert!(order.pickup_code.is_none());
    assert_eq!(order.subtotal, money("30.75"));
    assert_eq!(order.delivery_fee, Some(money("7.00")));
    assert_eq!(order.total, money("37.75"));
}

#[tokio::test]
async fn should_issue_invoice_with_outbox_event() {
    let kitchen = Kitchen::new("0.00");

    let order = kitchen.order(Uuid::now_v7(), DeliveryType::Pickup).await;

    let invoices = kitchen.invoices.invoices.lock().unwrap().clone();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].order_id, order.id);
    assert_eq!(invoices[0].total, order.total);
    assert!(invoices[0].number.starts_with("WB-"));

    let events = kitchen.invoices.events.lock().unwrap().clone();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EVENT_INVOICE_ISSUED);
    assert_eq!(events[0].aggregate_id, order.id);
    assert_eq!(events[0].payload["invoiceNumber"], invoices[0].number.as_str());
}

#[tokio::test]
async fn should_keep_order_when_invoice_fails() {
    let mut kitchen = Kitchen::new("0.00");
    kitchen.invoices = MockInvoiceRepo::failing();

    let order = kitchen.order(Uuid::now_v7(), DeliveryType::Pickup).await;

    assert_eq!(kitchen.orders.get(order.id).status, OrderStatus::Pending);
    assert!(kitchen.invoices.invoices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_invalid_carts_before_storing() {
    let kitchen = Kitchen::new("0.00");
    let customer = Uuid::now_v7();

    for items in [
        vec![],
        vec![line("Pastel", "9.50", 0)],
        vec![line("Pastel", "-1.00", 1)],
    ] {
        let err = kitchen
            .place()
            .execute(kitchen.input(customer, DeliveryType::Pickup, items))
            .await
            .unwrap_err();
        assert!(matches!(err, OrdersError::Validation(_)), "got {err:?}");
    }
    assert_eq!(kitchen.orders.len(), 0);
}

#[tokio::test]
async fn should_reject_unknown_or_inactive_restaurant() {
    let kitchen = Kitchen::new("0.00");
    let mut input = kitchen.input(Uuid::now_v7(), DeliveryType::Pickup, vec![line("X", "1.00", 1)]);
    input.restaurant_id = Uuid::now_v7();
    let err = kitchen.place().execute(input).await.unwrap_err();
    assert!(matches!(err, OrdersError::RestaurantNotFound));

    kitchen.restaurants.restaurants.lock().unwrap()[0].active = false;
    let input = kitchen.input(Uuid::now_v7(), DeliveryType::Pickup, vec![line("X", "1.00", 1)]);
    let err = kitchen.place().execute(input).await.unwrap_err();
    assert!(matches!(err, OrdersError::RestaurantInactive));
}

#[tokio::test]
async fn should_price_menu_items_from_the_dish() {
    let kitchen = Kitchen::new("0.00");
    let feijoada = dish(kitchen.restaurant.id, "Feijoada", "42.00");
    kitchen.dishes.dishes.lock().unwrap().push(feijoada.clone());

    let mut cart_line = line("anything", "0.01", 2);
    cart_line.dish_id = Some(feijoada.id);
    let order = kitchen
        .place()
        .execute(kitchen.input(Uuid::now_v7(), DeliveryType::Pickup, vec![cart_line]))
        .await
        .unwrap();

    assert_eq!(order.items[0].name, "Feijoada");
    assert_eq!(order.items[0].unit_price, money("42.00"));
    assert_eq!(order.total, money("84.00"));
}

#[tokio::test]
async fn should_refuse_unavailable_or_foreign_dishes() {
    let kitchen = Kitchen::new("0.00");
    let mut sold_out = dish(kitchen.restaurant.id, "Moqueca", "55.00");
    sold_out.available = false;
    let foreign = dish(Uuid::now_v7(), "Sushi", "30.00");
    kitchen
        .dishes
        .dishes
        .lock()
        .unwrap()
        .extend([sold_out.clone(), foreign.clone()]);

    let mut cart_line = line("", "0", 1);
    cart_line.dish_id = Some(sold_out.id);
    let err = kitchen
        .place()
        .execute(kitchen.input(Uuid::now_v7(), DeliveryType::Pickup, vec![cart_line.clone()]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrdersError::DishUnavailable(ref name) if name == "Moqueca"));

    cart_line.dish_id = Some(foreign.id);
    let err = kitchen
        .place()
        .execute(kitchen.input(Uuid::now_v7(), DeliveryType::Pickup, vec![cart_line]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrdersError::DishNotFound));
}

#[tokio::test]
async fn should_snapshot_own_delivery_address() {
    let kitchen = Kitchen::new("5.00");
    let customer = Uuid::now_v7();
    let address_id = kitchen.addresses.add(customer);

    let items = vec![line("Pizza", "40.00", 1)];
    let mut input = kitchen.input(customer, DeliveryType::Delivery, items);
    input.address_id = Some(address_id);
    let order = kitchen.place().execute(input).await.unwrap();

    let address = order.delivery_address.unwrap();
    assert_eq!(address.street, "Rua Augusta");
    assert_eq!(address.postal_code, "01304-001");
}

#[tokio::test]
async fn should_forbid_someone_elses_or_missing_address() {
    let kitchen = Kitchen::new("5.00");
    let customer = Uuid::now_v7();
    let someone_elses = kitchen.addresses.add(Uuid::now_v7());

    for address_id in [someone_elses, Uuid::now_v7()] {
        let items = vec![line("Pizza", "40.00", 1)];
        let mut input = kitchen.input(customer, DeliveryType::Delivery, items);
        input.address_id = Some(address_id);
        let err = kitchen.place().execute(input).await.unwrap_err();
        assert!(matches!(err, OrdersError::Forbidden), "got {err:?}");
    }
    assert_eq!(kitchen.orders.len(), 0);
}

#[tokio::test]
async fn should_drop_blank_notes() {
    let kitchen = Kitchen::new("0.00");
    let mut input = kitchen.input(Uuid::now_v7(), DeliveryType::Pickup, vec![line("X", "1.00", 1)]);
    input.notes = Some("   ".into());
    let order = kitchen.place().execute(input).await.unwrap();
    assert!(order.notes.is_none());
}
