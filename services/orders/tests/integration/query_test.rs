use uuid::Uuid;
use worldbite_domain::order::{DeliveryType, OrderAction};
use worldbite_domain::pagination::PageRequest;
use worldbite_orders::error::OrdersError;
use worldbite_orders::usecase::lifecycle::AdvanceStatusUseCase;
use worldbite_orders::usecase::query::{
    GetCustomerOrderUseCase, ListCustomerOrdersUseCase, ListRestaurantOrdersUseCase,
};

use crate::helpers::{Kitchen, OTHER_TAX_ID, TAX_ID, tax_id};

#[tokio::test]
async fn should_list_own_orders_newest_first() {
    let kitchen = Kitchen::new("0.00");
    let customer = Uuid::now_v7();
    let first = kitchen.order(customer, DeliveryType::Pickup).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = kitchen.order(customer, DeliveryType::Pickup).await;
    kitchen.order(Uuid::now_v7(), DeliveryType::Pickup).await;

    let orders = ListCustomerOrdersUseCase {
        orders: kitchen.orders.clone(),
    }
    .execute(customer, PageRequest::default())
    .await
    .unwrap();
    let ids: Vec<_> = orders.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn should_forbid_reading_someone_elses_order() {
    let kitchen = Kitchen::new("0.00");
    let owner = Uuid::now_v7();
    let order = kitchen.order(owner, DeliveryType::Pickup).await;
    let uc = GetCustomerOrderUseCase {
        orders: kitchen.orders.clone(),
    };

    assert_eq!(uc.execute(owner, order.id).await.unwrap().id, order.id);
    let err = uc.execute(Uuid::now_v7(), order.id).await.unwrap_err();
    assert!(matches!(err, OrdersError::Forbidden));
    let err = uc.execute(owner, Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, OrdersError::OrderNotFound));
}

#[tokio::test]
async fn should_list_restaurant_queue_with_active_filter() {
    let kitchen = Kitchen::new("0.00");
    let open = kitchen.order(Uuid::now_v7(), DeliveryType::Pickup).await;
    let refused = kitchen.order(Uuid::now_v7(), DeliveryType::Pickup).await;
    AdvanceStatusUseCase {
        restaurants: kitchen.restaurants.clone(),
        orders: kitchen.orders.clone(),
        outbox: kitchen.outbox.clone(),
    }
    .execute(&tax_id(TAX_ID), refused.id, OrderAction::Refuse)
    .await
    .unwrap();
    let uc = ListRestaurantOrdersUseCase {
        restaurants: kitchen.restaurants.clone(),
        orders: kitchen.orders.clone(),
    };

    let all = uc
        .execute(&tax_id(TAX_ID), false, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let active = uc
        .execute(&tax_id(TAX_ID), true, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, open.id);

    let other = uc
        .execute(&tax_id(OTHER_TAX_ID), false, PageRequest::default())
        .await
        .unwrap();
    assert!(other.is_empty());
}
