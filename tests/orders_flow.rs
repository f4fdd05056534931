mod common;

use order_service::{
    dto::orders::UpdateOrderStatusRequest,
    entity::{order_items::Column as OrderItemCol, orders::Column as OrderCol, OrderItems, Orders},
    error::AppError,
    models::OrderStatus,
    services::order_service as orders,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::{order_request, setup_state, unique_customer};

// Lifecycle: create -> read -> update status -> reject bad status -> delete -> gone.
#[tokio::test]
async fn create_update_and_delete_order_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = unique_customer("c1");

    let created = orders::create_order(&state, order_request(&customer, &[(1, "G", 1000, 2)]))
        .await?
        .data
        .unwrap();
    assert_eq!(created.total_price, Decimal::new(2000, 2));
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].subtotal, Decimal::new(2000, 2));
    assert_eq!(created.items[0].order_id, created.id);

    let fetched = orders::get_order(&state, created.id).await?.data.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.customer_id, customer);
    assert_eq!(fetched.total_price, Decimal::new(2000, 2));
    assert_eq!(fetched.items[0].game_name, "G");

    let updated = orders::update_order_status(
        &state,
        created.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert!(updated.updated_at >= created.updated_at);

    let rejected = orders::update_order_status(
        &state,
        created.id,
        UpdateOrderStatusRequest {
            status: "lost".into(),
        },
    )
    .await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));
    let fetched = orders::get_order(&state, created.id).await?.data.unwrap();
    assert_eq!(fetched.status, OrderStatus::Shipped);

    // Any status may follow any other.
    orders::update_order_status(
        &state,
        created.id,
        UpdateOrderStatusRequest {
            status: "pending".into(),
        },
    )
    .await?;

    orders::delete_order(&state, created.id).await?;
    let gone = orders::get_order(&state, created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));

    let orphans = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(created.id))
        .count(state.store.connection())
        .await?;
    assert_eq!(orphans, 0);

    let again = orders::delete_order(&state, created.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn items_keep_insertion_order_and_total() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = unique_customer("ordered");

    let lines = [
        (7, "Zeta", 2999, 2),
        (3, "Alpha", 3999, 1),
        (5, "Mu", 0, 4),
        (1, "Beta", 1250, 3),
    ];
    let created = orders::create_order(&state, order_request(&customer, &lines))
        .await?
        .data
        .unwrap();
    assert_eq!(created.total_price, Decimal::new(13747, 2));

    let fetched = orders::get_order(&state, created.id).await?.data.unwrap();
    let names: Vec<&str> = fetched.items.iter().map(|i| i.game_name.as_str()).collect();
    assert_eq!(names, ["Zeta", "Alpha", "Mu", "Beta"]);

    let sum: Decimal = fetched.items.iter().map(|i| i.subtotal).sum();
    assert_eq!(sum, fetched.total_price);

    orders::delete_order(&state, created.id).await?;
    Ok(())
}

#[tokio::test]
async fn rejected_orders_leave_no_rows() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = unique_customer("invalid");

    let result = orders::create_order(
        &state,
        order_request(&customer, &[(1, "Good", 1000, 1), (2, "Bad", 1000, 0)]),
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = orders::create_order(&state, order_request(&customer, &[])).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = orders::create_order(
        &state,
        order_request(&customer, &[(1, "Whale", 1_000_000_000_000, 1)]),
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let stored = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer.as_str()))
        .count(state.store.connection())
        .await?;
    assert_eq!(stored, 0);
    Ok(())
}

// PostgreSQL text cannot hold NUL, so the second item's insert fails after the
// order row was written inside the transaction.
#[tokio::test]
async fn failed_item_insert_rolls_back_the_order() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = unique_customer("rollback");
    let bad_name = "Broken\0Name";

    let result = state
        .store
        .create(
            &customer,
            order_request(&customer, &[(1, "Fits", 1000, 1), (2, bad_name, 1000, 1)])
                .items
                .into_iter()
                .map(Into::into)
                .collect(),
        )
        .await;
    assert!(matches!(result, Err(AppError::Storage(_))));

    let stored = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer.as_str()))
        .count(state.store.connection())
        .await?;
    assert_eq!(stored, 0);
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let id = uuid::Uuid::new_v4();

    assert!(matches!(
        orders::get_order(&state, id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        orders::update_order_status(
            &state,
            id,
            UpdateOrderStatusRequest {
                status: "confirmed".into()
            }
        )
        .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        orders::delete_order(&state, id).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}
