mod common;

use order_service::{
    error::AppError,
    services::order_service as orders,
    state::AppState,
    store::{OrderStore, RowDecodePolicy},
};
use sea_orm::{ConnectionTrait, Statement, Value};
use uuid::Uuid;

use common::{order_request, setup_state_with, unique_customer};

// A row written outside the service with a status the enum does not know.
#[tokio::test]
async fn undecodable_rows_follow_the_decode_policy() -> anyhow::Result<()> {
    let Some(lenient) = setup_state_with(RowDecodePolicy::BestEffort).await? else {
        return Ok(());
    };
    let conn = lenient.store.connection().clone();
    let strict = AppState::new(OrderStore::new(conn.clone(), RowDecodePolicy::FailFast));
    let customer = unique_customer("decode");

    let good = orders::create_order(&lenient, order_request(&customer, &[(1, "G", 1500, 1)]))
        .await?
        .data
        .unwrap();

    let weird_id = Uuid::new_v4();
    conn.execute(Statement::from_sql_and_values(
        conn.get_database_backend(),
        "INSERT INTO orders (id, customer_id, total_price, status) VALUES ($1, $2, 0, 'weird')",
        [Value::from(weird_id), Value::from(customer.clone())],
    ))
    .await?;

    let listed = orders::list_orders_by_customer(&lenient, &customer)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.orders[0].id, good.id);

    let failed = orders::list_orders_by_customer(&strict, &customer).await;
    assert!(matches!(failed, Err(AppError::Storage(_))));

    // Single reads fail whatever the policy.
    let read = orders::get_order(&lenient, weird_id).await;
    assert!(matches!(read, Err(AppError::Storage(_))));

    orders::delete_order(&lenient, weird_id).await?;
    orders::delete_order(&lenient, good.id).await?;
    Ok(())
}
