#![allow(dead_code)]

use order_service::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::orders::{CreateOrderItemRequest, CreateOrderRequest},
    state::AppState,
    store::{OrderStore, RowDecodePolicy},
};
use rust_decimal::Decimal;

/// Connects to the test database, or returns `None` so the caller can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    setup_state_with(RowDecodePolicy::FailFast).await
}

pub async fn setup_state_with(policy: RowDecodePolicy) -> anyhow::Result<Option<AppState>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
            );
            return Ok(None);
        }
    };
    connect(database_url, policy).await.map(Some)
}

/// Like `setup_state`, but only for a dedicated test database. Tests that wipe
/// tables use this so `DATABASE_URL` is never touched.
pub async fn setup_scratch_state() -> anyhow::Result<Option<AppState>> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("Skipping test: set TEST_DATABASE_URL to run tests that truncate tables.");
        return Ok(None);
    };
    connect(database_url, RowDecodePolicy::FailFast).await.map(Some)
}

async fn connect(database_url: String, policy: RowDecodePolicy) -> anyhow::Result<AppState> {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some(database_url.clone()),
        "DB_MAX_CONNECTIONS" => Some("5".to_string()),
        _ => None,
    })?;
    let orm = create_orm_conn(&config).await?;
    run_migrations(&orm).await?;

    Ok(AppState::new(OrderStore::new(orm, policy)))
}

pub fn order_request(customer_id: &str, items: &[(i32, &str, i64, i32)]) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id: customer_id.to_string(),
        items: items
            .iter()
            .map(|(game_id, game_name, cents, quantity)| CreateOrderItemRequest {
                game_id: *game_id,
                game_name: game_name.to_string(),
                price: Decimal::new(*cents, 2),
                quantity: *quantity,
            })
            .collect(),
    }
}

/// A customer id no other test run will share.
pub fn unique_customer(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}
