use order_service::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::orders::{CreateOrderItemRequest, CreateOrderRequest, UpdateOrderStatusRequest},
    services::order_service as orders,
    state::AppState,
    store::OrderStore,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let state = AppState::new(OrderStore::new(orm, config.row_decode));

    let demo_orders = vec![
        ("customer-001", vec![(1, "Space Raiders", 2999, 2), (2, "Dungeon Depths", 3999, 1)], "delivered"),
        ("customer-001", vec![(3, "Kart Mayhem", 1999, 1)], "shipped"),
        ("customer-002", vec![(2, "Dungeon Depths", 3999, 3)], "pending"),
    ];

    for (customer_id, items, status) in demo_orders {
        let request = CreateOrderRequest {
            customer_id: customer_id.to_string(),
            items: items
                .into_iter()
                .map(|(game_id, game_name, cents, quantity)| CreateOrderItemRequest {
                    game_id,
                    game_name: game_name.to_string(),
                    price: Decimal::new(cents, 2),
                    quantity,
                })
                .collect(),
        };

        let created = orders::create_order(&state, request).await?;
        let order = created
            .data
            .ok_or_else(|| anyhow::anyhow!("create_order returned no order"))?;

        if status != "pending" {
            orders::update_order_status(
                &state,
                order.id,
                UpdateOrderStatusRequest {
                    status: status.to_string(),
                },
            )
            .await?;
        }

        println!(
            "Seeded order {} for {customer_id} (total {}, status {status})",
            order.id, order.total_price
        );
    }

    println!("Seed completed");
    Ok(())
}
