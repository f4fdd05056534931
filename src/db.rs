use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::AppConfig;

/// Create a SeaORM connection backed by a sqlx Postgres pool.
pub async fn create_orm_conn(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    conn.ping().await?;
    tracing::info!(max_connections = config.max_connections, "database connection established");
    Ok(conn)
}

/// Apply the embedded SQL migrations from `migrations/`.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(conn.get_postgres_connection_pool())
        .await?;
    tracing::info!("migrations applied");
    Ok(())
}
