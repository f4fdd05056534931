use std::{collections::HashMap, str::FromStr};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QueryResult, QuerySelect, QueryTrait,
    Select, Set, TransactionTrait, prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::{NewOrderItem, Order, OrderItem, OrderStatus, StatusAggregate, validate_new_order},
};

/// Upper bound on the number of orders a single page may return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// What list operations do with a stored order row they cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowDecodePolicy {
    /// Skip the row and log it.
    #[default]
    BestEffort,
    /// Fail the whole request.
    FailFast,
}

impl FromStr for RowDecodePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(RowDecodePolicy::BestEffort),
            "fail_fast" | "fail-fast" => Ok(RowDecodePolicy::FailFast),
            other => Err(AppError::validation(format!(
                "unknown row decode policy: {other}"
            ))),
        }
    }
}

/// Persistence for orders and their items.
#[derive(Clone)]
pub struct OrderStore {
    conn: DatabaseConnection,
    decode: RowDecodePolicy,
}

impl OrderStore {
    pub fn new(conn: DatabaseConnection, decode: RowDecodePolicy) -> Self {
        Self { conn, decode }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Writes the order row and every item row in one transaction.
    ///
    /// The creation constraints are checked again here so a malformed order is
    /// never written, whoever the caller is.
    pub async fn create(&self, customer_id: &str, items: Vec<NewOrderItem>) -> AppResult<Order> {
        let total_price = validate_new_order(customer_id, &items)?;

        let order_id = Uuid::new_v4();
        let now: DateTimeWithTimeZone = Utc::now().into();

        // Subtotals cannot overflow here, validate_new_order already summed them.
        let order_items: Vec<OrderItem> = items
            .into_iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id,
                game_id: item.game_id,
                subtotal: item.price * Decimal::from(item.quantity),
                game_name: item.game_name,
                price: item.price,
                quantity: item.quantity,
            })
            .collect();

        let txn = self.conn.begin().await?;

        let order = OrderActive {
            id: Set(order_id),
            customer_id: Set(customer_id.to_string()),
            total_price: Set(total_price),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            order_date: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let rows = order_items
            .iter()
            .enumerate()
            .map(|(position, item)| OrderItemActive {
                id: Set(item.id),
                order_id: Set(order_id),
                position: Set(position as i32),
                game_id: Set(item.game_id),
                game_name: Set(item.game_name.clone()),
                price: Set(item.price),
                quantity: Set(item.quantity),
                subtotal: Set(item.subtotal),
            });
        OrderItems::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            items = order_items.len(),
            total_price = %order.total_price,
            "order created"
        );

        let status = decode_status(&order.status)?;
        Ok(order_from_entity(order, status, order_items))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Order> {
        let order = Orders::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(AppError::order_not_found)?;
        let status = decode_status(&order.status)?;

        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(id))
            .order_by_asc(OrderItemCol::Position)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect();

        Ok(order_from_entity(order, status, items))
    }

    /// Orders of one customer, newest first. Unknown customers yield an empty list.
    pub async fn list_by_customer(&self, customer_id: &str) -> AppResult<Vec<Order>> {
        let finder = newest_first(Orders::find().filter(OrderCol::CustomerId.eq(customer_id)));
        let orders = self.fetch_orders(finder).await?;
        tracing::debug!(customer_id, count = orders.len(), "listed customer orders");
        Ok(orders)
    }

    /// One page of all orders, newest first, together with the total order count.
    pub async fn list_all(&self, limit: i64, offset: i64) -> AppResult<(Vec<Order>, i64)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE) as u64;
        let offset = offset.max(0) as u64;

        let total = Orders::find().count(&self.conn).await? as i64;
        let finder = newest_first(Orders::find()).limit(limit).offset(offset);
        let orders = self.fetch_orders(finder).await?;

        Ok((orders, total))
    }

    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = Orders::update_many()
            .col_expr(OrderCol::Status, Expr::value(status.as_str()))
            .col_expr(OrderCol::UpdatedAt, Expr::value(now))
            .filter(OrderCol::Id.eq(id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::order_not_found());
        }

        tracing::info!(order_id = %id, status = %status, "order status updated");
        Ok(())
    }

    /// Removes the order and all of its items atomically.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.conn.begin().await?;

        let items = OrderItems::delete_many()
            .filter(OrderItemCol::OrderId.eq(id))
            .exec(&txn)
            .await?;
        let result = Orders::delete_by_id(id).exec(&txn).await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::order_not_found());
        }

        txn.commit().await?;

        tracing::info!(order_id = %id, items = items.rows_affected, "order deleted");
        Ok(())
    }

    /// Order count and revenue per stored status, aggregated by the database.
    pub async fn statistics(&self) -> AppResult<Vec<StatusAggregate>> {
        let rows: Vec<(String, i64, Option<Decimal>)> = Orders::find()
            .select_only()
            .column(OrderCol::Status)
            .column_as(Expr::col(OrderCol::Id).count(), "orders")
            .column_as(Expr::col(OrderCol::TotalPrice).sum(), "revenue")
            .group_by(OrderCol::Status)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(status, orders, revenue)| StatusAggregate {
                status,
                orders,
                revenue: revenue.unwrap_or_default(),
            })
            .collect())
    }

    async fn fetch_orders(&self, finder: Select<Orders>) -> AppResult<Vec<Order>> {
        let backend = self.conn.get_database_backend();
        let rows = self.conn.query_all(finder.build(backend)).await?;

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            match decode_order_row(row) {
                Ok(order) => decoded.push(order),
                Err(err) => match self.decode {
                    RowDecodePolicy::FailFast => return Err(err.into()),
                    RowDecodePolicy::BestEffort => {
                        tracing::warn!(error = %err, "skipping order row that failed to decode");
                    }
                },
            }
        }

        let ids: Vec<Uuid> = decoded.iter().map(|(order, _)| order.id).collect();
        let mut items = self.load_items(&ids).await?;

        Ok(decoded
            .into_iter()
            .map(|(order, status)| {
                let order_items = items.remove(&order.id).unwrap_or_default();
                order_from_entity(order, status, order_items)
            })
            .collect())
    }

    async fn load_items(&self, order_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<OrderItem>>> {
        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(OrderItemCol::OrderId)
            .order_by_asc(OrderItemCol::Position)
            .all(&self.conn)
            .await?;

        for row in rows {
            grouped
                .entry(row.order_id)
                .or_default()
                .push(order_item_from_entity(row));
        }
        Ok(grouped)
    }
}

// Ties on order_date are broken by id so pages never overlap.
fn newest_first(finder: Select<Orders>) -> Select<Orders> {
    finder
        .order_by_desc(OrderCol::OrderDate)
        .order_by_desc(OrderCol::Id)
}

fn decode_order_row(row: &QueryResult) -> Result<(OrderModel, OrderStatus), DbErr> {
    let model = OrderModel::from_query_result(row, "")?;
    let status = decode_status(&model.status)?;
    Ok((model, status))
}

fn decode_status(raw: &str) -> Result<OrderStatus, DbErr> {
    raw.parse::<OrderStatus>()
        .map_err(|_| DbErr::Type(format!("unknown order status {raw:?}")))
}

fn order_from_entity(model: OrderModel, status: OrderStatus, items: Vec<OrderItem>) -> Order {
    Order {
        id: model.id,
        customer_id: model.customer_id,
        total_price: model.total_price,
        status,
        order_date: model.order_date.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        items,
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        game_id: model.game_id,
        game_name: model.game_name,
        price: model.price,
        quantity: model.quantity,
        subtotal: model.subtotal,
    }
}
