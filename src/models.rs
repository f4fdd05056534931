use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Largest number of decimal places a stored price keeps.
pub const PRICE_SCALE: u32 = 2;

/// Longest `customer_id` or `game_name`, in characters.
pub const MAX_TEXT_LEN: usize = 255;

/// Largest unit price a stored item can hold.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, PRICE_SCALE); // 9_999_999_999.99

/// Largest subtotal or order total that can be stored.
pub const MAX_TOTAL: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, PRICE_SCALE); // 999_999_999_999.99

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    // Flat membership check: any status may follow any other.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("invalid status: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub game_id: i32,
    pub game_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// One line of an order that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub game_id: i32,
    pub game_name: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl NewOrderItem {
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Checks the creation constraints of an order and returns its total price.
///
/// Nothing is written before this succeeds, so a rejected order never leaves
/// rows behind.
pub fn validate_new_order(customer_id: &str, items: &[NewOrderItem]) -> Result<Decimal, AppError> {
    if customer_id.trim().is_empty() {
        return Err(AppError::validation("customer_id is required"));
    }
    if customer_id.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::validation(format!(
            "customer_id must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    if items.is_empty() {
        return Err(AppError::validation("order must contain at least one item"));
    }

    let mut total = Decimal::ZERO;
    for (index, item) in items.iter().enumerate() {
        if item.game_name.trim().is_empty() {
            return Err(AppError::validation(format!(
                "game_name is required for item {}",
                index + 1
            )));
        }
        if item.game_name.chars().count() > MAX_TEXT_LEN {
            return Err(AppError::validation(format!(
                "game_name must be at most {MAX_TEXT_LEN} characters for item {}",
                index + 1
            )));
        }
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "quantity must be greater than 0 for game {}",
                item.game_name
            )));
        }
        if item.price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "price cannot be negative for game {}",
                item.game_name
            )));
        }
        if item.price.normalize().scale() > PRICE_SCALE {
            return Err(AppError::validation(format!(
                "price must have at most {PRICE_SCALE} decimal places for game {}",
                item.game_name
            )));
        }
        if item.price > MAX_PRICE {
            return Err(AppError::validation(format!(
                "price cannot exceed {MAX_PRICE} for game {}",
                item.game_name
            )));
        }
        let subtotal = item
            .subtotal()
            .filter(|subtotal| *subtotal <= MAX_TOTAL)
            .ok_or_else(|| {
                AppError::validation(format!("subtotal is too large for game {}", item.game_name))
            })?;
        total = total
            .checked_add(subtotal)
            .filter(|total| *total <= MAX_TOTAL)
            .ok_or_else(|| AppError::validation("order total is too large"))?;
    }

    Ok(total)
}

/// Per-status aggregate produced by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusAggregate {
    pub status: String,
    pub orders: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderStatistics {
    pub total_orders: i64,
    /// Sum of `total_price` over delivered orders.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub status_counts: BTreeMap<String, i64>,
}

impl OrderStatistics {
    pub fn from_aggregates(rows: &[StatusAggregate]) -> Self {
        let mut status_counts: BTreeMap<String, i64> = OrderStatus::ALL
            .iter()
            .map(|status| (status.as_str().to_string(), 0))
            .collect();
        let mut total_orders = 0;
        let mut total_revenue = Decimal::ZERO;

        for row in rows {
            total_orders += row.orders;
            *status_counts.entry(row.status.clone()).or_insert(0) += row.orders;
            if row.status == OrderStatus::Delivered.as_str() {
                total_revenue += row.revenue;
            }
        }

        Self {
            total_orders,
            total_revenue,
            status_counts,
        }
    }
}
