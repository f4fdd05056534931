use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, DeletedOrder, OrderList, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    models::{NewOrderItem, Order, OrderStatistics, OrderStatus, validate_new_order},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let items: Vec<NewOrderItem> = payload.items.into_iter().map(NewOrderItem::from).collect();
    validate_new_order(&payload.customer_id, &items)?;

    let order = state.store.create(&payload.customer_id, items).await?;

    Ok(ApiResponse::success(
        "Order created successfully",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = state.store.get_by_id(id).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn list_orders(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, page_size, offset) = pagination.normalize();
    let (orders, total) = state.store.list_all(page_size, offset).await?;

    let meta = Meta::new(page, page_size, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { orders, total },
        Some(meta),
    ))
}

pub async fn list_orders_by_customer(
    state: &AppState,
    customer_id: &str,
) -> AppResult<ApiResponse<OrderList>> {
    if customer_id.trim().is_empty() {
        return Err(AppError::validation("customer_id is required"));
    }

    let orders = state.store.list_by_customer(customer_id).await?;
    let total = orders.len() as i64;

    Ok(ApiResponse::success(
        "Customer orders",
        OrderList { orders, total },
        Some(Meta::total(total)),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let status: OrderStatus = payload.status.parse()?;

    state.store.update_status(id, status).await?;
    let order = state.store.get_by_id(id).await?;

    Ok(ApiResponse::success(
        "Order status updated successfully",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<DeletedOrder>> {
    state.store.delete(id).await?;
    Ok(ApiResponse::success(
        "Order deleted successfully",
        DeletedOrder { id },
        Some(Meta::empty()),
    ))
}

pub async fn get_statistics(state: &AppState) -> AppResult<ApiResponse<OrderStatistics>> {
    let aggregates = state.store.statistics().await?;
    let stats = OrderStatistics::from_aggregates(&aggregates);
    Ok(ApiResponse::success("Order statistics", stats, Some(Meta::empty())))
}
