use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};

use crate::{
    dto::orders::{CreateOrderRequest, DeletedOrder, OrderList, UpdateOrderStatusRequest},
    error::{AppError, AppResult, ErrorBody},
    models::{Order, OrderStatistics},
    response::ApiResponse,
    routes::params::{Pagination, parse_order_id},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/stats", get(get_statistics))
        .route("/orders/customer/{customer_id}", get(list_orders_by_customer))
        .route("/orders/{id}", get(get_order).delete(delete_order))
        .route("/orders/{id}/status", put(update_order_status))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<Order>),
        (status = 400, description = "Invalid order", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let Json(payload) = payload.map_err(invalid_body)?;
    let resp = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(Pagination),
    responses(
        (status = 200, description = "Page of orders, newest first", body = ApiResponse<OrderList>),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 400, description = "Malformed order id", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let id = parse_order_id(&id)?;
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/customer/{customer_id}",
    params(
        ("customer_id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Orders of the customer, newest first", body = ApiResponse<OrderList>),
        (status = 400, description = "Missing customer id", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn list_orders_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders_by_customer(&state, &customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(
        ("id" = uuid::Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let id = parse_order_id(&id)?;
    let Json(payload) = payload.map_err(invalid_body)?;
    let resp = order_service::update_order_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order and its items deleted", body = ApiResponse<DeletedOrder>),
        (status = 404, description = "Not Found", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeletedOrder>>> {
    let id = parse_order_id(&id)?;
    let resp = order_service::delete_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/stats",
    responses(
        (status = 200, description = "Order counts per status and delivered revenue", body = ApiResponse<OrderStatistics>),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn get_statistics(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderStatistics>>> {
    let resp = order_service::get_statistics(&state).await?;
    Ok(Json(resp))
}
