use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::orders::{CreateOrderItemRequest, CreateOrderRequest, DeletedOrder, OrderList, UpdateOrderStatusRequest},
    error::ErrorBody,
    models::{Order, OrderItem, OrderStatistics, OrderStatus},
    response::{ApiResponse, Meta},
    routes::{health, orders},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Order Service", description = "Order lifecycle API"),
    paths(
        health::health_check,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::list_orders_by_customer,
        orders::update_order_status,
        orders::delete_order,
        orders::get_statistics
    ),
    components(
        schemas(
            Order,
            OrderItem,
            OrderStatus,
            OrderStatistics,
            CreateOrderRequest,
            CreateOrderItemRequest,
            UpdateOrderStatusRequest,
            OrderList,
            DeletedOrder,
            ErrorBody,
            health::HealthData,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderStatistics>,
            ApiResponse<DeletedOrder>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
