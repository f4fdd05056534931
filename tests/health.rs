use order_service::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_healthy() {
    let response = health_check().await;
    assert_eq!(response.0.status, "healthy");
    assert_eq!(response.0.service, "order-service");
}
