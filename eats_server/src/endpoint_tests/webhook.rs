use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use eats_common::{Pkr, Secret};
use eats_engine::{
    db_types::OrderStatusType,
    events::EventProducers,
    traits::OrderFlowError,
    OrderFlowApi,
};
use serde_json::{json, Value};
use stripe_tools::{helpers::signature_header, StripeConfig};

use super::{
    helpers::send_request,
    mocks::{order, MockEatsStore, MockGateway, ORDER_ID},
};
use crate::stripe_routes::{StripeWebhookRoute, STRIPE_SIGNATURE_HEADER};

const WEBHOOK_SECRET: &str = "whsec_endpoint_tests";
const WEBHOOK_PATH: &str = "/order/webhook";

fn configure_with(store: MockEatsStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(store, MockGateway::new(), EventProducers::default());
        let config = StripeConfig {
            webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()),
            webhook_tolerance_secs: 300,
            ..Default::default()
        };
        cfg.service(StripeWebhookRoute::<MockEatsStore, MockGateway>::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(config));
    }
}

fn completed_event(metadata: Value) -> Vec<u8> {
    json!({
        "id": "evt_1PwQ",
        "type": "checkout.session.completed",
        "created": 1_717_400_000,
        "livemode": false,
        "data": {"object": {
            "id": "cs_test_a1",
            "amount_total": 130_000,
            "currency": "pkr",
            "payment_status": "paid",
            "status": "complete",
            "metadata": metadata
        }}
    })
    .to_string()
    .into_bytes()
}

fn signed_request(payload: Vec<u8>, secret: &str) -> TestRequest {
    let header = signature_header(secret, Utc::now().timestamp(), &payload).expect("Could not sign payload");
    TestRequest::post().uri(WEBHOOK_PATH).insert_header((STRIPE_SIGNATURE_HEADER, header)).set_payload(payload)
}

#[actix_web::test]
async fn webhook_without_a_signature() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri(WEBHOOK_PATH).set_payload(completed_event(json!({"orderId": ORDER_ID})));
    let res = send_request(req, configure_with(MockEatsStore::new())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Missing Stripe signature");
}

#[actix_web::test]
async fn webhook_with_a_forged_signature() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_confirm_order().never();
    let req = signed_request(completed_event(json!({"orderId": ORDER_ID})), "whsec_someone_else");
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.starts_with("Webhook Error:"), "{}", res.body);
}

#[actix_web::test]
async fn webhook_confirms_the_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store
        .expect_fetch_order_by_order_id()
        .withf(|id| id.as_str() == ORDER_ID)
        .returning(|_| Ok(Some(order(OrderStatusType::Pending, Pkr::default()))));
    store
        .expect_confirm_order()
        .withf(|id, total| id.as_str() == ORDER_ID && *total == Some(Pkr::from_rupees(1300)))
        .times(1)
        .returning(|_, total| Ok(order(OrderStatusType::Confirmed, total.unwrap_or_default())));
    let req = signed_request(completed_event(json!({"orderId": ORDER_ID})), WEBHOOK_SECRET);
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.is_empty());
}

#[actix_web::test]
async fn webhook_for_an_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_order_by_order_id().returning(|_| Ok(None));
    store.expect_confirm_order().never();
    let req = signed_request(completed_event(json!({"orderId": "ffffffffffffffffffffffff"})), WEBHOOK_SECRET);
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json(), json!({"message": "Order not found"}));
}

#[actix_web::test]
async fn webhook_without_an_order_id() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_order_by_order_id().never();
    let req = signed_request(completed_event(json!({"images": "[]"})), WEBHOOK_SECRET);
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Order ID missing");
}

#[actix_web::test]
async fn webhook_ignores_other_events() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_order_by_order_id().never();
    let payload = json!({
        "id": "evt_2Xy",
        "type": "payment_intent.created",
        "data": {"object": {"id": "pi_1", "amount": 130_000}}
    })
    .to_string()
    .into_bytes();
    let res = send_request(signed_request(payload, WEBHOOK_SECRET), configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn webhook_reports_storage_failures() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store
        .expect_fetch_order_by_order_id()
        .returning(|_| Err(OrderFlowError::DatabaseError("database is locked".into())));
    let req = signed_request(completed_event(json!({"orderId": ORDER_ID})), WEBHOOK_SECRET);
    let res = send_request(req, configure_with(store)).await;
    // Stripe retries on 5xx
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json(), json!({"message": "Internal Server Error"}));
}
