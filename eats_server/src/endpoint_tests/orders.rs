use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use eats_common::Pkr;
use eats_engine::{
    db_types::{Order, OrderStatusType},
    events::EventProducers,
    traits::{CheckoutSessionInfo, GatewayLineItem},
    OrderFlowApi,
};
use mockall::predicate::eq;
use serde_json::json;

use super::{
    helpers::{customer_token, get, post, send_request},
    mocks::{menu, order, order_details, restaurant, MockEatsStore, MockGateway, CUSTOMER_ID, RESTAURANT_ID},
};
use crate::routes::{CheckoutRoute, MyOrdersRoute, SalesSummaryRoute};

const CHECKOUT_PATH: &str = "/order/checkout/create-checkout-session";

fn configure_with(store: MockEatsStore, gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(store, gateway, EventProducers::default());
        cfg.service(MyOrdersRoute::<MockEatsStore, MockGateway>::new())
            .service(CheckoutRoute::<MockEatsStore, MockGateway>::new())
            .service(SalesSummaryRoute::<MockEatsStore, MockGateway>::new())
            .app_data(web::Data::new(api));
    }
}

fn cart() -> serde_json::Value {
    json!({
        "restaurantId": RESTAURANT_ID,
        "cartItems": [{"menuId": 1, "quantity": 2}, {"menuId": 2, "quantity": 1}],
        "deliveryDetails": {"name": "Ali Raza", "email": "ali@example.com", "address": "12 Mall Road", "city": "Lahore"}
    })
}

fn store_with_menu() -> MockEatsStore {
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant().with(eq(RESTAURANT_ID)).returning(|_| Ok(Some(restaurant())));
    store.expect_fetch_menu().with(eq(RESTAURANT_ID)).returning(|_| Ok(menu()));
    store
}

#[actix_web::test]
async fn fetch_my_orders_without_a_token() {
    let _ = env_logger::try_init().ok();
    let res = send_request(get("/order", None), configure_with(MockEatsStore::new(), MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["success"], false);
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store
        .expect_fetch_order_details_for_user()
        .with(eq(CUSTOMER_ID))
        .returning(|_| Ok(vec![order_details(order(OrderStatusType::Confirmed, Pkr::from_rupees(1300)))]));
    let token = customer_token();
    let res = send_request(get("/order", Some(&token)), configure_with(store, MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["success"], true);
    let order = &json["orders"][0];
    assert_eq!(order["orderId"], "66a1b2c3d4e5f60718293a4b");
    assert_eq!(order["status"], "confirmed");
    assert_eq!(order["totalAmount"], 1300);
    assert_eq!(order["cartItems"].as_array().map(Vec::len), Some(2));
    assert_eq!(order["restaurant"]["name"], "Karachi Kitchen");
}

#[actix_web::test]
async fn checkout_with_an_unknown_menu_item() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_menu();
    store.expect_insert_order().never();
    let mut gateway = MockGateway::new();
    gateway.expect_create_checkout_session().never();
    let mut body = cart();
    body["cartItems"][1]["menuId"] = json!(99);
    let token = customer_token();
    let res = send_request(post(CHECKOUT_PATH, Some(&token), &body), configure_with(store, gateway)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "menu item 99 not found");
}

#[actix_web::test]
async fn checkout_with_an_empty_cart() {
    let _ = env_logger::try_init().ok();
    let mut body = cart();
    body["cartItems"] = json!([]);
    let token = customer_token();
    let res = send_request(
        post(CHECKOUT_PATH, Some(&token), &body),
        configure_with(MockEatsStore::new(), MockGateway::new()),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn checkout() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_menu();
    store
        .expect_insert_order()
        .withf(|o| o.user_id == CUSTOMER_ID && o.restaurant_id == RESTAURANT_ID && o.items.len() == 2)
        .times(1)
        .returning(|o| {
            let mut saved = order(OrderStatusType::Pending, Pkr::default());
            saved.order_id = o.order_id;
            Ok::<Order, _>(saved)
        });
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_checkout_session()
        .withf(|req| {
            // Prices come from the menu, in paisa
            let amounts = req.line_items.iter().map(|l| (l.unit_amount, l.quantity)).collect::<Vec<_>>();
            amounts == vec![(50_000, 2), (30_000, 1)] &&
                req.customer_email.as_deref() == Some("ali@example.com") &&
                req.images.len() == 2
        })
        .times(1)
        .returning(|_| {
            Ok(CheckoutSessionInfo {
                id: "cs_test_a1".into(),
                url: Some("https://checkout.stripe.com/c/pay/cs_test_a1".into()),
            })
        });
    let token = customer_token();
    let res = send_request(post(CHECKOUT_PATH, Some(&token), &cart()), configure_with(store, gateway)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.json(),
        json!({"session": {"id": "cs_test_a1", "url": "https://checkout.stripe.com/c/pay/cs_test_a1"}})
    );
}

#[actix_web::test]
async fn checkout_item_names_come_from_the_menu() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_menu();
    store.expect_insert_order().returning(|o| {
        let mut saved = order(OrderStatusType::Pending, Pkr::default());
        saved.order_id = o.order_id;
        Ok(saved)
    });
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_checkout_session()
        .withf(|req| {
            req.line_items[0] ==
                GatewayLineItem {
                    name: "Biryani".into(),
                    image: "https://img.example.com/biryani.png".into(),
                    unit_amount: 50_000,
                    quantity: 2,
                }
        })
        .returning(|_| Ok(CheckoutSessionInfo { id: "cs_test_a2".into(), url: None }));
    let mut body = cart();
    // Anything else the client sends about the item is ignored
    body["cartItems"][0]["name"] = json!("Free biryani");
    body["cartItems"][0]["price"] = json!(1);
    let token = customer_token();
    let res = send_request(post(CHECKOUT_PATH, Some(&token), &body), configure_with(store, gateway)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn checkout_with_a_malformed_body() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri(CHECKOUT_PATH)
        .insert_header(("Authorization", format!("Bearer {}", customer_token())))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"restaurantId\": ");
    let res = send_request(req, configure_with(MockEatsStore::new(), MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["success"], false);
}

#[actix_web::test]
async fn sales_summary() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_search_orders().withf(|q| q.status == Some(vec![OrderStatusType::Confirmed])).returning(|_| {
        let first = order(OrderStatusType::Confirmed, Pkr::from_rupees(1300));
        let mut second = order(OrderStatusType::Confirmed, Pkr::from_rupees(1300));
        second.items.truncate(1);
        Ok(vec![first, second])
    });
    let token = customer_token();
    let req = get("/order/report/summary?period=weekly", Some(&token));
    let res = send_request(req, configure_with(store, MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["totalSales"], 2300);
    assert_eq!(json["totalOrders"], 2);
    assert_eq!(json["avgOrderValue"], 1150);
    assert_eq!(json["period"], "weekly");
    assert_eq!(json["salesByPeriod"], json!([{"period": "2024-06-03", "sales": 2300, "orders": 2}]));
    assert_eq!(json["topProducts"][0], json!({"name": "Biryani", "totalSales": 2000, "unitsSold": 4}));
}

#[actix_web::test]
async fn sales_summary_with_an_unknown_period() {
    let _ = env_logger::try_init().ok();
    let token = customer_token();
    let res = send_request(
        get("/order/report/summary?period=yearly", Some(&token)),
        configure_with(MockEatsStore::new(), MockGateway::new()),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "Conversion error: Invalid report period: yearly");
}
