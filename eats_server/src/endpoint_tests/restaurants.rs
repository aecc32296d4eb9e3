use actix_web::{http::StatusCode, web, web::ServiceConfig};
use eats_common::Pkr;
use eats_engine::{
    db_types::{MenuItem, OrderStatusType, Restaurant},
    events::EventProducers,
    OrderFlowApi,
    RestaurantApi,
};
use mockall::predicate::eq;
use serde_json::json;

use super::{
    helpers::{admin_token, customer_token, get, post, put, send_request},
    mocks::{menu, order, order_details, restaurant, MockEatsStore, MockGateway, ORDER_ID, OWNER_ID, RESTAURANT_ID},
};
use crate::routes::{
    AddMenuRoute,
    CreateRestaurantRoute,
    MyRestaurantRoute,
    RestaurantByIdRoute,
    RestaurantOrdersRoute,
    SearchRestaurantsRoute,
    UpdateMenuRoute,
    UpdateOrderStatusRoute,
};

fn configure_restaurants(store: MockEatsStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.service(SearchRestaurantsRoute::<MockEatsStore>::new())
            .service(RestaurantByIdRoute::<MockEatsStore>::new())
            .service(CreateRestaurantRoute::<MockEatsStore>::new())
            .service(MyRestaurantRoute::<MockEatsStore>::new())
            .service(AddMenuRoute::<MockEatsStore>::new())
            .service(UpdateMenuRoute::<MockEatsStore>::new())
            .app_data(web::Data::new(RestaurantApi::new(store)));
    }
}

fn configure_orders(store: MockEatsStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(store, MockGateway::new(), EventProducers::default());
        cfg.service(RestaurantOrdersRoute::<MockEatsStore, MockGateway>::new())
            .service(UpdateOrderStatusRoute::<MockEatsStore, MockGateway>::new())
            .app_data(web::Data::new(api));
    }
}

fn new_restaurant() -> serde_json::Value {
    json!({
        "name": "Karachi Kitchen",
        "city": "Lahore",
        "country": "Pakistan",
        "deliveryTime": 30,
        "cuisines": ["Desi"]
    })
}

fn status_path() -> String {
    format!("/restaurant/order/{ORDER_ID}/status")
}

#[actix_web::test]
async fn create_restaurant_anonymously() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_create_restaurant().never();
    let res = send_request(post("/restaurant", None, &new_restaurant()), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_restaurant_as_a_customer() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_create_restaurant().never();
    let token = customer_token();
    let res = send_request(post("/restaurant", Some(&token), &new_restaurant()), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.json()["error"], "Insufficient Permissions. Restaurant administrators only.");
}

#[actix_web::test]
async fn create_restaurant_as_an_admin() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant_for_owner().with(eq(OWNER_ID)).returning(|_| Ok(None));
    store
        .expect_create_restaurant()
        .withf(|owner, r| *owner == OWNER_ID && r.name == "Karachi Kitchen" && r.delivery_time == 30)
        .times(1)
        .returning(|_, _| Ok(restaurant()));
    let token = admin_token();
    let res = send_request(post("/restaurant", Some(&token), &new_restaurant()), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let json = res.json();
    assert_eq!(json["message"], "Restaurant added");
    assert_eq!(json["restaurant"]["id"], RESTAURANT_ID);
}

#[actix_web::test]
async fn an_admin_may_only_own_one_restaurant() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant_for_owner().returning(|_| Ok(Some(restaurant())));
    store.expect_create_restaurant().never();
    let token = admin_token();
    let res = send_request(post("/restaurant", Some(&token), &new_restaurant()), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn my_restaurant_includes_the_menu() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant_for_owner().returning(|_| Ok(Some(restaurant())));
    store.expect_fetch_menu().with(eq(RESTAURANT_ID)).returning(|_| Ok(menu()));
    let token = admin_token();
    let res = send_request(get("/restaurant", Some(&token)), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["restaurant"]["name"], "Karachi Kitchen");
    assert_eq!(json["restaurant"]["menus"][1]["price"], 300);
}

#[actix_web::test]
async fn search_restaurants() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store
        .expect_search_restaurants()
        .withf(|q| q.search_text.as_deref() == Some("karachi") && q.cuisines == vec!["desi".to_string()])
        .returning(|_| Ok(vec![restaurant()]));
    let res = send_request(get("/restaurant/search?q=karachi&cuisines=desi", None), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"][0]["cuisines"], json!(["Desi", "BBQ"]));
}

#[actix_web::test]
async fn fetch_an_unknown_restaurant() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant().with(eq(404)).returning(|_| Ok(None));
    let res = send_request(get("/restaurant/404", None), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn add_menu_item() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant_for_owner().returning(|_| Ok(Some(restaurant())));
    store
        .expect_add_menu_item()
        .withf(|id, item| *id == RESTAURANT_ID && item.price == Pkr::from_rupees(450))
        .returning(|id, item| {
            let mut saved = menu().remove(0);
            saved.id = 3;
            saved.restaurant_id = id;
            saved.name = item.name;
            saved.price = item.price;
            Ok::<MenuItem, _>(saved)
        });
    let token = admin_token();
    let body = json!({"name": "Nihari", "description": "Slow-cooked beef", "price": 450});
    let res = send_request(post("/menu", Some(&token), &body), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.json()["menu"]["name"], "Nihari");
}

#[actix_web::test]
async fn update_another_restaurants_menu_item() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant_for_owner().returning(|_| Ok(Some(restaurant())));
    store.expect_fetch_menu_item().returning(|_| {
        let mut item = menu().remove(0);
        item.restaurant_id = 99;
        Ok(Some(item))
    });
    store.expect_update_menu_item().never();
    let token = admin_token();
    let res = send_request(put("/menu/1", Some(&token), &json!({"price": 10})), configure_restaurants(store)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn restaurant_orders() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_restaurant_for_owner().with(eq(OWNER_ID)).returning(|_| Ok(Some(restaurant())));
    store
        .expect_fetch_order_details_for_restaurant()
        .with(eq(RESTAURANT_ID))
        .returning(|_| Ok(vec![order_details(order(OrderStatusType::Confirmed, Pkr::from_rupees(1300)))]));
    let token = admin_token();
    let res = send_request(get("/restaurant/order", Some(&token)), configure_orders(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["orders"][0]["user"]["fullname"], "Ali Raza");
}

#[actix_web::test]
async fn update_order_status() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store
        .expect_fetch_order_by_order_id()
        .returning(|_| Ok(Some(order(OrderStatusType::Confirmed, Pkr::from_rupees(1300)))));
    store.expect_fetch_restaurant_for_owner().returning(|_| Ok(Some(restaurant())));
    store
        .expect_update_order_status()
        .withf(|_, status| *status == OrderStatusType::OutForDelivery)
        .times(1)
        .returning(|_, status| Ok(order(status, Pkr::from_rupees(1300))));
    let token = admin_token();
    let res =
        send_request(put(&status_path(), Some(&token), &json!({"status": "outfordelivery"})), configure_orders(store))
            .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"success": true, "message": "Status updated", "status": "outfordelivery"}));
}

#[actix_web::test]
async fn pending_orders_cannot_be_prepared() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_fetch_order_by_order_id().returning(|_| Ok(Some(order(OrderStatusType::Pending, Pkr::default()))));
    store.expect_fetch_restaurant_for_owner().returning(|_| Ok(Some(restaurant())));
    store.expect_update_order_status().never();
    let token = admin_token();
    let res =
        send_request(put(&status_path(), Some(&token), &json!({"status": "preparing"})), configure_orders(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn orders_of_other_restaurants_are_off_limits() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store
        .expect_fetch_order_by_order_id()
        .returning(|_| Ok(Some(order(OrderStatusType::Confirmed, Pkr::from_rupees(1300)))));
    store.expect_fetch_restaurant_for_owner().returning(|_| Ok(Some(Restaurant { id: 99, ..restaurant() })));
    store.expect_update_order_status().never();
    let token = admin_token();
    let res =
        send_request(put(&status_path(), Some(&token), &json!({"status": "preparing"})), configure_orders(store)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unknown_statuses_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut store = MockEatsStore::new();
    store.expect_update_order_status().never();
    let token = admin_token();
    let res =
        send_request(put(&status_path(), Some(&token), &json!({"status": "eaten"})), configure_orders(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
