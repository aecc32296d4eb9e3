#![allow(dead_code)]
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
    Mutex,
};

use eats_common::Pkr;
use eats_engine::{
    db_types::{DeliveryDetails, MenuItem, NewMenuItem, NewRestaurant, NewUserAccount, Restaurant, UserAccount},
    order_objects::{CartLine, CheckoutOrder},
    traits::{
        AccountManagement,
        CheckoutGateway,
        CheckoutGatewayError,
        CheckoutRequest,
        CheckoutSessionInfo,
        RestaurantManagement,
    },
    SqliteDatabase,
};

/// A checkout gateway that records every request instead of talking to a payment provider.
#[derive(Clone, Default)]
pub struct FakeGateway {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CheckoutRequest>>>,
    fail: bool,
}

impl FakeGateway {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CheckoutRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl CheckoutGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSessionInfo, CheckoutGatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(CheckoutGatewayError("card network is down".into()));
        }
        Ok(CheckoutSessionInfo {
            id: format!("cs_test_{n}"),
            url: Some(format!("https://checkout.example.com/pay/cs_test_{n}")),
        })
    }
}

pub async fn new_user(db: &SqliteDatabase, name: &str, admin: bool) -> UserAccount {
    let user = NewUserAccount {
        fullname: name.into(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        password_hash: "not-a-real-hash".into(),
        contact: String::new(),
        admin,
    };
    db.create_user_account(user).await.expect("Error creating user")
}

pub async fn new_restaurant(db: &SqliteDatabase, owner_id: i64, name: &str, cuisines: &[&str]) -> Restaurant {
    let restaurant = NewRestaurant {
        name: name.into(),
        city: "Lahore".into(),
        country: "Pakistan".into(),
        delivery_time: 30,
        cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
        image_url: format!("https://img.example.com/{}.png", name.to_lowercase().replace(' ', "_")),
    };
    db.create_restaurant(owner_id, restaurant).await.expect("Error creating restaurant")
}

pub async fn new_menu_item(db: &SqliteDatabase, restaurant_id: i64, name: &str, rupees: i64) -> MenuItem {
    let item = NewMenuItem {
        name: name.into(),
        description: format!("House {name}"),
        price: Pkr::from_rupees(rupees),
        image: format!("https://img.example.com/{}.png", name.to_lowercase()),
    };
    db.add_menu_item(restaurant_id, item).await.expect("Error creating menu item")
}

pub fn delivery_details() -> DeliveryDetails {
    DeliveryDetails {
        name: "Ali Raza".into(),
        email: "ali@example.com".into(),
        address: "12 Mall Road".into(),
        city: "Lahore".into(),
    }
}

pub fn checkout(restaurant_id: i64, lines: &[(i64, i64)]) -> CheckoutOrder {
    CheckoutOrder {
        restaurant_id,
        cart_items: lines.iter().map(|&(menu_id, quantity)| CartLine { menu_id, quantity }).collect(),
        delivery_details: delivery_details(),
    }
}
