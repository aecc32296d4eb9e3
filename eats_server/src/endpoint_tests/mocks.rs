use chrono::{TimeZone, Utc};
use eats_common::Pkr;
use eats_engine::{
    db_types::{
        DeliveryDetails,
        MenuItem,
        MenuItemUpdate,
        NewMenuItem,
        NewOrder,
        NewRestaurant,
        NewUserAccount,
        Order,
        OrderDetails,
        OrderId,
        OrderItem,
        OrderStatusType,
        ProfileUpdate,
        Restaurant,
        RestaurantBrief,
        RestaurantUpdate,
        UserAccount,
        UserBrief,
        UserCredentials,
    },
    order_objects::OrderQueryFilter,
    restaurant_objects::RestaurantQuery,
    traits::{
        AccountApiError,
        AccountManagement,
        CheckoutGateway,
        CheckoutGatewayError,
        CheckoutRequest,
        CheckoutSessionInfo,
        OrderFlowError,
        OrderManagement,
        RestaurantApiError,
        RestaurantManagement,
    },
};
use mockall::mock;

mock! {
    pub EatsStore {}
    impl OrderManagement for EatsStore {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderFlowError>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_order_details_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError>;
        async fn fetch_order_details_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderFlowError>;
        async fn confirm_order(&self, order_id: &OrderId, total: Option<Pkr>) -> Result<Order, OrderFlowError>;
        async fn update_order_status(&self, order_id: &OrderId, status: OrderStatusType) -> Result<Order, OrderFlowError>;
    }
    impl RestaurantManagement for EatsStore {
        async fn create_restaurant(&self, owner_id: i64, restaurant: NewRestaurant) -> Result<Restaurant, RestaurantApiError>;
        async fn update_restaurant(&self, id: i64, update: RestaurantUpdate) -> Result<Restaurant, RestaurantApiError>;
        async fn fetch_restaurant(&self, id: i64) -> Result<Option<Restaurant>, RestaurantApiError>;
        async fn fetch_restaurant_for_owner(&self, owner_id: i64) -> Result<Option<Restaurant>, RestaurantApiError>;
        async fn search_restaurants(&self, query: RestaurantQuery) -> Result<Vec<Restaurant>, RestaurantApiError>;
        async fn fetch_menu(&self, restaurant_id: i64) -> Result<Vec<MenuItem>, RestaurantApiError>;
        async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, RestaurantApiError>;
        async fn add_menu_item(&self, restaurant_id: i64, item: NewMenuItem) -> Result<MenuItem, RestaurantApiError>;
        async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<MenuItem, RestaurantApiError>;
    }
}

mock! {
    pub AccountManager {}
    impl AccountManagement for AccountManager {
        async fn create_user_account(&self, user: NewUserAccount) -> Result<UserAccount, AccountApiError>;
        async fn fetch_user_account(&self, id: i64) -> Result<Option<UserAccount>, AccountApiError>;
        async fn fetch_credentials_for_email(&self, email: &str) -> Result<Option<UserCredentials>, AccountApiError>;
        async fn record_login(&self, id: i64) -> Result<UserAccount, AccountApiError>;
        async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<UserAccount, AccountApiError>;
    }
}

mock! {
    pub Gateway {}
    impl CheckoutGateway for Gateway {
        async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSessionInfo, CheckoutGatewayError>;
    }
}

//----------------------------------------------   Sample data  ----------------------------------------------------

pub const RESTAURANT_ID: i64 = 7;
pub const OWNER_ID: i64 = 3;
pub const CUSTOMER_ID: i64 = 11;
pub const ORDER_ID: &str = "66a1b2c3d4e5f60718293a4b";

pub fn account(id: i64, admin: bool) -> UserAccount {
    let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    UserAccount {
        id,
        fullname: "Ayesha Khan".into(),
        email: "ayesha@example.com".into(),
        contact: "0300 1234567".into(),
        address: "12 Mall Road".into(),
        city: "Lahore".into(),
        country: "Pakistan".into(),
        profile_picture: String::new(),
        admin,
        last_login: None,
        created_at: ts,
        updated_at: ts,
    }
}

pub fn restaurant() -> Restaurant {
    let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Restaurant {
        id: RESTAURANT_ID,
        user_id: OWNER_ID,
        name: "Karachi Kitchen".into(),
        city: "Lahore".into(),
        country: "Pakistan".into(),
        delivery_time: 30,
        cuisines: vec!["Desi".into(), "BBQ".into()],
        image_url: "https://img.example.com/kk.png".into(),
        created_at: ts,
        updated_at: ts,
    }
}

/// Biryani (500) and Raita (300)
pub fn menu() -> Vec<MenuItem> {
    let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    vec![
        MenuItem {
            id: 1,
            restaurant_id: RESTAURANT_ID,
            name: "Biryani".into(),
            description: "Chicken biryani".into(),
            price: Pkr::from_rupees(500),
            image: "https://img.example.com/biryani.png".into(),
            created_at: ts,
            updated_at: ts,
        },
        MenuItem {
            id: 2,
            restaurant_id: RESTAURANT_ID,
            name: "Raita".into(),
            description: String::new(),
            price: Pkr::from_rupees(300),
            image: "https://img.example.com/raita.png".into(),
            created_at: ts,
            updated_at: ts,
        },
    ]
}

/// A pending order for 2 × Biryani and 1 × Raita
pub fn order(status: OrderStatusType, total: Pkr) -> Order {
    let ts = Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap();
    Order {
        id: 1,
        order_id: OrderId(ORDER_ID.into()),
        user_id: CUSTOMER_ID,
        restaurant_id: RESTAURANT_ID,
        delivery_details: DeliveryDetails {
            name: "Ali Raza".into(),
            email: "ali@example.com".into(),
            address: "12 Mall Road".into(),
            city: "Lahore".into(),
        },
        items: vec![
            OrderItem {
                menu_id: 1,
                name: "Biryani".into(),
                image: String::new(),
                price: Pkr::from_rupees(500),
                quantity: 2,
            },
            OrderItem {
                menu_id: 2,
                name: "Raita".into(),
                image: String::new(),
                price: Pkr::from_rupees(300),
                quantity: 1,
            },
        ],
        total_amount: total,
        status,
        created_at: ts,
        updated_at: ts,
    }
}

pub fn order_details(order: Order) -> OrderDetails {
    OrderDetails {
        order,
        restaurant: RestaurantBrief { id: RESTAURANT_ID, name: "Karachi Kitchen".into(), image: String::new() },
        user: UserBrief { id: CUSTOMER_ID, fullname: "Ali Raza".into(), email: "ali@example.com".into() },
    }
}
