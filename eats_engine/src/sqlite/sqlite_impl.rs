//! `SqliteDatabase` is the concrete storage backend for the EatsOnline engine.
//!
//! It implements every storage trait in [`crate::traits`], delegating to the query functions in [`super::db`].
use std::fmt::Debug;

use eats_common::Pkr;
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, menus, new_pool, orders, restaurants, users};
use crate::{
    db_types::{
        MenuItem,
        MenuItemUpdate,
        NewMenuItem,
        NewOrder,
        NewRestaurant,
        NewUserAccount,
        Order,
        OrderDetails,
        OrderId,
        OrderStatusType,
        ProfileUpdate,
        Restaurant,
        RestaurantUpdate,
        UserAccount,
        UserCredentials,
    },
    order_objects::OrderQueryFilter,
    restaurant_objects::RestaurantQuery,
    traits::{
        AccountApiError,
        AccountManagement,
        OrderFlowError,
        OrderManagement,
        RestaurantApiError,
        RestaurantManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the url in `EATS_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date with the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Database migrations are up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order_id = order.order_id.clone();
        orders::insert_order(order, &mut tx).await?;
        let order = orders::fetch_order_by_order_id(&order_id, &mut tx)
            .await?
            .ok_or_else(|| OrderFlowError::DatabaseError(format!("Order {order_id} vanished after insert")))?;
        tx.commit().await?;
        debug!("🗃️ Order {order_id} with {} items has been saved", order.items.len());
        Ok(order)
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_details_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_order_details_for_user(user_id, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_order_details_for_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<OrderDetails>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_order_details_for_restaurant(restaurant_id, &mut conn).await?;
        Ok(orders)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn confirm_order(&self, order_id: &OrderId, total: Option<Pkr>) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::confirm_order(order_id, total, &mut tx)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        tx.commit().await?;
        trace!("🗃️ Order {order_id} is {} with total {}", order.status, order.total_amount);
        Ok(order)
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatusType,
    ) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::update_order_status(order_id, status, &mut tx)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        tx.commit().await?;
        trace!("🗃️ Order {order_id} status set to {status}");
        Ok(order)
    }
}

impl RestaurantManagement for SqliteDatabase {
    async fn create_restaurant(
        &self,
        owner_id: i64,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        let restaurant = restaurants::insert_restaurant(owner_id, restaurant, &mut conn).await?;
        debug!("🗃️ Restaurant #{} saved for user #{owner_id}", restaurant.id);
        Ok(restaurant)
    }

    async fn update_restaurant(&self, id: i64, update: RestaurantUpdate) -> Result<Restaurant, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        restaurants::update_restaurant(id, update, &mut conn).await?.ok_or(RestaurantApiError::RestaurantNotFound(id))
    }

    async fn fetch_restaurant(&self, id: i64) -> Result<Option<Restaurant>, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(restaurants::fetch_restaurant(id, &mut conn).await?)
    }

    async fn fetch_restaurant_for_owner(&self, owner_id: i64) -> Result<Option<Restaurant>, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(restaurants::fetch_restaurant_for_owner(owner_id, &mut conn).await?)
    }

    async fn search_restaurants(&self, query: RestaurantQuery) -> Result<Vec<Restaurant>, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(restaurants::search_restaurants(query, &mut conn).await?)
    }

    async fn fetch_menu(&self, restaurant_id: i64) -> Result<Vec<MenuItem>, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(menus::fetch_menu(restaurant_id, &mut conn).await?)
    }

    async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(menus::fetch_menu_item(id, &mut conn).await?)
    }

    async fn add_menu_item(&self, restaurant_id: i64, item: NewMenuItem) -> Result<MenuItem, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        if restaurants::fetch_restaurant(restaurant_id, &mut conn).await?.is_none() {
            return Err(RestaurantApiError::RestaurantNotFound(restaurant_id));
        }
        let item = menus::insert_menu_item(restaurant_id, item, &mut conn).await?;
        debug!("🗃️ Menu item #{} saved for restaurant #{restaurant_id}", item.id);
        Ok(item)
    }

    async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<MenuItem, RestaurantApiError> {
        let mut conn = self.pool.acquire().await?;
        menus::update_menu_item(id, update, &mut conn).await?.ok_or(RestaurantApiError::MenuItemNotFound(id))
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_user_account(&self, user: NewUserAccount) -> Result<UserAccount, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = users::insert_user(user, &mut conn).await?;
        debug!("🗃️ User account #{} saved", account.id);
        Ok(account)
    }

    async fn fetch_user_account(&self, id: i64) -> Result<Option<UserAccount>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user(id, &mut conn).await?)
    }

    async fn fetch_credentials_for_email(&self, email: &str) -> Result<Option<UserCredentials>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_credentials(email, &mut conn).await?)
    }

    async fn record_login(&self, id: i64) -> Result<UserAccount, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_last_login(id, &mut conn).await?.ok_or(AccountApiError::UserNotFound(id))
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<UserAccount, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_profile(id, update, &mut conn).await?.ok_or(AccountApiError::UserNotFound(id))
    }
}
