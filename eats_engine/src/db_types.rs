//! Data types that are stored in, and read from, the database.
//!
//! Json naming follows the web client's conventions (camelCase), so these types can be returned from the API as-is.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use eats_common::Pkr;
use log::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

impl ConversionError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self(msg.into())
    }
}

//--------------------------------------        OrderId        ---------------------------------------------------------
/// Public identifier for an order. It is generated before the order is saved, since it has to be embedded in the
/// checkout session metadata, and is how the payment provider refers back to the order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

pub const ORDER_ID_BYTES: usize = 12;

impl OrderId {
    /// A new random 24-character hex identifier.
    pub fn random() -> Self {
        let mut bytes = [0u8; ORDER_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ConversionError("Order id cannot be empty".into()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// A checkout session was created, but the payment provider has not confirmed payment.
    Pending,
    /// The payment provider has confirmed payment.
    Confirmed,
    /// The restaurant is preparing the order.
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatusType {
    /// Whether an administrator may move an order from `self` into `new_status`.
    ///
    /// Payment confirmation is the only way out of `Pending`, and nothing ever goes back to `Pending`.
    pub fn admin_can_transition_to(&self, new_status: OrderStatusType) -> bool {
        use OrderStatusType::*;
        !matches!(self, Pending) && !matches!(new_status, Pending | Confirmed) && *self != new_status
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Confirmed => write!(f, "confirmed"),
            OrderStatusType::Preparing => write!(f, "preparing"),
            OrderStatusType::OutForDelivery => write!(f, "outfordelivery"),
            OrderStatusType::Delivered => write!(f, "delivered"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "outfordelivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------   DeliveryDetails     ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DeliveryDetails {
    #[sqlx(rename = "delivery_name")]
    pub name: String,
    #[sqlx(rename = "delivery_email")]
    pub email: String,
    #[sqlx(rename = "delivery_address")]
    pub address: String,
    #[sqlx(rename = "delivery_city")]
    pub city: String,
}

impl DeliveryDetails {
    /// Returns the name of the first empty field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [("name", &self.name), ("email", &self.email), ("address", &self.address), ("city", &self.city)]
            .into_iter()
            .find(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k)
    }
}

//--------------------------------------        OrderItem      ---------------------------------------------------------
/// A snapshot of a menu item at the time the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_id: i64,
    pub name: String,
    pub image: String,
    pub price: Pkr,
    pub quantity: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> Pkr {
        self.price * self.quantity
    }
}

//--------------------------------------          Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub user_id: i64,
    pub restaurant_id: i64,
    #[sqlx(flatten)]
    pub delivery_details: DeliveryDetails,
    #[sqlx(skip)]
    #[serde(rename = "cartItems")]
    pub items: Vec<OrderItem>,
    /// Zero until the payment provider confirms the charge.
    pub total_amount: Pkr,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The value of the order according to its line items. This ignores `total_amount`.
    pub fn items_total(&self) -> Pkr {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub delivery_details: DeliveryDetails,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// A fresh pending order with a random order id.
    pub fn new(user_id: i64, restaurant_id: i64, delivery_details: DeliveryDetails, items: Vec<OrderItem>) -> Self {
        Self { order_id: OrderId::random(), user_id, restaurant_id, delivery_details, items, created_at: Utc::now() }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn items_total(&self) -> Pkr {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

//--------------------------------------      OrderDetails     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RestaurantBrief {
    #[sqlx(rename = "restaurant_id")]
    pub id: i64,
    #[sqlx(rename = "restaurant_name")]
    pub name: String,
    #[sqlx(rename = "restaurant_image")]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserBrief {
    #[sqlx(rename = "user_id")]
    pub id: i64,
    #[sqlx(rename = "user_fullname")]
    pub fullname: String,
    #[sqlx(rename = "user_email")]
    pub email: String,
}

/// An order along with the names of the customer and restaurant involved.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    #[sqlx(flatten)]
    pub restaurant: RestaurantBrief,
    #[sqlx(flatten)]
    pub user: UserBrief,
}

//--------------------------------------       Restaurant      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    /// Estimated delivery time, in minutes.
    pub delivery_time: i64,
    pub cuisines: Vec<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for Restaurant {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let cuisines = row.try_get::<String, _>("cuisines")?;
        let cuisines = serde_json::from_str::<Vec<String>>(&cuisines)
            .map_err(|e| sqlx::Error::ColumnDecode { index: "cuisines".into(), source: Box::new(e) })?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
            delivery_time: row.try_get("delivery_time")?,
            cuisines,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub name: String,
    pub city: String,
    pub country: String,
    pub delivery_time: i64,
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub image_url: String,
}

/// Fields of a restaurant that the owner may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub delivery_time: Option<i64>,
    pub cuisines: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl RestaurantUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() &&
            self.city.is_none() &&
            self.country.is_none() &&
            self.delivery_time.is_none() &&
            self.cuisines.is_none() &&
            self.image_url.is_none()
    }
}

//--------------------------------------        MenuItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: String,
    pub price: Pkr,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Pkr,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Pkr>,
    pub image: Option<String>,
}

impl MenuItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none() && self.image.is_none()
    }
}

//--------------------------------------       UserAccount     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub contact: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub profile_picture: String,
    pub admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The stored password hash for an account. Never leaves the engine.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewUserAccount {
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub contact: String,
    pub admin: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() &&
            self.contact.is_none() &&
            self.address.is_none() &&
            self.city.is_none() &&
            self.country.is_none() &&
            self.profile_picture.is_none()
    }
}
