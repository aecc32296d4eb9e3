use std::fmt::Display;

use eats_common::helpers::parse_list;
use eats_engine::{
    db_types::{MenuItem, OrderDetails, OrderStatusType, Restaurant, UserAccount},
    restaurant_objects::{RestaurantQuery, RestaurantWithMenu},
    traits::CheckoutSessionInfo,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//----------------------------------------------   Users  -------------------------------------------------------------
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest").field("email", &self.email).field("password", &"****").finish()
    }
}

/// Returned by signup and login. The token is also set as a cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserAccount,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserAccount,
}

//----------------------------------------------   Orders  ------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<OrderDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub session: CheckoutSessionInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
}

//----------------------------------------------   Restaurants  -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub restaurant: Restaurant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantMenuResponse {
    pub success: bool,
    pub restaurant: RestaurantWithMenu,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSearchResponse {
    pub success: bool,
    pub data: Vec<Restaurant>,
}

/// `GET /restaurant/search?q=biryani&cuisines=desi,bbq`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    /// A comma-separated list
    #[serde(default)]
    pub cuisines: Option<String>,
}

impl From<SearchParams> for RestaurantQuery {
    fn from(params: SearchParams) -> Self {
        let query = params.cuisines.as_deref().map(parse_list).unwrap_or_default().into_iter().fold(
            RestaurantQuery::default(),
            |query, cuisine| query.with_cuisine(cuisine),
        );
        match params.q {
            Some(text) => query.with_search_text(text),
            None => query,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResponse {
    pub success: bool,
    pub message: String,
    pub menu: MenuItem,
}
