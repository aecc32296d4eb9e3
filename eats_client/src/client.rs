use std::fmt::Display;

use anyhow::{anyhow, Result};
use eats_engine::{
    db_types::{
        MenuItem,
        MenuItemUpdate,
        NewMenuItem,
        NewRestaurant,
        OrderDetails,
        OrderId,
        OrderStatusType,
        ProfileUpdate,
        Restaurant,
        RestaurantUpdate,
        UserAccount,
    },
    order_objects::CheckoutOrder,
    restaurant_objects::RestaurantWithMenu,
    sales_report::{ReportPeriod, SalesSummary},
    traits::CheckoutSessionInfo,
    SignupRequest,
};
use eats_server::{
    data_objects::{
        AuthResponse,
        CheckoutSessionResponse,
        JsonResponse,
        LoginRequest,
        MenuResponse,
        OrdersResponse,
        RestaurantMenuResponse,
        RestaurantResponse,
        RestaurantSearchResponse,
        StatusUpdateRequest,
        StatusUpdateResponse,
        UserResponse,
    },
    server::API_PREFIX,
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    RequestBuilder,
    StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// A typed client for the EatsOnline REST API.
///
/// The client is stateless apart from the access token. The stores in [`crate::stores`] hold everything else.
pub struct EatsClient {
    client: Client,
    server: Url,
    access_token: Option<String>,
}

impl EatsClient {
    pub fn new(server: &str) -> Result<Self> {
        let server = Url::parse(server).map_err(|e| anyhow!("{server} is not a valid server url. {e}"))?;
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder().user_agent("EatsOnline Client").default_headers(headers).build()?;
        Ok(Self { client, server, access_token: None })
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        self.server.join(path).map_err(|e| anyhow!("Failed to join URL: {e}"))
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        self.url(&format!("{API_PREFIX}{path}"))
    }

    pub async fn health(&self) -> Result<String> {
        let res = self.client.get(self.url("/health")?).send().await?;
        Ok(res.text().await?)
    }

    //------------------------------------------   Users  --------------------------------------------------------
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let req = self.client.post(self.api_url("/user/signup")?).json(request);
        self.send(req, "signing up").await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let req = self.client.post(self.api_url("/user/login")?).json(&body);
        self.send(req, "logging in").await
    }

    pub async fn logout(&self) -> Result<JsonResponse> {
        let req = self.client.post(self.api_url("/user/logout")?);
        self.send(req, "logging out").await
    }

    /// The account the access token belongs to, or `None` if the server no longer accepts the token.
    pub async fn check_auth(&self) -> Result<Option<UserAccount>> {
        let req = self.authorized(self.client.get(self.api_url("/user/check-auth")?));
        let res = req.send().await?;
        match res.status() {
            StatusCode::UNAUTHORIZED => Ok(None),
            code if code.is_success() => Ok(Some(res.json::<UserResponse>().await?.user)),
            code => Err(error_from_response("checking authentication", code, res.text().await?)),
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserAccount> {
        let req = self.client.put(self.api_url("/user/profile/update")?).json(update);
        let res: UserResponse = self.send(self.authorized(req), "updating profile").await?;
        Ok(res.user)
    }

    //------------------------------------------   Restaurants  --------------------------------------------------
    pub async fn search_restaurants(&self, text: Option<&str>, cuisines: &[String]) -> Result<Vec<Restaurant>> {
        let mut query = Vec::new();
        if let Some(text) = text {
            query.push(("q", text.to_string()));
        }
        if !cuisines.is_empty() {
            query.push(("cuisines", cuisines.join(",")));
        }
        let req = self.client.get(self.api_url("/restaurant/search")?).query(&query);
        let res: RestaurantSearchResponse = self.send(req, "searching restaurants").await?;
        Ok(res.data)
    }

    pub async fn restaurant(&self, id: i64) -> Result<RestaurantWithMenu> {
        let req = self.client.get(self.api_url(&format!("/restaurant/{id}"))?);
        let res: RestaurantMenuResponse = self.send(req, "fetching restaurant").await?;
        Ok(res.restaurant)
    }

    pub async fn my_restaurant(&self) -> Result<RestaurantWithMenu> {
        let req = self.authorized(self.client.get(self.api_url("/restaurant")?));
        let res: RestaurantMenuResponse = self.send(req, "fetching your restaurant").await?;
        Ok(res.restaurant)
    }

    pub async fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<Restaurant> {
        let req = self.client.post(self.api_url("/restaurant")?).json(restaurant);
        let res: RestaurantResponse = self.send(self.authorized(req), "creating restaurant").await?;
        Ok(res.restaurant)
    }

    pub async fn update_restaurant(&self, update: &RestaurantUpdate) -> Result<Restaurant> {
        let req = self.client.put(self.api_url("/restaurant")?).json(update);
        let res: RestaurantResponse = self.send(self.authorized(req), "updating restaurant").await?;
        Ok(res.restaurant)
    }

    pub async fn add_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem> {
        let req = self.client.post(self.api_url("/menu")?).json(item);
        let res: MenuResponse = self.send(self.authorized(req), "adding menu item").await?;
        Ok(res.menu)
    }

    pub async fn update_menu_item(&self, id: i64, update: &MenuItemUpdate) -> Result<MenuItem> {
        let req = self.client.put(self.api_url(&format!("/menu/{id}"))?).json(update);
        let res: MenuResponse = self.send(self.authorized(req), "updating menu item").await?;
        Ok(res.menu)
    }

    pub async fn restaurant_orders(&self) -> Result<Vec<OrderDetails>> {
        let req = self.authorized(self.client.get(self.api_url("/restaurant/order")?));
        let res: OrdersResponse = self.send(req, "fetching restaurant orders").await?;
        Ok(res.orders)
    }

    pub async fn update_order_status(&self, order_id: &OrderId, status: OrderStatusType) -> Result<OrderStatusType> {
        let path = format!("/restaurant/order/{order_id}/status");
        let req = self.client.put(self.api_url(&path)?).json(&StatusUpdateRequest { status });
        let res: StatusUpdateResponse = self.send(self.authorized(req), "updating order status").await?;
        Ok(res.status)
    }

    //------------------------------------------   Orders  -------------------------------------------------------
    pub async fn my_orders(&self) -> Result<Vec<OrderDetails>> {
        let req = self.authorized(self.client.get(self.api_url("/order")?));
        let res: OrdersResponse = self.send(req, "fetching orders").await?;
        Ok(res.orders)
    }

    pub async fn checkout(&self, order: &CheckoutOrder) -> Result<CheckoutSessionInfo> {
        let req = self.client.post(self.api_url("/order/checkout/create-checkout-session")?).json(order);
        let res: CheckoutSessionResponse = self.send(self.authorized(req), "creating checkout session").await?;
        Ok(res.session)
    }

    pub async fn sales_summary(&self, period: ReportPeriod) -> Result<SalesSummary> {
        let req = self.client.get(self.api_url("/order/report/summary")?).query(&[("period", period.to_string())]);
        self.send(self.authorized(req), "fetching sales summary").await
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, action: &str) -> Result<T> {
        let res = req.send().await?;
        let code = res.status();
        trace!("{action}: {code}");
        if code.is_success() {
            Ok(res.json().await?)
        } else {
            Err(error_from_response(action, code, res.text().await?))
        }
    }
}

impl Display for EatsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.access_token.is_some() { "logged in" } else { "anonymous" };
        write!(f, "{} ({status})", self.server)
    }
}

/// The server reports failures as `{"error": "..."}`. Fall back to the raw body for anything else.
fn error_from_response(action: &str, code: StatusCode, body: String) -> anyhow::Error {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").or_else(|| v.get("message")).and_then(Value::as_str).map(String::from))
        .unwrap_or(body);
    anyhow!("Error {action}: {code}. {message}")
}
