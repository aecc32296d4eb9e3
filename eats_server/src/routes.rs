//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that need more than a few lines of logic belong in the engine, or
//! in a separate module (see [`crate::stripe_routes`]).
//!
//! Handlers are generic over the storage backend (and payment gateway), so that the endpoint tests can run them
//! against mocks. Each worker thread processes its requests sequentially, so handlers must never block: all I/O goes
//! through the async engine APIs.
use std::str::FromStr;

use actix_web::{get, post, web, HttpResponse, Responder};
use eats_engine::{
    db_types::{MenuItemUpdate, NewMenuItem, NewRestaurant, OrderId, ProfileUpdate, RestaurantUpdate},
    order_objects::CheckoutOrder,
    sales_report::ReportPeriod,
    traits::{AccountManagement, CheckoutGateway, OrderManagement, RestaurantManagement},
    AccountApi,
    AuthApi,
    OrderFlowApi,
    RestaurantApi,
    SignupRequest,
};
use log::*;

use crate::{
    auth::{removal_cookie, JwtClaims, Role, TokenIssuer},
    data_objects::{
        AuthResponse,
        CheckoutSessionResponse,
        JsonResponse,
        LoginRequest,
        MenuResponse,
        OrdersResponse,
        ReportQuery,
        RestaurantMenuResponse,
        RestaurantResponse,
        RestaurantSearchResponse,
        SearchParams,
        StatusUpdateRequest,
        StatusUpdateResponse,
        UserResponse,
    },
    errors::{AuthError, ServerError},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl <$($gen:ident: $($bound:ident $(+)?)+),+>) => {
        paste::paste! {
            pub struct [<$name:camel Route>]<$($gen),+>(core::marker::PhantomData<fn() -> ($($gen,)+)>);

            impl<$($gen),+> [<$name:camel Route>]<$($gen),+> {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self {
                    Self(core::marker::PhantomData)
                }
            }

            impl<$($gen),+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$($gen),+>
            where
                $($gen: $($bound +)+ 'static,)+
            {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name::<$($gen),+>);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl <$($gen:ident: $($bound:ident $(+)?)+),+>
        where requires [$($roles:expr),+]) => {
        paste::paste! {
            pub struct [<$name:camel Route>]<$($gen),+>(core::marker::PhantomData<fn() -> ($($gen,)+)>);

            impl<$($gen),+> [<$name:camel Route>]<$($gen),+> {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self {
                    Self(core::marker::PhantomData)
                }
            }

            impl<$($gen),+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$($gen),+>
            where
                $($gen: $($bound +)+ 'static,)+
            {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name::<$($gen),+>)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(signup => Post "/user/signup" impl <B: AccountManagement>);
/// Creates an account and logs the new user in. The access token is returned in the body and set as a cookie.
pub async fn signup<B>(
    body: web::Json<SignupRequest>,
    api: web::Data<AuthApi<B>>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement,
{
    let request = body.into_inner();
    debug!("💻️ POST signup for {}", request.email);
    let user = api.signup(request).await?;
    let token = issuer.issue_token(JwtClaims::for_account(&user))?;
    let cookie = issuer.auth_cookie(token.clone());
    let response = AuthResponse { success: true, message: "Account created successfully".into(), user, token };
    Ok(HttpResponse::Created().cookie(cookie).json(response))
}

route!(login => Post "/user/login" impl <B: AccountManagement>);
pub async fn login<B>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<B>>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement,
{
    let LoginRequest { email, password } = body.into_inner();
    debug!("💻️ POST login for {email}");
    let user = api.login(&email, &password).await?;
    let token = issuer.issue_token(JwtClaims::for_account(&user))?;
    let cookie = issuer.auth_cookie(token.clone());
    let message = format!("Welcome back {}", user.fullname);
    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse { success: true, message, user, token }))
}

#[post("/user/logout")]
pub async fn logout() -> impl Responder {
    trace!("💻️ POST logout");
    HttpResponse::Ok().cookie(removal_cookie()).json(JsonResponse::success("Logged out successfully."))
}

route!(check_auth => Get "/user/check-auth" impl <B: AccountManagement>);
/// Returns the account of the logged-in user.
pub async fn check_auth<B>(claims: JwtClaims, api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError>
where B: AccountManagement {
    trace!("💻️ GET check-auth for user #{}", claims.user_id);
    let user = api
        .account_by_id(claims.user_id)
        .await?
        .ok_or(ServerError::AuthenticationError(AuthError::AccountNotFound))?;
    Ok(HttpResponse::Ok().json(UserResponse { success: true, message: None, user }))
}

route!(update_profile => Put "/user/profile/update" impl <B: AccountManagement>);
pub async fn update_profile<B>(
    claims: JwtClaims,
    body: web::Json<ProfileUpdate>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement,
{
    debug!("💻️ PUT profile update for user #{}", claims.user_id);
    let user = api.update_profile(claims.user_id, body.into_inner()).await?;
    let message = Some("Profile updated successfully".to_string());
    Ok(HttpResponse::Ok().json(UserResponse { success: true, message, user }))
}

//----------------------------------------------   Restaurants  ----------------------------------------------------
route!(create_restaurant => Post "/restaurant" impl <B: RestaurantManagement> where requires [Role::Admin]);
pub async fn create_restaurant<B>(
    claims: JwtClaims,
    body: web::Json<NewRestaurant>,
    api: web::Data<RestaurantApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: RestaurantManagement,
{
    debug!("💻️ POST new restaurant for user #{}", claims.user_id);
    let restaurant = api.create_restaurant(claims.user_id, body.into_inner()).await?;
    let message = Some("Restaurant added".to_string());
    Ok(HttpResponse::Created().json(RestaurantResponse { success: true, message, restaurant }))
}

route!(update_restaurant => Put "/restaurant" impl <B: RestaurantManagement> where requires [Role::Admin]);
pub async fn update_restaurant<B>(
    claims: JwtClaims,
    body: web::Json<RestaurantUpdate>,
    api: web::Data<RestaurantApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: RestaurantManagement,
{
    debug!("💻️ PUT restaurant update for user #{}", claims.user_id);
    let restaurant = api.update_my_restaurant(claims.user_id, body.into_inner()).await?;
    let message = Some("Restaurant updated".to_string());
    Ok(HttpResponse::Ok().json(RestaurantResponse { success: true, message, restaurant }))
}

route!(my_restaurant => Get "/restaurant" impl <B: RestaurantManagement> where requires [Role::Admin]);
pub async fn my_restaurant<B>(claims: JwtClaims, api: web::Data<RestaurantApi<B>>) -> Result<HttpResponse, ServerError>
where B: RestaurantManagement {
    trace!("💻️ GET restaurant for user #{}", claims.user_id);
    let restaurant = api.my_restaurant(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(RestaurantMenuResponse { success: true, restaurant }))
}

route!(search_restaurants => Get "/restaurant/search" impl <B: RestaurantManagement>);
pub async fn search_restaurants<B>(
    query: web::Query<SearchParams>,
    api: web::Data<RestaurantApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: RestaurantManagement,
{
    let params = query.into_inner();
    trace!("💻️ GET restaurant search for {params:?}");
    let data = api.search(params.into()).await?;
    Ok(HttpResponse::Ok().json(RestaurantSearchResponse { success: true, data }))
}

route!(restaurant_by_id => Get "/restaurant/{id:\\d+}" impl <B: RestaurantManagement>);
pub async fn restaurant_by_id<B>(
    path: web::Path<i64>,
    api: web::Data<RestaurantApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: RestaurantManagement,
{
    let id = path.into_inner();
    trace!("💻️ GET restaurant #{id}");
    let restaurant = api.restaurant_with_menu(id).await?;
    Ok(HttpResponse::Ok().json(RestaurantMenuResponse { success: true, restaurant }))
}

route!(restaurant_orders => Get "/restaurant/order"
    impl <B: OrderManagement + RestaurantManagement, G: CheckoutGateway> where requires [Role::Admin]);
/// Orders placed with the caller's restaurant.
pub async fn restaurant_orders<B, G>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + RestaurantManagement,
    G: CheckoutGateway,
{
    trace!("💻️ GET restaurant orders for user #{}", claims.user_id);
    let orders = api.orders_for_restaurant_owner(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(OrdersResponse { success: true, orders }))
}

route!(update_order_status => Put "/restaurant/order/{order_id}/status"
    impl <B: OrderManagement + RestaurantManagement, G: CheckoutGateway> where requires [Role::Admin]);
/// Moves an order along the delivery pipeline. Orders can never be moved back to `pending` or `confirmed` here.
pub async fn update_order_status<B, G>(
    claims: JwtClaims,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + RestaurantManagement,
    G: CheckoutGateway,
{
    let order_id = OrderId::from_str(&path.into_inner()).map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    let status = body.into_inner().status;
    debug!("💻️ PUT status {status} for order {order_id} by user #{}", claims.user_id);
    let order = api.modify_status_for_order(claims.user_id, &order_id, status).await?;
    Ok(HttpResponse::Ok().json(StatusUpdateResponse {
        success: true,
        message: "Status updated".into(),
        status: order.status,
    }))
}

//----------------------------------------------   Menus  ----------------------------------------------------
route!(add_menu => Post "/menu" impl <B: RestaurantManagement> where requires [Role::Admin]);
pub async fn add_menu<B>(
    claims: JwtClaims,
    body: web::Json<NewMenuItem>,
    api: web::Data<RestaurantApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: RestaurantManagement,
{
    debug!("💻️ POST new menu item for user #{}", claims.user_id);
    let menu = api.add_menu_item(claims.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(MenuResponse { success: true, message: "Menu added successfully".into(), menu }))
}

route!(update_menu => Put "/menu/{id:\\d+}" impl <B: RestaurantManagement> where requires [Role::Admin]);
pub async fn update_menu<B>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<MenuItemUpdate>,
    api: web::Data<RestaurantApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: RestaurantManagement,
{
    let id = path.into_inner();
    debug!("💻️ PUT menu item #{id} for user #{}", claims.user_id);
    let menu = api.update_menu_item(claims.user_id, id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MenuResponse { success: true, message: "Menu updated".into(), menu }))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(my_orders => Get "/order" impl <B: OrderManagement + RestaurantManagement, G: CheckoutGateway>);
pub async fn my_orders<B, G>(claims: JwtClaims, api: web::Data<OrderFlowApi<B, G>>) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + RestaurantManagement,
    G: CheckoutGateway,
{
    trace!("💻️ GET orders for user #{}", claims.user_id);
    let orders = api.orders_for_user(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(OrdersResponse { success: true, orders }))
}

route!(checkout => Post "/order/checkout/create-checkout-session"
    impl <B: OrderManagement + RestaurantManagement, G: CheckoutGateway>);
/// Creates a hosted checkout session for the cart and returns it as `{session: {id, url}}`. The client redirects the
/// customer to `url`. The order stays `pending` until the payment provider calls the webhook.
pub async fn checkout<B, G>(
    claims: JwtClaims,
    body: web::Json<CheckoutOrder>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + RestaurantManagement,
    G: CheckoutGateway,
{
    let order = body.into_inner();
    debug!(
        "💻️ POST checkout for user #{} at restaurant #{} ({} lines)",
        claims.user_id,
        order.restaurant_id,
        order.cart_items.len()
    );
    let result = api.create_checkout_session(claims.user_id, Some(claims.email), order).await?;
    Ok(HttpResponse::Ok().json(CheckoutSessionResponse { session: result.session }))
}

route!(sales_summary => Get "/order/report/summary"
    impl <B: OrderManagement + RestaurantManagement, G: CheckoutGateway>);
pub async fn sales_summary<B, G>(
    claims: JwtClaims,
    query: web::Query<ReportQuery>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + RestaurantManagement,
    G: CheckoutGateway,
{
    let period = match query.into_inner().period {
        Some(p) => ReportPeriod::from_str(&p).map_err(|e| ServerError::ValidationError(e.to_string()))?,
        None => ReportPeriod::default(),
    };
    trace!("💻️ GET {period} sales summary for user #{}", claims.user_id);
    let summary = api.sales_summary(period).await?;
    Ok(HttpResponse::Ok().json(summary))
}
