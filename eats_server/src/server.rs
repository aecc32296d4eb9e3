use std::{sync::Arc, time::Duration};

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    error::{JsonPayloadError, QueryPayloadError},
    http::{header, KeepAlive},
    middleware::Logger,
    web,
    App,
    Error,
    HttpRequest,
    HttpServer,
};
use eats_engine::{events::EventProducers, AccountApi, AuthApi, OrderFlowApi, RestaurantApi, SqliteDatabase};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    integrations::{order_events::create_order_event_handlers, stripe::StripeGateway},
    middleware::JwtAuthFactory,
    routes::{
        health,
        logout,
        AddMenuRoute,
        CheckAuthRoute,
        CheckoutRoute,
        CreateRestaurantRoute,
        LoginRoute,
        MyOrdersRoute,
        MyRestaurantRoute,
        RestaurantByIdRoute,
        RestaurantOrdersRoute,
        SalesSummaryRoute,
        SearchRestaurantsRoute,
        SignupRoute,
        UpdateMenuRoute,
        UpdateOrderStatusRoute,
        UpdateProfileRoute,
        UpdateRestaurantRoute,
    },
    stripe_routes::StripeWebhookRoute,
};

pub const API_PREFIX: &str = "/api/v1";
const DB_MAX_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, DB_MAX_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = StripeGateway::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = create_order_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: StripeGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), gateway.clone(), producers.clone());
        let auth_api = AuthApi::new(db.clone()).with_admin_emails(config.admin_emails.clone());
        let accounts_api = AccountApi::new(db.clone());
        let restaurant_api = RestaurantApi::new(db.clone());
        let jwt_signer = Arc::new(TokenIssuer::new(&config.auth));
        let api_scope = web::scope(API_PREFIX)
            .service(SignupRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(logout)
            .service(CheckAuthRoute::<SqliteDatabase>::new())
            .service(UpdateProfileRoute::<SqliteDatabase>::new())
            .service(SearchRestaurantsRoute::<SqliteDatabase>::new())
            .service(RestaurantOrdersRoute::<SqliteDatabase, StripeGateway>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase, StripeGateway>::new())
            .service(RestaurantByIdRoute::<SqliteDatabase>::new())
            .service(CreateRestaurantRoute::<SqliteDatabase>::new())
            .service(UpdateRestaurantRoute::<SqliteDatabase>::new())
            .service(MyRestaurantRoute::<SqliteDatabase>::new())
            .service(AddMenuRoute::<SqliteDatabase>::new())
            .service(UpdateMenuRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase, StripeGateway>::new())
            .service(CheckoutRoute::<SqliteDatabase, StripeGateway>::new())
            .service(SalesSummaryRoute::<SqliteDatabase, StripeGateway>::new())
            .service(StripeWebhookRoute::<SqliteDatabase, StripeGateway>::new());
        App::new()
            .wrap(JwtAuthFactory::new(Arc::clone(&jwt_signer)))
            .wrap(cors_policy(config.cors_origin.as_deref()))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("eats::access_log"))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(restaurant_api))
            .app_data(web::Data::new(config.stripe.clone()))
            .app_data(web::Data::from(jwt_signer))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Only the configured web client may make cross-origin requests, and it may send cookies.
pub fn cors_policy(origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600);
    match origin {
        Some(origin) => {
            debug!("💻️ Accepting cross-origin requests from {origin}");
            cors.allowed_origin(origin)
        },
        None => cors,
    }
}

/// Malformed request bodies get the same JSON error shape as every other client error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| -> Error {
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| -> Error {
        ServerError::ValidationError(err.to_string()).into()
    })
}
