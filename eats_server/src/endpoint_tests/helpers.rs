use std::sync::Arc;

use actix_web::{
    body::to_bytes,
    http::{
        header::{HeaderMap, AUTHORIZATION, SET_COOKIE},
        StatusCode,
    },
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::Duration;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use super::mocks::{CUSTOMER_ID, OWNER_ID};
use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::AuthConfig,
    middleware::JwtAuthFactory,
    server::{json_config, query_config},
};

// DO NOT re-use this secret anywhere.
const TEST_JWT_SECRET: &str = "endpoint tests only: 9f1c2a7e55d04b3f8e6a1d2c";

pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::new(&AuthConfig::new(TEST_JWT_SECRET, Duration::hours(1)))
}

pub fn issue_token(claims: JwtClaims) -> String {
    test_issuer().issue_token(claims).expect("Failed to sign token")
}

pub fn customer_token() -> String {
    issue_token(JwtClaims { user_id: CUSTOMER_ID, email: "ali@example.com".into(), admin: false })
}

pub fn admin_token() -> String {
    issue_token(JwtClaims { user_id: OWNER_ID, email: "owner@example.com".into(), admin: true })
}

pub fn get(path: &str, token: Option<&str>) -> TestRequest {
    with_token(TestRequest::get().uri(path), token)
}

pub fn post<T: Serialize>(path: &str, token: Option<&str>, body: &T) -> TestRequest {
    with_token(TestRequest::post().uri(path).set_json(body), token)
}

pub fn put<T: Serialize>(path: &str, token: Option<&str>, body: &T) -> TestRequest {
    with_token(TestRequest::put().uri(path).set_json(body), token)
}

fn with_token(req: TestRequest, token: Option<&str>) -> TestRequest {
    match token {
        Some(token) => req.insert_header((AUTHORIZATION, format!("Bearer {token}"))),
        None => req,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|e| panic!("Response is not JSON ({e}): {}", self.body))
    }

    pub fn cookies(&self) -> Vec<String> {
        self.headers.get_all(SET_COOKIE).filter_map(|v| v.to_str().ok()).map(String::from).collect()
    }
}

/// Sends the request through the access token middleware to the routes set up by `configure`.
///
/// Errors raised by middleware (such as the ACL) are converted into responses, the same way the HTTP server would.
pub async fn send_request<F>(req: TestRequest, configure: F) -> TestResponse
where F: FnOnce(&mut ServiceConfig) {
    let issuer = Arc::new(test_issuer());
    let app = App::new()
        .wrap(JwtAuthFactory::new(Arc::clone(&issuer)))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(web::Data::from(issuer))
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.map_into_boxed_body().into_parts().1,
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = to_bytes(res.into_body()).await.expect("Could not read response body");
    TestResponse { status, headers, body: String::from_utf8_lossy(&bytes).into_owned() }
}
