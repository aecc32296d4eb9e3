use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use eats_engine::{
    db_types::{UserAccount, UserCredentials},
    AccountApi,
    AuthApi,
};
use mockall::predicate::eq;
use serde_json::json;

use super::{
    helpers::{customer_token, get, post, send_request, test_issuer},
    mocks::{account, MockAccountManager, CUSTOMER_ID},
};
use crate::{
    auth::AUTH_COOKIE,
    routes::{logout, CheckAuthRoute, LoginRoute, SignupRoute},
};

// Keeps the bcrypt work in tests small
const TEST_HASH_COST: u32 = 4;

fn configure_auth(accounts: MockAccountManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = AuthApi::new(accounts).with_hash_cost(TEST_HASH_COST);
        cfg.service(SignupRoute::<MockAccountManager>::new())
            .service(LoginRoute::<MockAccountManager>::new())
            .service(logout)
            .app_data(web::Data::new(api));
    }
}

fn configure_accounts(accounts: MockAccountManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.service(CheckAuthRoute::<MockAccountManager>::new()).app_data(web::Data::new(AccountApi::new(accounts)));
    }
}

#[actix_web::test]
async fn signup() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_credentials_for_email().withf(|email| email == "ayesha@example.com").returning(|_| Ok(None));
    accounts
        .expect_create_user_account()
        .withf(|u| u.email == "ayesha@example.com" && u.password_hash.starts_with("$2") && !u.admin)
        .times(1)
        .returning(|u| {
            Ok(UserAccount { fullname: u.fullname, email: u.email, contact: u.contact, ..account(21, false) })
        });
    let body =
        json!({"fullname": "Ayesha Khan", "email": "Ayesha@Example.com ", "password": "karahi123", "contact": ""});
    let res = send_request(post("/user/signup", None, &body), configure_auth(accounts)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let json = res.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["user"]["email"], "ayesha@example.com");
    let token = json["token"].as_str().expect("token missing");
    let claims = test_issuer().validate_token(token).expect("Token should be valid");
    assert_eq!(claims.user_id, 21);
    assert!(!claims.admin);
    let cookies = res.cookies();
    assert!(cookies.iter().any(|c| c.starts_with(&format!("{AUTH_COOKIE}={token}")) && c.contains("HttpOnly")));
}

#[actix_web::test]
async fn signup_with_a_short_password() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_create_user_account().never();
    let body = json!({"fullname": "Ayesha Khan", "email": "ayesha@example.com", "password": "abc"});
    let res = send_request(post("/user/signup", None, &body), configure_auth(accounts)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn signup_with_a_registered_email() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_credentials_for_email().returning(|_| {
        Ok(Some(UserCredentials { id: 3, email: "ayesha@example.com".into(), password_hash: "$2b$04$x".into() }))
    });
    accounts.expect_create_user_account().never();
    let body = json!({"fullname": "Ayesha Khan", "email": "ayesha@example.com", "password": "karahi123"});
    let res = send_request(post("/user/signup", None, &body), configure_auth(accounts)).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn login() {
    let _ = env_logger::try_init().ok();
    let hash = bcrypt::hash("karahi123", TEST_HASH_COST).unwrap();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_credentials_for_email().returning(move |_| {
        Ok(Some(UserCredentials { id: CUSTOMER_ID, email: "ayesha@example.com".into(), password_hash: hash.clone() }))
    });
    accounts.expect_record_login().with(eq(CUSTOMER_ID)).times(1).returning(|id| Ok(account(id, false)));
    let body = json!({"email": "ayesha@example.com", "password": "karahi123"});
    let res = send_request(post("/user/login", None, &body), configure_auth(accounts)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["message"], "Welcome back Ayesha Khan");
    assert!(res.cookies().iter().any(|c| c.starts_with(&format!("{AUTH_COOKIE}="))));
}

#[actix_web::test]
async fn login_with_the_wrong_password() {
    let _ = env_logger::try_init().ok();
    let hash = bcrypt::hash("karahi123", TEST_HASH_COST).unwrap();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_credentials_for_email().returning(move |_| {
        Ok(Some(UserCredentials { id: CUSTOMER_ID, email: "ayesha@example.com".into(), password_hash: hash.clone() }))
    });
    accounts.expect_record_login().never();
    let body = json!({"email": "ayesha@example.com", "password": "nihari123"});
    let res = send_request(post("/user/login", None, &body), configure_auth(accounts)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.cookies().is_empty());
}

#[actix_web::test]
async fn login_with_an_unknown_email() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_credentials_for_email().returning(|_| Ok(None));
    let body = json!({"email": "nobody@example.com", "password": "karahi123"});
    let res = send_request(post("/user/login", None, &body), configure_auth(accounts)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["error"], "Authentication Error. Incorrect email or password.");
}

#[actix_web::test]
async fn logout_clears_the_cookie() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/user/logout");
    let res = send_request(req, configure_auth(MockAccountManager::new())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.cookies().iter().any(|c| c.starts_with(&format!("{AUTH_COOKIE}=;"))));
}

#[actix_web::test]
async fn check_auth_with_a_bearer_token() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user_account().with(eq(CUSTOMER_ID)).returning(|id| Ok(Some(account(id, false))));
    let token = customer_token();
    let res = send_request(get("/user/check-auth", Some(&token)), configure_accounts(accounts)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["user"]["id"], CUSTOMER_ID);
}

#[actix_web::test]
async fn check_auth_with_a_cookie() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user_account().returning(|id| Ok(Some(account(id, false))));
    let req = TestRequest::get().uri("/user/check-auth").cookie(test_issuer().auth_cookie(customer_token()));
    let res = send_request(req, configure_accounts(accounts)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn check_auth_with_a_tampered_token() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user_account().never();
    let mut token = customer_token();
    token.replace_range(token.len() - 10..token.len() - 5, "AAAAA");
    let res = send_request(get("/user/check-auth", Some(&token)), configure_accounts(accounts)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn check_auth_for_a_deleted_account() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user_account().returning(|_| Ok(None));
    let token = customer_token();
    let res = send_request(get("/user/check-auth", Some(&token)), configure_accounts(accounts)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["error"], "Authentication Error. User account not found.");
}
