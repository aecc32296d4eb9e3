//! Access tokens.
//!
//! Users log in with their email and password, and receive an HS256-signed JWT carrying [`JwtClaims`]. The token is
//! returned in the response body and also set as an http-only cookie, so that both browser and API clients can use it.
//! Clients may present it either as a `Bearer` token in the `Authorization` header, or via the cookie.
use std::future::{ready, Ready};

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::Payload,
    FromRequest,
    HttpMessage,
    HttpRequest,
};
use chrono::Duration;
use eats_engine::db_types::UserAccount;
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    Token,
    UntrustedToken,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError, errors::ServerError};

pub const AUTH_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Any authenticated user
    User,
    /// Restaurant administrators
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i64,
    pub email: String,
    pub admin: bool,
}

impl JwtClaims {
    pub fn for_account(account: &UserAccount) -> Self {
        Self { user_id: account.id, email: account.email.clone(), admin: account.admin }
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::User => true,
            Role::Admin => self.admin,
        }
    }
}

/// Handlers that take `JwtClaims` as an argument are only reachable by authenticated users. The claims are placed in
/// the request extensions by [`crate::middleware::JwtAuthFactory`].
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        ready(claims.ok_or(ServerError::AuthenticationError(AuthError::MissingToken)))
    }
}

pub struct TokenIssuer {
    key: Hs256Key,
    expiry: Duration,
    secure_cookies: bool,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenIssuer (expiry: {}s)", self.expiry.num_seconds())
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
        Self { key, expiry: config.token_expiry, secure_cookies: config.secure_cookies }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn issue_token(&self, claims: JwtClaims) -> Result<String, AuthError> {
        let header = Header::empty().with_token_type("JWT");
        let claims = Claims::new(claims).set_duration_and_issuance(&TimeOptions::default(), self.expiry);
        let token = Hs256.token(&header, &claims, &self.key).map_err(|e| AuthError::TokenIssueError(e.to_string()))?;
        trace!("🔑️ Issued access token for user #{}", claims.custom.user_id);
        Ok(token)
    }

    /// Checks the signature and expiry of an access token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted = UntrustedToken::new(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let token: Token<JwtClaims> =
            Hs256.validator(&self.key).validate(&untrusted).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        token
            .claims()
            .validate_expiration(&TimeOptions::default())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let (_, claims) = token.into_parts();
        Ok(claims.custom)
    }

    pub fn auth_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(AUTH_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Strict)
            .max_age(CookieDuration::seconds(self.expiry.num_seconds()))
            .finish()
    }
}

/// A cookie that tells the browser to forget the access token.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").http_only(true).finish();
    cookie.make_removal();
    cookie
}
