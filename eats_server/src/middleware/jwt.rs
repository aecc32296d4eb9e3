//! Access token middleware.
//!
//! Wrapped around the whole API. If the request carries a valid access token, its [`JwtClaims`] are placed in the
//! request extensions. Requests with a missing or invalid token pass through untouched; it is up to the route (via the
//! `JwtClaims` extractor or [`super::AclMiddlewareFactory`]) to decide whether authentication is required.
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
    HttpMessage,
};
use futures::future::{ok, Ready};
use log::*;

use crate::auth::{TokenIssuer, AUTH_COOKIE};

/// The access token from the `Authorization: Bearer` header, falling back to the auth cookie.
pub fn access_token_from_request(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| req.cookie(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|s| !s.is_empty()))
}

pub struct JwtAuthFactory {
    issuer: Arc<TokenIssuer>,
}

impl JwtAuthFactory {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtAuthService { issuer: Arc::clone(&self.issuer), service })
    }
}

pub struct JwtAuthService<S> {
    issuer: Arc<TokenIssuer>,
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = access_token_from_request(&req) {
            match self.issuer.validate_token(&token) {
                Ok(claims) => {
                    trace!("🔑️ Request to {} is from user #{}", req.path(), claims.user_id);
                    req.extensions_mut().insert(claims);
                },
                Err(e) => debug!("🔑️ Ignoring access token on request to {}. {e}", req.path()),
            }
        }
        self.service.call(req)
    }
}
