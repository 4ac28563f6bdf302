//! Request gates.
//!
//! `AuthMiddleware` admits a request only with a verifiable token and stores
//! the caller's identity in the request extensions. `AdminOnly` must be
//! registered inside it (actix runs the outermost `wrap` first) and admits only
//! callers whose role is exactly `admin`.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{debug, warn};
use std::sync::Arc;

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::TokenService;
use crate::error::AppError;

pub const MISSING_HEADER: &str = "authorization header required";
pub const INVALID_TOKEN: &str = "invalid token";
pub const ADMIN_REQUIRED: &str = "admin access required";

type GateFuture<B> = LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>;

/// Ends the request here with the error's JSON response.
fn reject<B: 'static>(req: ServiceRequest, error: AppError) -> GateFuture<B> {
    let response = req.error_response(error).map_into_right_body();
    Box::pin(ready(Ok(response)))
}

/// Extracts the token from an `Authorization` value, with or without `Bearer `.
///
/// `None` only when the header is absent or empty. Anything else, including a
/// bare `Bearer ` or a non-UTF-8 value, is handed on for verification.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?;
    if value.is_empty() {
        return None;
    }
    let raw = value.to_str().unwrap_or_default();
    Some(raw.strip_prefix("Bearer ").unwrap_or(raw).trim().to_owned())
}

pub struct AuthMiddleware {
    tokens: Arc<TokenService>,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = GateFuture<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(token) = bearer_token(&req) else {
            debug!("No authorization header on {} {}", req.method(), req.path());
            return reject(req, AppError::Unauthorized(MISSING_HEADER.into()));
        };

        match self.tokens.verify(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(AuthenticatedUser::from(claims));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                warn!("Rejected token on {} {}: {}", req.method(), req.path(), e);
                reject(req, AppError::Unauthorized(INVALID_TOKEN.into()))
            }
        }
    }
}

pub struct AdminOnly;

impl<S, B> Transform<S, ServiceRequest> for AdminOnly
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminOnlyService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminOnlyService { service }))
    }
}

pub struct AdminOnlyService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminOnlyService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = GateFuture<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_admin = req
            .extensions()
            .get::<AuthenticatedUser>()
            .map(AuthenticatedUser::is_admin)
            .unwrap_or(false);

        if !is_admin {
            warn!("Non-admin caller denied on {} {}", req.method(), req.path());
            return reject(req, AppError::Forbidden(ADMIN_REQUIRED.into()));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
