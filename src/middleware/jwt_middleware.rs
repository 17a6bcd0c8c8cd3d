/// JWT Authentication Middleware
///
/// Validates RS256 access tokens from the Authorization header and injects
/// the claims into request extensions for use by route handlers.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::AccessTokenVerifier;
use crate::error::{AppError, AuthError};

/// JWT middleware for protecting routes
///
/// Rejected requests get the 401 envelope without reaching the handler.
pub struct JwtMiddleware {
    verifier: Arc<AccessTokenVerifier>,
}

impl JwtMiddleware {
    pub fn new(verifier: Arc<AccessTokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    verifier: Arc<AccessTokenVerifier>,
}

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match bearer_token(&req) {
            None => Err(AppError::Auth(AuthError::MissingToken)),
            Some(token) => self.verifier.verify(&token),
        };

        match claims {
            Ok(claims) => {
                tracing::debug!(user_id = claims.user_id, "JWT validated successfully");
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(err) => {
                let response = err.error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}
