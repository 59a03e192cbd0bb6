//! Bearer token verification middleware

use crate::{
    auth::{jwt::JwtService, AuthError},
    error::AppError,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;

/// Placeholder some clients send when they have no token
const NULL_TOKEN: &str = "null";

/// Authenticated identity attached to the request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub subject: String,
    pub user_id: i64,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 Principal
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError::Auth(AuthError::MissingCredential))
    }
}

/// Pull the raw token out of `Authorization: Bearer <token>`
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::InvalidCredential)?;

    let mut fields = value.split_whitespace();

    match fields.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("Bearer") => {}
        None => return Err(AuthError::MissingCredential),
        Some(_) => return Err(AuthError::InvalidCredential),
    }

    match fields.next() {
        None | Some(NULL_TOKEN) => Err(AuthError::MissingCredential),
        Some(token) => Ok(token),
    }
}

/// Resolve the principal for a request, in memory only
pub fn verify(jwt_service: &JwtService, headers: &HeaderMap) -> Result<Principal, AuthError> {
    let token = extract_token(headers)?;
    let claims = jwt_service.decode(token)?;

    Ok(Principal {
        subject: claims.sub,
        user_id: claims.uid,
    })
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = verify(&jwt_service, req.headers()).map_err(|e| {
        metrics::counter!("auth_rejections_total", "reason" => match e {
            AuthError::MissingCredential => "missing",
            AuthError::InvalidCredential => "invalid",
        })
        .increment(1);
        tracing::debug!(reason = %e, uri = %req.uri(), "Rejected unauthenticated request");
        e
    })?;

    tracing::debug!(subject = %principal.subject, "Request authenticated");

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
