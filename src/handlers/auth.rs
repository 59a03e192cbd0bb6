//! 认证相关的 HTTP 处理器

use crate::{
    auth::Principal,
    error::AppError,
    middleware::AppState,
    models::{auth::LoginRequest, user::CreateUserRequest},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload.map_err(reject_body)?;

    let response = state.auth_service.login(req).await?;

    Ok(Json(response))
}

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload.map_err(reject_body)?;

    let response = state.auth_service.create_user(req).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// 获取当前请求的身份
pub async fn current_principal(principal: Principal) -> Json<Principal> {
    Json(principal)
}

/// 请求体无法解析时统一返回 400
fn reject_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
