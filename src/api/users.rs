use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::require_authority;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, MessageResponse, UserDto};
use crate::auth::{Principal, ROLE_ADMIN};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /api/users/welcome
pub async fn welcome() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::success(MessageResponse {
        message: "Welcome, this endpoint is not secure".to_string(),
    }))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_service().list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .user_service()
        .create_user(&payload.name, &payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_id("User", id)?;
    let user = state.user_service().get_user(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn get_user_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_service().get_user_by_email(&email).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn update_user_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .user_service()
        .update_user_by_email(&email, &payload.name)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_authority(&principal, ROLE_ADMIN)?;
    let id = validate_id("User", id)?;

    state.user_service().delete_user(id).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("User {id} deleted"),
    })))
}
