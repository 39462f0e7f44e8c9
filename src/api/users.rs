use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_limit};
use super::{ApiError, ApiResponse, AppState};
use crate::db::{NewUser, UserListFilter, UserUpdate};
use crate::models::{Role, User};

#[derive(Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub active_only: bool,
    pub role: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct DeleteUserQuery {
    #[serde(default)]
    pub hard: bool,
}

fn parse_role(raw: Option<String>) -> Result<Option<Role>, ApiError> {
    raw.map(|r| r.parse::<Role>().map_err(ApiError::validation))
        .transpose()
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let limit = query.limit.map(validate_limit).transpose()?;

    let users = state
        .store()
        .list_users(UserListFilter {
            active_only: query.active_only,
            role: parse_role(query.role)?,
            limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(users)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name cannot be empty"));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ApiError::validation("A valid email address is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password cannot be empty"));
    }

    let new_user = NewUser {
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_string(),
        password: payload.password,
        phone: payload.phone,
        role: parse_role(payload.role)?,
        is_active: payload.is_active.unwrap_or(true),
    };

    // Email uniqueness is the store's constraint; surface it as a conflict.
    let id = match state.store().create_user(new_user).await {
        Ok(id) => id,
        Err(err) if err.to_string().contains("UNIQUE") => {
            return Err(ApiError::Conflict("Email is already registered".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    let user = state
        .store()
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(user)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    validate_id(id)?;

    let user = state
        .store()
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(user)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    validate_id(id)?;

    let changes = UserUpdate {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        password: payload.password,
        role: parse_role(payload.role)?,
        is_active: payload.is_active,
    };

    if changes.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    let updated = state.store().update_user(id, changes).await?;
    if !updated {
        return Err(ApiError::not_found("User", id));
    }

    let user = state
        .store()
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(user)))
}

/// Soft-deactivates by default; `?hard=true` removes the row and cascades
/// the user's bookings.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<DeleteUserQuery>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    validate_id(id)?;

    let deleted = if query.hard {
        state.store().delete_user(id).await?
    } else {
        state.store().deactivate_user(id).await?
    };

    if !deleted {
        return Err(ApiError::not_found("User", id));
    }

    Ok(Json(ApiResponse::success(true)))
}
