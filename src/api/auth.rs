use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::User;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub user_id: i32,
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Verify credentials and return the user (without its hash). The desktop
/// client authenticates per call; there is no server-side session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .store()
        .verify_user_password(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    Ok(Json(ApiResponse::success(user)))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::validation(
            "New password must be at least 8 characters",
        ));
    }
    if payload.current_password == payload.new_password {
        return Err(ApiError::validation(
            "New password must be different from current password",
        ));
    }

    let changed = state
        .store()
        .change_user_password(
            payload.user_id,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    if !changed {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password changed".to_string(),
    })))
}
