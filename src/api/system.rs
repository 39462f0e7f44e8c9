use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatusDto};

pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatusDto>>, ApiError> {
    let database_ok = state.store().ping().await.is_ok();

    let users = state.store().count_users(false, None).await.unwrap_or(0);
    let tables = state.store().count_tables(None).await.unwrap_or(0);
    let bookings = state.store().count_bookings(None, None, None).await.unwrap_or(0);

    Ok(Json(ApiResponse::success(SystemStatusDto {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database_ok,
        users,
        tables,
        bookings,
    })))
}
