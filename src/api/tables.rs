use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_limit};
use super::{ApiError, ApiResponse, AppState};
use crate::db::{TableListFilter, TableUpdate};
use crate::models::{DiningTable, TableStatus};

#[derive(Deserialize)]
pub struct ListTablesQuery {
    pub status: Option<String>,
    pub min_seats: Option<i32>,
    pub max_seats: Option<i32>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct AvailableTablesQuery {
    pub min_seats: Option<i32>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct CreateTableRequest {
    pub table_number: i32,
    pub seats: i32,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTableRequest {
    pub table_number: Option<i32>,
    pub seats: Option<i32>,
    pub status: Option<String>,
}

fn parse_status(raw: Option<String>) -> Result<Option<TableStatus>, ApiError> {
    raw.map(|s| s.parse::<TableStatus>().map_err(ApiError::validation))
        .transpose()
}

pub async fn list_tables(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTablesQuery>,
) -> Result<Json<ApiResponse<Vec<DiningTable>>>, ApiError> {
    let limit = query.limit.map(validate_limit).transpose()?;

    let tables = state
        .store()
        .list_tables(TableListFilter {
            status: parse_status(query.status)?,
            min_seats: query.min_seats,
            max_seats: query.max_seats,
            limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(tables)))
}

pub async fn list_available_tables(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailableTablesQuery>,
) -> Result<Json<ApiResponse<Vec<DiningTable>>>, ApiError> {
    let limit = query.limit.map(validate_limit).transpose()?;

    let tables = state
        .store()
        .list_available_tables(query.min_seats, limit)
        .await?;

    Ok(Json(ApiResponse::success(tables)))
}

pub async fn create_table(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTableRequest>,
) -> Result<Json<ApiResponse<DiningTable>>, ApiError> {
    if payload.table_number <= 0 {
        return Err(ApiError::validation("Table number must be positive"));
    }
    if payload.seats <= 0 {
        return Err(ApiError::validation("Seat count must be greater than 0"));
    }

    let status = parse_status(payload.status)?;

    let id = match state
        .store()
        .create_table(payload.table_number, payload.seats, status)
        .await
    {
        Ok(id) => id,
        Err(err) if err.to_string().contains("UNIQUE") => {
            return Err(ApiError::Conflict(format!(
                "Table number {} already exists",
                payload.table_number
            )));
        }
        Err(err) => return Err(err.into()),
    };

    let table = state
        .store()
        .get_table(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Table", id))?;

    Ok(Json(ApiResponse::success(table)))
}

pub async fn get_table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DiningTable>>, ApiError> {
    validate_id(id)?;

    let table = state
        .store()
        .get_table(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Table", id))?;

    Ok(Json(ApiResponse::success(table)))
}

pub async fn update_table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTableRequest>,
) -> Result<Json<ApiResponse<DiningTable>>, ApiError> {
    validate_id(id)?;

    if let Some(seats) = payload.seats
        && seats <= 0
    {
        return Err(ApiError::validation("Seat count must be greater than 0"));
    }

    let changes = TableUpdate {
        table_number: payload.table_number,
        seats: payload.seats,
        status: parse_status(payload.status)?,
    };

    if changes.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    let updated = state.store().update_table(id, changes).await?;
    if !updated {
        return Err(ApiError::not_found("Table", id));
    }

    let table = state
        .store()
        .get_table(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Table", id))?;

    Ok(Json(ApiResponse::success(table)))
}

/// Deleting a table cascades to its bookings.
pub async fn delete_table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    validate_id(id)?;

    let deleted = state.store().delete_table(id).await?;
    if !deleted {
        return Err(ApiError::not_found("Table", id));
    }

    Ok(Json(ApiResponse::success(true)))
}
