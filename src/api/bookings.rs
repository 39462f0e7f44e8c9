use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{parse_date, parse_time, validate_id, validate_limit};
use super::{ApiError, ApiResponse, AppState, AvailabilityDto, BookingDto};
use crate::db::{BookingChanges, BookingListFilter};
use crate::models::BookingStatus;
use crate::services::BookingError;

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
    pub date: Option<String>,
    pub user_id: Option<i32>,
    pub table_id: Option<i32>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct UpcomingBookingsQuery {
    pub user_id: Option<i32>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: i32,
    pub table_id: i32,
    pub date: String,
    pub time: String,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub user_id: Option<i32>,
    pub table_id: Option<i32>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub table_id: i32,
    pub date: String,
    pub time: String,
}

fn parse_status(raw: Option<String>) -> Result<Option<BookingStatus>, ApiError> {
    raw.map(|s| s.parse::<BookingStatus>().map_err(ApiError::validation))
        .transpose()
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ApiError> {
    let limit = query.limit.map(validate_limit).transpose()?;
    let booking_date = query.date.as_deref().map(parse_date).transpose()?;

    let bookings = state
        .store()
        .list_bookings(BookingListFilter {
            status: parse_status(query.status)?,
            booking_date,
            user_id: query.user_id,
            table_id: query.table_id,
            limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

pub async fn upcoming_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpcomingBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ApiError> {
    let limit = query.limit.map(validate_limit).transpose()?;

    let bookings = state
        .store()
        .upcoming_bookings(query.user_id, limit)
        .await?;

    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    validate_id(payload.user_id)?;
    validate_id(payload.table_id)?;
    let date = parse_date(&payload.date)?;
    let time = parse_time(&payload.time)?;

    let id = state
        .booking_service()
        .create_booking(payload.user_id, payload.table_id, date, time)
        .await
        .map_err(map_fk_violation)?;

    let booking = state
        .booking_service()
        .get_booking(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    validate_id(id)?;

    let booking = state
        .booking_service()
        .get_booking(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

/// Partial update. Cancellation is expressed here as `status=cancelled`;
/// there is no separate cancel operation.
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    validate_id(id)?;

    let changes = BookingChanges {
        user_id: payload.user_id,
        table_id: payload.table_id,
        booking_date: payload.date.as_deref().map(parse_date).transpose()?,
        booking_time: payload.time.as_deref().map(parse_time).transpose()?,
        status: parse_status(payload.status)?,
    };

    if changes.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    let updated = state
        .booking_service()
        .update_booking(id, changes)
        .await
        .map_err(map_fk_violation)?;

    if !updated {
        return Err(ApiError::not_found("Booking", id));
    }

    let booking = state
        .booking_service()
        .get_booking(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    validate_id(id)?;

    let deleted = state.booking_service().delete_booking(id).await?;
    if !deleted {
        return Err(ApiError::not_found("Booking", id));
    }

    Ok(Json(ApiResponse::success(true)))
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ApiError> {
    validate_id(query.table_id)?;
    let date = parse_date(&query.date)?;
    let time = parse_time(&query.time)?;

    let available = state
        .booking_service()
        .is_available(query.table_id, date, time)
        .await?;

    Ok(Json(ApiResponse::success(AvailabilityDto {
        table_id: query.table_id,
        booking_date: date.format("%Y-%m-%d").to_string(),
        booking_time: time.format("%H:%M").to_string(),
        available,
    })))
}

/// A booking insert with an unknown user or table fails on the store's
/// foreign keys; report that as bad input, not a server fault.
fn map_fk_violation(err: BookingError) -> ApiError {
    match &err {
        BookingError::Database(msg) if msg.contains("FOREIGN KEY") => {
            ApiError::validation("Unknown user or table")
        }
        _ => err.into(),
    }
}
