use serde::Serialize;

use crate::models::Booking;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Booking as rendered to clients: date as `YYYY-MM-DD`, time as `HH:MM`.
#[derive(Debug, Serialize)]
pub struct BookingDto {
    pub id: i32,
    pub user_id: i32,
    pub table_id: i32,
    pub booking_date: String,
    pub booking_time: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingDto {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            table_id: booking.table_id,
            booking_date: booking.booking_date.format("%Y-%m-%d").to_string(),
            booking_time: booking.booking_time.format("%H:%M").to_string(),
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AvailabilityDto {
    pub table_id: i32,
    pub booking_date: String,
    pub booking_time: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct SystemStatusDto {
    pub version: String,
    pub uptime_seconds: u64,
    pub database_ok: bool,
    pub users: u64,
    pub tables: u64,
    pub bookings: u64,
}
