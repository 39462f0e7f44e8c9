//! Domain service for the booking workflow.
//!
//! Owns the availability engine (may this table be reserved at this
//! date/time?) and the booking lifecycle (create, reschedule, cancel via
//! status update, delete).

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::db::BookingChanges;
use crate::models::Booking;

/// Errors specific to booking operations.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Table not found")]
    TableNotFound,

    #[error("Table is marked unavailable")]
    TableUnavailable,

    #[error("Requested time is within one hour of an existing booking")]
    TimeConflict,

    #[error("Booking date must not be in the past")]
    PastDate,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for BookingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for BookingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Outcome of an availability check. The boolean contract collapses this to
/// admit/reject; the create path keeps the cause for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityVerdict {
    Available,
    TableNotFound,
    TableUnavailable,
    TimeConflict,
}

impl AvailabilityVerdict {
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    /// The rejection this verdict maps to, if any.
    #[must_use]
    pub fn rejection(self) -> Option<BookingError> {
        match self {
            Self::Available => None,
            Self::TableNotFound => Some(BookingError::TableNotFound),
            Self::TableUnavailable => Some(BookingError::TableUnavailable),
            Self::TimeConflict => Some(BookingError::TimeConflict),
        }
    }
}

/// Domain service trait for the booking workflow.
#[async_trait::async_trait]
pub trait BookingService: Send + Sync {
    /// Whether the table may be reserved for the given date and time.
    ///
    /// A missing table and a table marked `unavailable` both reject before
    /// any time-based logic; otherwise the one-hour conflict window is
    /// checked against active bookings on that exact date.
    async fn is_available(
        &self,
        table_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, BookingError>;

    /// Create a booking and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::PastDate`] for a date before today, and the
    /// availability rejection ([`BookingError::TableNotFound`],
    /// [`BookingError::TableUnavailable`], or [`BookingError::TimeConflict`])
    /// when the slot cannot be reserved. The availability check and the
    /// insert run in one transaction.
    async fn create_booking(
        &self,
        user_id: i32,
        table_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<i32, BookingError>;

    /// Partial update; only supplied fields change. A supplied date is
    /// re-validated against "not in the past", and changing the table,
    /// date, or time re-runs the availability check with this booking
    /// excluded from its own conflict scan. Returns false when the booking
    /// does not exist or no fields were supplied.
    async fn update_booking(&self, id: i32, changes: BookingChanges) -> Result<bool, BookingError>;

    /// Hard delete. Never alters the table's administrative status.
    async fn delete_booking(&self, id: i32) -> Result<bool, BookingError>;

    async fn get_booking(&self, id: i32) -> Result<Option<Booking>, BookingError>;
}
