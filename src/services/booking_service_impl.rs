//! `SeaORM` implementation of the [`BookingService`] trait.

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveTime};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, TransactionError, TransactionTrait};
use tracing::info;

use crate::constants::booking::CONFLICT_WINDOW_SECS;
use crate::db::repositories::booking as booking_repo;
use crate::db::{BookingChanges, NewBookingRow, Store};
use crate::entities::prelude::*;
use crate::models::{Booking, BookingStatus, TableStatus};
use crate::services::booking_service::{AvailabilityVerdict, BookingError, BookingService};

/// The workflow always persists new bookings as `reserved`; the column's
/// `pending` default only covers store-level inserts that bypass it.
const CREATED_STATUS: BookingStatus = BookingStatus::Reserved;

pub struct SeaOrmBookingService {
    store: Store,
}

impl SeaOrmBookingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Whether two times-of-day fall within the conflict window. Strict
/// less-than: exactly one hour apart does not conflict.
fn within_conflict_window(requested: NaiveTime, existing: NaiveTime) -> bool {
    let diff = (requested - existing).num_seconds().abs();
    diff < CONFLICT_WINDOW_SECS
}

/// Availability check, usable on the pool or inside a transaction. The
/// administrative-status check short-circuits before any time-based logic;
/// the conflict scan is filtered by exact date, so bookings never conflict
/// across calendar dates.
async fn availability_on<C: ConnectionTrait>(
    conn: &C,
    table_id: i32,
    date: NaiveDate,
    time: NaiveTime,
    exclude_booking: Option<i32>,
) -> Result<AvailabilityVerdict, DbErr> {
    let Some(table) = Tables::find_by_id(table_id).one(conn).await? else {
        return Ok(AvailabilityVerdict::TableNotFound);
    };

    if table.status == TableStatus::Unavailable.as_str() {
        return Ok(AvailabilityVerdict::TableUnavailable);
    }

    let candidates = booking_repo::active_on_date(conn, table_id, date, exclude_booking).await?;

    for candidate in &candidates {
        if within_conflict_window(time, candidate.booking_time) {
            return Ok(AvailabilityVerdict::TimeConflict);
        }
    }

    Ok(AvailabilityVerdict::Available)
}

fn flatten_txn(err: TransactionError<BookingError>) -> BookingError {
    match err {
        TransactionError::Connection(db) => db.into(),
        TransactionError::Transaction(err) => err,
    }
}

#[async_trait]
impl BookingService for SeaOrmBookingService {
    async fn is_available(
        &self,
        table_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, BookingError> {
        let verdict = availability_on(&self.store.conn, table_id, date, time, None).await?;
        Ok(verdict.is_available())
    }

    async fn create_booking(
        &self,
        user_id: i32,
        table_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<i32, BookingError> {
        if date < Local::now().date_naive() {
            return Err(BookingError::PastDate);
        }

        // One transaction around the check-and-reserve pair so two
        // concurrent requests cannot both pass the read before either
        // writes.
        let id = self
            .store
            .conn
            .transaction::<_, i32, BookingError>(move |txn| {
                Box::pin(async move {
                    let verdict = availability_on(txn, table_id, date, time, None).await?;
                    if let Some(rejection) = verdict.rejection() {
                        return Err(rejection);
                    }

                    let id = booking_repo::insert_on(
                        txn,
                        NewBookingRow {
                            user_id,
                            table_id,
                            booking_date: date,
                            booking_time: time,
                            status: CREATED_STATUS,
                        },
                    )
                    .await?;

                    Ok(id)
                })
            })
            .await
            .map_err(flatten_txn)?;

        info!(
            "Created booking {} (user {}, table {}, {} {})",
            id, user_id, table_id, date, time
        );

        Ok(id)
    }

    async fn update_booking(&self, id: i32, changes: BookingChanges) -> Result<bool, BookingError> {
        if changes.is_empty() {
            return Ok(false);
        }

        if let Some(date) = changes.booking_date
            && date < Local::now().date_naive()
        {
            return Err(BookingError::PastDate);
        }

        let updated = self
            .store
            .conn
            .transaction::<_, bool, BookingError>(move |txn| {
                Box::pin(async move {
                    let Some(current) = booking_repo::find_on(txn, id).await? else {
                        return Ok(false);
                    };

                    let table_id = changes.table_id.unwrap_or(current.table_id);
                    let date = changes.booking_date.unwrap_or(current.booking_date);
                    let time = changes.booking_time.unwrap_or(current.booking_time);

                    let slot_changed = table_id != current.table_id
                        || date != current.booking_date
                        || time != current.booking_time;

                    if slot_changed {
                        let verdict =
                            availability_on(txn, table_id, date, time, Some(id)).await?;
                        if let Some(rejection) = verdict.rejection() {
                            return Err(rejection);
                        }
                    }

                    booking_repo::apply_update_on(txn, current, &changes).await?;
                    Ok(true)
                })
            })
            .await
            .map_err(flatten_txn)?;

        if updated {
            info!("Updated booking {}", id);
        }

        Ok(updated)
    }

    async fn delete_booking(&self, id: i32) -> Result<bool, BookingError> {
        Ok(self.store.delete_booking(id).await?)
    }

    async fn get_booking(&self, id: i32) -> Result<Option<Booking>, BookingError> {
        Ok(self.store.get_booking(id).await?)
    }
}
