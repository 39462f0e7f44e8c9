use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{bookings, prelude::*};
use crate::models::{Booking, BookingStatus};

/// Fields for a new booking row.
#[derive(Debug, Clone)]
pub struct NewBookingRow {
    pub user_id: i32,
    pub table_id: i32,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
}

/// Partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub user_id: Option<i32>,
    pub table_id: Option<i32>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<NaiveTime>,
    pub status: Option<BookingStatus>,
}

impl BookingChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.table_id.is_none()
            && self.booking_date.is_none()
            && self.booking_time.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookingListFilter {
    pub status: Option<BookingStatus>,
    pub booking_date: Option<NaiveDate>,
    pub user_id: Option<i32>,
    pub table_id: Option<i32>,
    pub limit: Option<u64>,
}

/// Fetch one booking row on any connection (pool or transaction).
pub async fn find_on<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<bookings::Model>, DbErr> {
    Bookings::find_by_id(id).one(conn).await
}

/// Active (`reserved` or `pending`) bookings for a table on an exact date.
/// This is the conflict-scan input for the availability engine; cancelled
/// rows are excluded here, not by the caller.
pub async fn active_on_date<C: ConnectionTrait>(
    conn: &C,
    table_id: i32,
    date: NaiveDate,
    exclude_booking: Option<i32>,
) -> Result<Vec<bookings::Model>, DbErr> {
    let mut query = Bookings::find()
        .filter(bookings::Column::TableId.eq(table_id))
        .filter(bookings::Column::BookingDate.eq(date))
        .filter(bookings::Column::Status.is_in(BookingStatus::ACTIVE.iter().copied()));

    if let Some(id) = exclude_booking {
        query = query.filter(bookings::Column::Id.ne(id));
    }

    query.all(conn).await
}

/// Insert a booking row with both timestamps set to now.
pub async fn insert_on<C: ConnectionTrait>(conn: &C, row: NewBookingRow) -> Result<i32, DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    let active = bookings::ActiveModel {
        user_id: Set(row.user_id),
        table_id: Set(row.table_id),
        booking_date: Set(row.booking_date),
        booking_time: Set(row.booking_time),
        status: Set(row.status.as_str().to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = Bookings::insert(active).exec(conn).await?;
    Ok(result.last_insert_id)
}

/// Apply a partial update to a fetched row, bumping `updated_at`.
pub async fn apply_update_on<C: ConnectionTrait>(
    conn: &C,
    model: bookings::Model,
    changes: &BookingChanges,
) -> Result<(), DbErr> {
    let mut active: bookings::ActiveModel = model.into();

    if let Some(user_id) = changes.user_id {
        active.user_id = Set(user_id);
    }
    if let Some(table_id) = changes.table_id {
        active.table_id = Set(table_id);
    }
    if let Some(date) = changes.booking_date {
        active.booking_date = Set(date);
    }
    if let Some(time) = changes.booking_time {
        active.booking_time = Set(time);
    }
    if let Some(status) = changes.status {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    active.update(conn).await?;
    Ok(())
}

pub struct BookingRepository {
    conn: DatabaseConnection,
}

impl BookingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Store-level insert. Rejects past dates locally; referential validity
    /// of `user_id`/`table_id` is left to the store's foreign keys.
    pub async fn create(&self, row: NewBookingRow) -> Result<i32> {
        if row.booking_date < Local::now().date_naive() {
            bail!("booking date must not be in the past");
        }

        insert_on(&self.conn, row)
            .await
            .context("Failed to insert booking")
    }

    pub async fn get(&self, id: i32) -> Result<Option<Booking>> {
        let booking = find_on(&self.conn, id)
            .await
            .context("Failed to query booking by ID")?;

        Ok(booking.map(Booking::from))
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Booking>> {
        self.list(BookingListFilter {
            user_id: Some(user_id),
            ..Default::default()
        })
        .await
    }

    pub async fn list_for_table(&self, table_id: i32) -> Result<Vec<Booking>> {
        self.list(BookingListFilter {
            table_id: Some(table_id),
            ..Default::default()
        })
        .await
    }

    /// List bookings, most recent date/time first.
    pub async fn list(&self, filter: BookingListFilter) -> Result<Vec<Booking>> {
        let mut query = Bookings::find()
            .order_by_desc(bookings::Column::BookingDate)
            .order_by_desc(bookings::Column::BookingTime);

        if let Some(status) = filter.status {
            query = query.filter(bookings::Column::Status.eq(status.as_str()));
        }
        if let Some(date) = filter.booking_date {
            query = query.filter(bookings::Column::BookingDate.eq(date));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(bookings::Column::UserId.eq(user_id));
        }
        if let Some(table_id) = filter.table_id {
            query = query.filter(bookings::Column::TableId.eq(table_id));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list bookings")?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Active bookings for today and later, soonest first.
    pub async fn upcoming(&self, user_id: Option<i32>, limit: Option<u64>) -> Result<Vec<Booking>> {
        let today = Local::now().date_naive();

        let mut query = Bookings::find()
            .filter(bookings::Column::BookingDate.gte(today))
            .filter(bookings::Column::Status.is_in(BookingStatus::ACTIVE.iter().copied()))
            .order_by_asc(bookings::Column::BookingDate)
            .order_by_asc(bookings::Column::BookingTime);

        if let Some(user_id) = user_id {
            query = query.filter(bookings::Column::UserId.eq(user_id));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list upcoming bookings")?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Hard delete. Table status is never altered as a side effect.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Bookings::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete booking")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(
        &self,
        status: Option<BookingStatus>,
        user_id: Option<i32>,
        table_id: Option<i32>,
    ) -> Result<u64> {
        let mut query = Bookings::find();

        if let Some(status) = status {
            query = query.filter(bookings::Column::Status.eq(status.as_str()));
        }
        if let Some(user_id) = user_id {
            query = query.filter(bookings::Column::UserId.eq(user_id));
        }
        if let Some(table_id) = table_id {
            query = query.filter(bookings::Column::TableId.eq(table_id));
        }

        query
            .count(&self.conn)
            .await
            .context("Failed to count bookings")
    }
}
