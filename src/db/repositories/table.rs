use anyhow::{Context, Result, bail};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::{prelude::*, tables};
use crate::models::{DiningTable, TableStatus};

/// Partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct TableUpdate {
    pub table_number: Option<i32>,
    pub seats: Option<i32>,
    pub status: Option<TableStatus>,
}

impl TableUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table_number.is_none() && self.seats.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableListFilter {
    pub status: Option<TableStatus>,
    pub min_seats: Option<i32>,
    pub max_seats: Option<i32>,
    pub limit: Option<u64>,
}

pub struct TableRepository {
    conn: DatabaseConnection,
}

impl TableRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a table. The seat-count gate fails fast here instead of
    /// waiting for the store's CHECK constraint to reject the write.
    pub async fn create(
        &self,
        table_number: i32,
        seats: i32,
        status: Option<TableStatus>,
    ) -> Result<i32> {
        if seats <= 0 {
            bail!("seat count must be greater than 0");
        }

        let active = tables::ActiveModel {
            table_number: Set(table_number),
            seats: Set(seats),
            status: Set(status.unwrap_or_default().as_str().to_string()),
            ..Default::default()
        };

        // No context wrapper here: a duplicate table number must surface
        // with the store's own constraint message.
        let result = Tables::insert(active).exec(&self.conn).await?;

        Ok(result.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<DiningTable>> {
        let table = Tables::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query table by ID")?;

        Ok(table.map(DiningTable::from))
    }

    pub async fn get_by_number(&self, table_number: i32) -> Result<Option<DiningTable>> {
        let table = Tables::find()
            .filter(tables::Column::TableNumber.eq(table_number))
            .one(&self.conn)
            .await
            .context("Failed to query table by number")?;

        Ok(table.map(DiningTable::from))
    }

    pub async fn exists(&self, table_number: i32) -> Result<bool> {
        Ok(self.get_by_number(table_number).await?.is_some())
    }

    /// List tables ordered by table number.
    pub async fn list(&self, filter: TableListFilter) -> Result<Vec<DiningTable>> {
        let mut query = Tables::find().order_by_asc(tables::Column::TableNumber);

        if let Some(status) = filter.status {
            query = query.filter(tables::Column::Status.eq(status.as_str()));
        }
        if let Some(min_seats) = filter.min_seats {
            query = query.filter(tables::Column::Seats.gte(min_seats));
        }
        if let Some(max_seats) = filter.max_seats {
            query = query.filter(tables::Column::Seats.lte(max_seats));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list tables")?;

        Ok(rows.into_iter().map(DiningTable::from).collect())
    }

    /// Tables whose administrative status is `available`, optionally with a
    /// minimum seat count.
    pub async fn list_available(
        &self,
        min_seats: Option<i32>,
        limit: Option<u64>,
    ) -> Result<Vec<DiningTable>> {
        self.list(TableListFilter {
            status: Some(TableStatus::Available),
            min_seats,
            max_seats: None,
            limit,
        })
        .await
    }

    /// Partial update. Returns false when the table does not exist or no
    /// fields were supplied.
    pub async fn update(&self, id: i32, changes: TableUpdate) -> Result<bool> {
        if changes.is_empty() {
            return Ok(false);
        }
        if let Some(seats) = changes.seats
            && seats <= 0
        {
            bail!("seat count must be greater than 0");
        }

        let Some(table) = Tables::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query table for update")?
        else {
            return Ok(false);
        };

        let mut active: tables::ActiveModel = table.into();

        if let Some(table_number) = changes.table_number {
            active.table_number = Set(table_number);
        }
        if let Some(seats) = changes.seats {
            active.seats = Set(seats);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }

        active
            .update(&self.conn)
            .await
            .context("Failed to update table")?;

        Ok(true)
    }

    /// Deleting a table cascades to its bookings; its status is never
    /// touched by booking operations.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Tables::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete table")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self, status: Option<TableStatus>) -> Result<u64> {
        let mut query = Tables::find();

        if let Some(status) = status {
            query = query.filter(tables::Column::Status.eq(status.as_str()));
        }

        query
            .count(&self.conn)
            .await
            .context("Failed to count tables")
    }

    pub async fn set_status(&self, id: i32, status: TableStatus) -> Result<bool> {
        self.update(
            id,
            TableUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }
}
