use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::{Booking, BookingStatus, DiningTable, Role, TableStatus, User};

pub mod migrator;
pub mod repositories;

pub use repositories::booking::{BookingChanges, BookingListFilter, NewBookingRow};
pub use repositories::table::{TableListFilter, TableUpdate};
pub use repositories::user::{NewUser, UserListFilter, UserUpdate};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    security: SecurityConfig,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_options(db_url, SecurityConfig::default(), 5, 1).await
    }

    pub async fn with_options(
        db_url: &str,
        security: SecurityConfig,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn, security })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone(), self.security.clone())
    }

    #[must_use]
    pub fn table_repo(&self) -> repositories::table::TableRepository {
        repositories::table::TableRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn booking_repo(&self) -> repositories::booking::BookingRepository {
        repositories::booking::BookingRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn create_user(&self, new_user: NewUser) -> Result<i32> {
        self.user_repo().create(new_user).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn user_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().exists(email).await
    }

    pub async fn list_users(&self, filter: UserListFilter) -> Result<Vec<User>> {
        self.user_repo().list(filter).await
    }

    pub async fn update_user(&self, id: i32, changes: UserUpdate) -> Result<bool> {
        self.user_repo().update(id, changes).await
    }

    pub async fn deactivate_user(&self, id: i32) -> Result<bool> {
        self.user_repo().deactivate(id).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn count_users(&self, active_only: bool, role: Option<Role>) -> Result<u64> {
        self.user_repo().count(active_only, role).await
    }

    pub async fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn change_user_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        self.user_repo()
            .change_password(id, old_password, new_password)
            .await
    }

    // ========== Table Repository Methods ==========

    pub async fn create_table(
        &self,
        table_number: i32,
        seats: i32,
        status: Option<TableStatus>,
    ) -> Result<i32> {
        self.table_repo().create(table_number, seats, status).await
    }

    pub async fn get_table(&self, id: i32) -> Result<Option<DiningTable>> {
        self.table_repo().get(id).await
    }

    pub async fn get_table_by_number(&self, table_number: i32) -> Result<Option<DiningTable>> {
        self.table_repo().get_by_number(table_number).await
    }

    pub async fn table_exists(&self, table_number: i32) -> Result<bool> {
        self.table_repo().exists(table_number).await
    }

    pub async fn list_tables(&self, filter: TableListFilter) -> Result<Vec<DiningTable>> {
        self.table_repo().list(filter).await
    }

    pub async fn list_available_tables(
        &self,
        min_seats: Option<i32>,
        limit: Option<u64>,
    ) -> Result<Vec<DiningTable>> {
        self.table_repo().list_available(min_seats, limit).await
    }

    pub async fn update_table(&self, id: i32, changes: TableUpdate) -> Result<bool> {
        self.table_repo().update(id, changes).await
    }

    pub async fn delete_table(&self, id: i32) -> Result<bool> {
        self.table_repo().delete(id).await
    }

    pub async fn count_tables(&self, status: Option<TableStatus>) -> Result<u64> {
        self.table_repo().count(status).await
    }

    pub async fn set_table_status(&self, id: i32, status: TableStatus) -> Result<bool> {
        self.table_repo().set_status(id, status).await
    }

    // ========== Booking Repository Methods ==========

    /// Store-level insert with an explicit status. The booking workflow in
    /// `services` is the canonical creation path; this one skips the
    /// availability check.
    pub async fn create_booking_row(&self, row: NewBookingRow) -> Result<i32> {
        self.booking_repo().create(row).await
    }

    pub async fn get_booking(&self, id: i32) -> Result<Option<Booking>> {
        self.booking_repo().get(id).await
    }

    pub async fn bookings_for_user(&self, user_id: i32) -> Result<Vec<Booking>> {
        self.booking_repo().list_for_user(user_id).await
    }

    pub async fn bookings_for_table(&self, table_id: i32) -> Result<Vec<Booking>> {
        self.booking_repo().list_for_table(table_id).await
    }

    pub async fn list_bookings(&self, filter: BookingListFilter) -> Result<Vec<Booking>> {
        self.booking_repo().list(filter).await
    }

    pub async fn upcoming_bookings(
        &self,
        user_id: Option<i32>,
        limit: Option<u64>,
    ) -> Result<Vec<Booking>> {
        self.booking_repo().upcoming(user_id, limit).await
    }

    pub async fn delete_booking(&self, id: i32) -> Result<bool> {
        self.booking_repo().delete(id).await
    }

    pub async fn count_bookings(
        &self,
        status: Option<BookingStatus>,
        user_id: Option<i32>,
        table_id: Option<i32>,
    ) -> Result<u64> {
        self.booking_repo().count(status, user_id, table_id).await
    }
}
