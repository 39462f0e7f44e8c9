use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};
use crate::models::{Role, User};

/// Fields for a new user. The plaintext password is hashed before the write.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: bool,
}

/// Partial update; only `Some` fields are written. A supplied password is
/// re-hashed before the write.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    pub active_only: bool,
    pub role: Option<Role>,
    pub limit: Option<u64>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
    security: SecurityConfig,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, security: SecurityConfig) -> Self {
        Self { conn, security }
    }

    /// Create a user. A unique-email collision surfaces as an error from the
    /// store layer, not a silent no-op.
    pub async fn create(&self, new_user: NewUser) -> Result<i32> {
        let password_hash = self.hash_on_blocking(new_user.password).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            password_hash: Set(password_hash),
            role: Set(new_user.role.unwrap_or_default().as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            is_active: Set(new_user.is_active),
            ..Default::default()
        };

        // No context wrapper here: a unique-email collision must surface
        // with the store's own constraint message.
        let result = Users::insert(active).exec(&self.conn).await?;

        Ok(result.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn exists(&self, email: &str) -> Result<bool> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// List users, newest first.
    pub async fn list(&self, filter: UserListFilter) -> Result<Vec<User>> {
        let mut query = Users::find().order_by_desc(users::Column::CreatedAt);

        if filter.active_only {
            query = query.filter(users::Column::IsActive.eq(true));
        }
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Partial update. Returns false when the user does not exist or no
    /// fields were supplied.
    pub async fn update(&self, id: i32, changes: UserUpdate) -> Result<bool> {
        if changes.is_empty() {
            return Ok(false);
        }

        let Some(user) = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(false);
        };

        let mut active: users::ActiveModel = user.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(password) = changes.password {
            active.password_hash = Set(self.hash_on_blocking(password).await?);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update user")?;

        Ok(true)
    }

    /// Soft delete: deactivate the row, keep it in place.
    pub async fn deactivate(&self, id: i32) -> Result<bool> {
        self.update(
            id,
            UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    /// Hard delete: removes the row; the store cascades owned bookings.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self, active_only: bool, role: Option<Role>) -> Result<u64> {
        let mut query = Users::find();

        if active_only {
            query = query.filter(users::Column::IsActive.eq(true));
        }
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }

        query.count(&self.conn).await.context("Failed to count users")
    }

    /// Verify credentials. Returns the user without its hash when the
    /// password matches, `None` otherwise.
    /// Note: Argon2 verification is CPU-intensive and runs on a blocking
    /// task so it does not stall the async runtime.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Change a password after verifying the old one. Returns false when the
    /// user is missing or the old password does not match.
    pub async fn change_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        let Some(user) = self.get(id).await? else {
            return Ok(false);
        };

        if self.verify_password(&user.email, old_password).await?.is_none() {
            return Ok(false);
        }

        self.update(
            id,
            UserUpdate {
                password: Some(new_password.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    async fn hash_on_blocking(&self, password: String) -> Result<String> {
        let config = self.security.clone();
        task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")?
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_argon2id() {
        let hash = hash_password("secret", &SecurityConfig::default()).unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"secret", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong", &parsed)
                .is_err()
        );
    }
}
