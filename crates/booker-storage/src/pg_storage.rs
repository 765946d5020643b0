//! `PostgreSQL` implementation of the repository traits.
//!
//! Every operation is a single parameterized statement. Identities come back
//! from `INSERT ... RETURNING id`; update and delete report `NotFound` when
//! the affected-row count is zero.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info, warn};

use booker_core::error::{DomainError, Entity};
use booker_core::model::{Booking, BookingFields, Event, EventFields, User, UserFields};
use booker_core::repository::{
    BookingRepository, EventRepository, StorageLifecycle, UserRepository,
};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    title: String,
    description: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    event_id: i64,
    user_id: i64,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
        }
    }
}

/// Logs a failed statement with its operation name and converts it into a
/// `DomainError`. Unique and foreign-key violations become
/// `DomainError::Constraint`; everything else is `DomainError::Storage`.
fn storage_error(op: &'static str, err: &sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            warn!(op, error = %err, "constraint violation");
            let constraint = db_err.constraint().unwrap_or("unnamed constraint");
            return DomainError::Constraint(format!("{op}: {constraint}"));
        }
    }
    error!(op, error = %err, "storage operation failed");
    DomainError::Storage(format!("{op} failed"))
}

/// Maps an affected-row count to `NotFound` when nothing matched.
fn expect_row(rows_affected: u64, entity: Entity, id: i64) -> Result<(), DomainError> {
    if rows_affected == 0 {
        return Err(DomainError::not_found(entity, id));
    }
    Ok(())
}

/// PostgreSQL-backed storage gateway for users, events and bookings.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Creates a new `PgStorage` over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStorage {
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("storage.users.list", &e))?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("storage.users.get", &e))?;
        row.map(User::from)
            .ok_or_else(|| DomainError::not_found(Entity::User, id))
    }

    async fn create_user(&self, fields: &UserFields) -> Result<i64, DomainError> {
        sqlx::query_scalar("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
            .bind(&fields.name)
            .bind(&fields.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("storage.users.create", &e))
    }

    async fn update_user(&self, id: i64, fields: &UserFields) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("storage.users.update", &e))?;
        expect_row(result.rows_affected(), Entity::User, id)
    }

    async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("storage.users.delete", &e))?;
        expect_row(result.rows_affected(), Entity::User, id)
    }
}

#[async_trait]
impl EventRepository for PgStorage {
    async fn list_events(&self) -> Result<Vec<Event>, DomainError> {
        let rows: Vec<EventRow> =
            sqlx::query_as("SELECT id, title, description FROM events ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("storage.events.list", &e))?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn get_event(&self, id: i64) -> Result<Event, DomainError> {
        let row: Option<EventRow> =
            sqlx::query_as("SELECT id, title, description FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_error("storage.events.get", &e))?;
        row.map(Event::from)
            .ok_or_else(|| DomainError::not_found(Entity::Event, id))
    }

    async fn create_event(&self, fields: &EventFields) -> Result<i64, DomainError> {
        sqlx::query_scalar("INSERT INTO events (title, description) VALUES ($1, $2) RETURNING id")
            .bind(&fields.title)
            .bind(&fields.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("storage.events.create", &e))
    }

    async fn update_event(&self, id: i64, fields: &EventFields) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE events SET title = $1, description = $2 WHERE id = $3")
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("storage.events.update", &e))?;
        expect_row(result.rows_affected(), Entity::Event, id)
    }

    async fn delete_event(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("storage.events.delete", &e))?;
        expect_row(result.rows_affected(), Entity::Event, id)
    }
}

#[async_trait]
impl BookingRepository for PgStorage {
    async fn list_bookings(&self) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> =
            sqlx::query_as("SELECT id, event_id, user_id FROM bookings ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("storage.bookings.list", &e))?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn get_booking(&self, id: i64) -> Result<Booking, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as("SELECT id, event_id, user_id FROM bookings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_error("storage.bookings.get", &e))?;
        row.map(Booking::from)
            .ok_or_else(|| DomainError::not_found(Entity::Booking, id))
    }

    async fn create_booking(&self, fields: &BookingFields) -> Result<i64, DomainError> {
        sqlx::query_scalar("INSERT INTO bookings (event_id, user_id) VALUES ($1, $2) RETURNING id")
            .bind(fields.event_id)
            .bind(fields.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("storage.bookings.create", &e))
    }

    async fn update_booking(&self, id: i64, fields: &BookingFields) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE bookings SET event_id = $1, user_id = $2 WHERE id = $3")
            .bind(fields.event_id)
            .bind(fields.user_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("storage.bookings.update", &e))?;
        expect_row(result.rows_affected(), Entity::Booking, id)
    }

    async fn delete_booking(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("storage.bookings.delete", &e))?;
        expect_row(result.rows_affected(), Entity::Booking, id)
    }
}

#[async_trait]
impl StorageLifecycle for PgStorage {
    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("storage.ping", &e))?;
        Ok(())
    }

    async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        info!("storage pool closed");
    }
}
